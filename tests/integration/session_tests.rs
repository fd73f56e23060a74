//! Integration tests for the Session → evaluator → FSM → alert pipeline.
//!
//! Bytes go in through `feed_chunk` exactly as the transport would deliver
//! them; assertions are made on the mock indicator, the recorded events and
//! the requests that reach the alert port.

use std::rc::Rc;

use vitalwatch::app::commands::AppCommand;
use vitalwatch::app::events::AppEvent;
use vitalwatch::dispatch::{AlertRuntime, AlertTrigger, ContactTypes};
use vitalwatch::error::{DispatchError, Error, FrameError, ParseFailure};
use vitalwatch::fsm::StateId;
use vitalwatch::link::codec::MAX_LINE_BYTES;
use vitalwatch::vitals::{Metric, MetricStatus, Thresholds};
use vitalwatch::{GatewayConfig, Session};

use super::mock_ports::{FixedClock, IndicatorCall, MockIndicator, RecordingAlertPort, RecordingSink};

struct Harness {
    session: Session<RecordingAlertPort, FixedClock>,
    port: Rc<RecordingAlertPort>,
    runtime: AlertRuntime,
    indicator: MockIndicator,
    sink: RecordingSink,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(GatewayConfig::default())
    }

    fn with_config(config: GatewayConfig) -> Self {
        let port = Rc::new(RecordingAlertPort::default());
        let runtime = AlertRuntime::new();
        let mut sink = RecordingSink::default();
        let session = Session::connect(
            &config,
            Rc::clone(&port),
            runtime.clone(),
            FixedClock,
            &mut sink,
        );
        Self {
            session,
            port,
            runtime,
            indicator: MockIndicator::default(),
            sink,
        }
    }

    fn feed(&mut self, bytes: &str) {
        self.session
            .feed_chunk(bytes.as_bytes(), &mut self.indicator, &mut self.sink);
        self.runtime.run_pending();
        self.session.drain_reports(&mut self.sink);
    }
}

fn is_raise(e: &AppEvent) -> bool {
    matches!(e, AppEvent::AlertRaised { .. })
}

// ── Connect ──────────────────────────────────────────────────

#[test]
fn connect_starts_normal_and_announces_it() {
    let h = Harness::new();
    assert_eq!(h.session.state(), StateId::Normal);
    assert!(matches!(h.sink.events.first(), Some(AppEvent::Started(StateId::Normal))));
    assert!(h.session.last_vitals().is_none());
    assert!(h.session.reading_log().is_empty());
}

// ── Scenario A: one high heart rate raises an alert ──────────

#[test]
fn high_heart_rate_enters_active_and_dispatches() {
    let mut h = Harness::new();
    h.feed("{\"heartRate\":130}\n");

    assert_eq!(h.session.state(), StateId::Active);
    assert_eq!(
        h.indicator.calls,
        vec![IndicatorCall::Raise {
            incident: 1,
            metrics: 1
        }]
    );

    let vitals = h.session.last_vitals().unwrap();
    assert_eq!(vitals.heart_rate.text, "130 bpm");
    assert!(vitals.heart_rate.emergency);

    let req = h.port.last().unwrap();
    assert_eq!(req.types, ContactTypes::ALL);
    assert_eq!(req.metrics.len(), 1);
    assert_eq!(req.metrics[0].metric, Metric::HeartRate);
    assert_eq!(req.metrics[0].status, MetricStatus::Emergency);

    let report = h
        .sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::DispatchCompleted(r) => Some(r.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(report.trigger, AlertTrigger::Automatic { incident: 1 });
}

#[test]
fn automatic_alert_carries_every_vital_of_the_reading() {
    let mut h = Harness::new();
    h.feed("{\"heartRate\":130,\"temp\":37.2,\"pressure\":{\"pressure\":1013},\
            \"accel\":{\"x\":0.1,\"y\":0.2,\"z\":9.8}}\n");

    assert_eq!(h.session.state(), StateId::Active);
    assert_eq!(
        h.indicator.calls,
        vec![IndicatorCall::Raise {
            incident: 1,
            metrics: 3
        }]
    );

    let req = h.port.last().unwrap();
    let attached: Vec<_> = req
        .metrics
        .iter()
        .map(|m| (m.metric, m.formatted.as_str(), m.status))
        .collect();
    assert_eq!(
        attached,
        [
            (Metric::HeartRate, "130 bpm", MetricStatus::Emergency),
            (Metric::Temperature, "37.2 °C", MetricStatus::Normal),
            (Metric::Pressure, "1013 Pa", MetricStatus::Normal),
        ]
    );
}

// ── Scenario B: normal readings stay quiet ───────────────────

#[test]
fn normal_readings_do_not_alert() {
    let mut h = Harness::new();
    h.feed("{\"heartRate\":80,\"temp\":37.0}\n");

    assert_eq!(h.session.state(), StateId::Normal);
    assert!(h.indicator.calls.is_empty());
    assert_eq!(h.port.count(), 0);
    assert_eq!(h.session.reading_log().len(), 2);
    let vitals = h.session.last_vitals().unwrap();
    assert_eq!(vitals.temperature.text, "37.0 °C");
    assert!(!vitals.temperature.emergency);
}

// ── Scenario C: a record split across notifications ──────────

#[test]
fn split_record_is_reassembled() {
    let mut h = Harness::new();
    h.feed("{\"heartRate\":9");
    assert_eq!(h.session.stats().readings, 0);

    h.feed("0}\n{\"temp\":39.0}\n");
    assert_eq!(h.session.stats().readings, 2);
    assert_eq!(h.session.stats().chunks, 2);

    // Newest first: the temperature line arrived last.
    let entries: Vec<_> = h.session.reading_log().entries().collect();
    assert_eq!(entries[0].metric, Metric::Temperature);
    assert_eq!(entries[0].value, "39.0 °C");
    assert_eq!(entries[1].metric, Metric::HeartRate);
    assert_eq!(entries[1].value, "90 bpm");

    // 39.0 °C is over the default 38.5 °C limit.
    assert_eq!(h.session.state(), StateId::Active);
}

// ── Scenario D: debounce while the condition persists ────────

#[test]
fn sustained_emergency_dispatches_once() {
    let mut h = Harness::new();
    h.feed("{\"heartRate\":130}\n");
    h.feed("{\"heartRate\":135}\n");
    h.feed("{\"heartRate\":140,\"temp\":39.2}\n");

    assert_eq!(h.session.state(), StateId::Active);
    assert_eq!(h.port.count(), 1);
    assert_eq!(h.sink.count(is_raise), 1);
    assert_eq!(h.session.incident(), 1);
}

#[test]
fn recovery_clears_and_rearms() {
    let mut h = Harness::new();
    h.feed("{\"heartRate\":130}\n");
    h.feed("{\"heartRate\":80}\n");
    assert_eq!(h.session.state(), StateId::Normal);
    h.feed("{\"temp\":39.5}\n");

    assert_eq!(
        h.indicator.calls,
        vec![
            IndicatorCall::Raise {
                incident: 1,
                metrics: 1
            },
            IndicatorCall::Clear { incident: 1 },
            IndicatorCall::Raise {
                incident: 2,
                metrics: 1
            },
        ]
    );
    assert_eq!(h.port.count(), 2);
    assert_eq!(h.session.stats().incidents, 2);
    assert_eq!(
        h.sink.count(|e| matches!(e, AppEvent::StateChanged { .. })),
        3
    );
}

#[test]
fn reading_without_thresholded_metric_clears() {
    let mut h = Harness::new();
    h.feed("{\"heartRate\":130}\n");
    h.feed("{\"pressure\":{\"pressure\":101325}}\n");
    assert_eq!(h.session.state(), StateId::Normal);
    assert!(!h.indicator.raised());
}

// ── Noise and malformed input ────────────────────────────────

#[test]
fn noise_and_malformed_lines_are_dropped() {
    let mut h = Harness::new();
    h.feed("Booting sensor hub...\n\n{\"heartRate\":}\n{\"heartRate\":130}\n");

    assert_eq!(h.session.stats().dropped_lines, 3);
    assert_eq!(h.session.stats().readings, 1);
    assert_eq!(h.session.state(), StateId::Active);
    assert_eq!(
        h.sink
            .count(|e| matches!(e, AppEvent::LineDropped(ParseFailure::NotCandidate))),
        2
    );
    assert_eq!(
        h.sink
            .count(|e| matches!(e, AppEvent::LineDropped(ParseFailure::Malformed(_)))),
        1
    );
}

#[test]
fn oversized_record_is_reported_and_stream_recovers() {
    let mut h = Harness::new();
    let junk = "x".repeat(MAX_LINE_BYTES + 10);
    h.feed(&junk);
    h.feed("still junk\n{\"heartRate\":72}\n");

    assert_eq!(h.session.stats().frame_overflows, 1);
    assert_eq!(
        h.sink.count(|e| matches!(
            e,
            AppEvent::FrameOverflow(FrameError::LineTooLong { .. })
        )),
        1
    );
    assert_eq!(h.session.stats().readings, 1);
    assert_eq!(h.session.last_vitals().unwrap().heart_rate.text, "72 bpm");
}

// ── Commands ─────────────────────────────────────────────────

#[test]
fn manual_alert_goes_to_selected_types() {
    let mut h = Harness::new();
    h.session
        .handle_command(AppCommand::ManualAlert {
            message: "Fell in the kitchen".into(),
            types: ContactTypes::MEDICAL,
        })
        .unwrap();
    h.runtime.run_pending();
    h.session.drain_reports(&mut h.sink);

    let req = h.port.last().unwrap();
    assert_eq!(req.message, "Fell in the kitchen");
    assert_eq!(req.types, ContactTypes::MEDICAL);
    assert!(req.metrics.is_empty());
    assert_eq!(h.session.stats().manual_alerts, 1);
    assert_eq!(h.session.state(), StateId::Normal);
    assert!(h.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::DispatchCompleted(r) if r.trigger == AlertTrigger::Manual
    )));
}

#[test]
fn manual_alert_validation_rejects_before_dispatch() {
    let mut h = Harness::new();
    let err = h
        .session
        .handle_command(AppCommand::ManualAlert {
            message: "help".into(),
            types: ContactTypes::NONE,
        })
        .unwrap_err();
    assert_eq!(err, Error::Dispatch(DispatchError::NoContactTypes));

    let err = h
        .session
        .handle_command(AppCommand::ManualAlert {
            message: "  ".into(),
            types: ContactTypes::ALL,
        })
        .unwrap_err();
    assert_eq!(err, Error::Dispatch(DispatchError::EmptyMessage));

    assert_eq!(h.runtime.in_flight(), 0);
    assert_eq!(h.session.stats().manual_alerts, 0);
}

#[test]
fn updated_thresholds_apply_to_next_reading() {
    let mut h = Harness::new();
    h.session
        .handle_command(AppCommand::UpdateThresholds(Thresholds {
            heart_rate_max_bpm: 140.0,
            temperature_max_c: 38.5,
        }))
        .unwrap();
    h.feed("{\"heartRate\":130}\n");
    assert_eq!(h.session.state(), StateId::Normal);
    h.feed("{\"heartRate\":141}\n");
    assert_eq!(h.session.state(), StateId::Active);
}

#[test]
fn invalid_thresholds_are_rejected() {
    let mut h = Harness::new();
    let before = *h.session.thresholds();
    let result = h
        .session
        .handle_command(AppCommand::UpdateThresholds(Thresholds {
            heart_rate_max_bpm: -1.0,
            temperature_max_c: 38.5,
        }));
    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(*h.session.thresholds(), before);
}

#[test]
fn clear_reading_log_empties_history_only() {
    let mut h = Harness::new();
    h.feed("{\"heartRate\":80,\"temp\":36.9}\n");
    assert_eq!(h.session.reading_log().len(), 2);
    h.session.handle_command(AppCommand::ClearReadingLog).unwrap();
    assert!(h.session.reading_log().is_empty());
    assert!(h.session.last_vitals().is_some());
}

#[test]
fn clearing_log_mid_incident_keeps_it_open() {
    let mut h = Harness::new();
    h.feed("{\"heartRate\":130}\n");
    assert_eq!(h.session.state(), StateId::Active);

    h.session.handle_command(AppCommand::ClearReadingLog).unwrap();
    assert!(h.session.reading_log().is_empty());
    h.feed("{\"heartRate\":135}\n");

    assert_eq!(h.session.state(), StateId::Active);
    assert_eq!(h.session.incident(), 1);
    assert_eq!(h.port.count(), 1);
    assert_eq!(h.sink.count(is_raise), 1);
    assert_eq!(
        h.indicator.calls,
        vec![IndicatorCall::Raise {
            incident: 1,
            metrics: 1
        }]
    );
    assert_eq!(h.session.reading_log().len(), 1);
}

#[test]
fn reading_log_respects_configured_cap() {
    let mut cfg = GatewayConfig::default();
    cfg.log.max_entries = Some(3);
    let mut h = Harness::with_config(cfg);
    for bpm in 60..65 {
        h.feed(&format!("{{\"heartRate\":{bpm}}}\n"));
    }
    assert_eq!(h.session.reading_log().len(), 3);
    assert_eq!(h.session.reading_log().latest().unwrap().value, "64 bpm");
}

#[test]
fn many_outstanding_alerts_settle() {
    let mut h = Harness::new();
    for i in 0..40 {
        h.session
            .handle_command(AppCommand::ManualAlert {
                message: format!("check #{i}"),
                types: ContactTypes::ALL,
            })
            .unwrap();
    }
    assert_eq!(h.runtime.in_flight(), 40);

    let reports = h.runtime.settle();
    assert_eq!(reports.len(), 40);
    assert!(reports.iter().all(|r| r.trigger == AlertTrigger::Manual));
    assert_eq!(h.port.count(), 40);
    assert_eq!(h.runtime.in_flight(), 0);
}

// ── Disconnect ───────────────────────────────────────────────

#[test]
fn disconnect_reports_stats_and_leaves_indicator_raised() {
    let mut h = Harness::new();
    h.feed("{\"heartRate\":130}\n{\"temp\":36.");
    let stats = h.session.disconnect(&mut h.sink);

    assert_eq!(stats.readings, 1);
    assert_eq!(stats.incidents, 1);
    assert!(h.indicator.raised());
    assert!(matches!(h.sink.events.last(), Some(AppEvent::Disconnected(s)) if s.readings == 1));
}

#[test]
fn dispatch_in_flight_survives_disconnect() {
    let port = Rc::new(RecordingAlertPort::default());
    let runtime = AlertRuntime::new();
    let mut sink = RecordingSink::default();
    let mut indicator = MockIndicator::default();
    let mut session = Session::connect(
        &GatewayConfig::default(),
        Rc::clone(&port),
        runtime.clone(),
        FixedClock,
        &mut sink,
    );

    // Not driven yet: the dispatch is still queued on the runtime.
    session.feed_chunk(b"{\"heartRate\":150}\n", &mut indicator, &mut sink);
    assert_eq!(runtime.in_flight(), 1);
    let _ = session.disconnect(&mut sink);

    let reports = runtime.settle();
    assert_eq!(reports.len(), 1);
    assert_eq!(port.count(), 1);
}
