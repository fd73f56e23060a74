//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every application event as one
//! structured log line.  A UI adapter would implement the same trait.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::dispatch::AlertTrigger;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::Vitals(v) => {
                info!(
                    "VITALS | hr={} | temp={} | pressure={} | accel=({}) | mag=({})",
                    v.heart_rate.text,
                    v.temperature.text,
                    v.pressure.text,
                    v.accelerometer.text,
                    v.magnetometer.text,
                );
            }
            AppEvent::LineDropped(reason) => {
                debug!("LINE | dropped: {}", reason);
            }
            AppEvent::FrameOverflow(e) => {
                warn!("LINE | {}", e);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::AlertRaised { incident, metrics } => {
                let exceeded: Vec<String> = metrics
                    .iter()
                    .map(|m| format!("{}={}", m.metric, m.formatted))
                    .collect();
                warn!("ALERT | raised #{} | {}", incident, exceeded.join(", "));
            }
            AppEvent::AlertCleared { incident } => {
                info!("ALERT | cleared #{}", incident);
            }
            AppEvent::DispatchCompleted(report) => {
                let trigger = match report.trigger {
                    AlertTrigger::Automatic { incident } => format!("incident #{incident}"),
                    AlertTrigger::Manual => "manual".to_string(),
                };
                match &report.outcome {
                    Ok(s) => info!(
                        "DISPATCH | {} | sent={} failed={} | location={}",
                        trigger, s.sent, s.failed, s.location
                    ),
                    Err(e) => warn!("DISPATCH | {} | not sent: {}", trigger, e),
                }
            }
            AppEvent::Disconnected(s) => {
                info!(
                    "STOP | chunks={} bytes={} lines={} readings={} dropped={} \
                     overflows={} incidents={} manual={}",
                    s.chunks,
                    s.bytes,
                    s.lines,
                    s.readings,
                    s.dropped_lines,
                    s.frame_overflows,
                    s.incidents,
                    s.manual_alerts,
                );
            }
        }
    }
}
