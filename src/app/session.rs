//! Ingestion session: the hexagonal core for one transport connection.
//!
//! [`Session`] owns the line decoder, the alert FSM and its context, the
//! reading log and the live thresholds.  It is created on connect and
//! consumed on disconnect; nothing about a connection lives in globals.
//!
//! ```text
//!  chunk ──▶ LineDecoder ──▶ parse_line ──▶ evaluate ──┬──▶ ReadingLog
//!                                                      ├──▶ EventSink (Vitals)
//!                                                      └──▶ Fsm ──▶ AlertCommand
//!                                                                     │
//!                    AlertIndicator ◀── raise / clear ◀───────────────┤
//!                    AlertRuntime   ◀── spawn dispatch (Raise only) ◀─┘
//! ```
//!
//! Each chunk is handled to completion before `feed_chunk` returns.
//! Dispatch is fire-and-observe: it is spawned on the shared
//! [`AlertRuntime`] and its outcome comes back through
//! [`drain_reports`](Session::drain_reports).

use std::rc::Rc;

use log::{debug, info, warn};

use crate::config::{AlertSettings, GatewayConfig};
use crate::dispatch::{AlertRequest, AlertRuntime, AlertTrigger};
use crate::error::Result;
use crate::fsm::context::{AlertCommand, AlertContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::link::codec::LineDecoder;
use crate::link::parser::parse_line;
use crate::vitals::{ReadingLog, Thresholds, VitalsSnapshot, evaluate};

use super::commands::AppCommand;
use super::events::{AppEvent, SessionStats};
use super::ports::{AlertIndicator, AlertPort, Clock, EventSink};

// ───────────────────────────────────────────────────────────────
// Session
// ───────────────────────────────────────────────────────────────

pub struct Session<D, K> {
    decoder: LineDecoder,
    fsm: Fsm,
    ctx: AlertContext,
    thresholds: Thresholds,
    alerts: AlertSettings,
    log: ReadingLog,
    last_vitals: Option<VitalsSnapshot>,
    dispatcher: Rc<D>,
    runtime: AlertRuntime,
    clock: K,
    stats: SessionStats,
}

impl<D, K> Session<D, K>
where
    D: AlertPort + 'static,
    K: Clock,
{
    /// Open a session in the Normal state with an empty decoder buffer.
    pub fn connect(
        config: &GatewayConfig,
        dispatcher: Rc<D>,
        runtime: AlertRuntime,
        clock: K,
        sink: &mut impl EventSink,
    ) -> Self {
        let mut fsm = Fsm::new(build_state_table(), StateId::Normal);
        let mut ctx = AlertContext::new();
        fsm.start(&mut ctx);

        sink.emit(&AppEvent::Started(fsm.current_state()));
        info!("SESSION: connected, state={:?}", fsm.current_state());

        Self {
            decoder: LineDecoder::new(),
            fsm,
            ctx,
            thresholds: config.thresholds,
            alerts: config.alerts.clone(),
            log: ReadingLog::new(config.log.max_entries),
            last_vitals: None,
            dispatcher,
            runtime,
            clock,
            stats: SessionStats::default(),
        }
    }

    // ── Per-chunk orchestration ───────────────────────────────

    /// Handle one transport chunk to completion.
    pub fn feed_chunk(
        &mut self,
        chunk: &[u8],
        indicator: &mut impl AlertIndicator,
        sink: &mut impl EventSink,
    ) {
        self.stats.chunks += 1;
        self.stats.bytes += chunk.len() as u64;

        for line in self.decoder.feed(chunk) {
            match line {
                Ok(line) => {
                    self.stats.lines += 1;
                    self.process_line(&line, indicator, sink);
                }
                Err(e) => {
                    self.stats.frame_overflows += 1;
                    sink.emit(&AppEvent::FrameOverflow(e));
                }
            }
        }
    }

    fn process_line(
        &mut self,
        line: &str,
        indicator: &mut impl AlertIndicator,
        sink: &mut impl EventSink,
    ) {
        let reading = match parse_line(line) {
            Ok(r) => r,
            Err(e) => {
                debug!("SESSION: dropped line ({e})");
                self.stats.dropped_lines += 1;
                sink.emit(&AppEvent::LineDropped(e));
                return;
            }
        };
        self.stats.readings += 1;

        let evaluation = evaluate(&reading, &self.thresholds);
        self.log.record_all(&evaluation.observations, self.clock.now());

        let vitals = VitalsSnapshot::from_observations(&evaluation.observations);
        sink.emit(&AppEvent::Vitals(vitals.clone()));
        self.last_vitals = Some(vitals);

        let prev = self.fsm.current_state();
        self.ctx.set_evaluation(&evaluation);
        self.fsm.tick(&mut self.ctx);
        let next = self.fsm.current_state();
        if next != prev {
            sink.emit(&AppEvent::StateChanged {
                from: prev,
                to: next,
            });
        }

        for cmd in self.ctx.take_commands() {
            self.apply(cmd, indicator, sink);
        }
    }

    /// Translate FSM commands into port calls.
    fn apply(
        &mut self,
        cmd: AlertCommand,
        indicator: &mut impl AlertIndicator,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AlertCommand::Raise { incident, metrics } => {
                self.stats.incidents += 1;
                indicator.raise(incident, &metrics);
                sink.emit(&AppEvent::AlertRaised {
                    incident,
                    metrics: metrics.clone(),
                });
                let request = AlertRequest {
                    message: self.alerts.automatic_message.clone(),
                    types: self.alerts.automatic_contact_types,
                    metrics,
                };
                self.runtime.spawn_dispatch(
                    Rc::clone(&self.dispatcher),
                    AlertTrigger::Automatic { incident },
                    request,
                );
            }
            AlertCommand::Clear { incident } => {
                indicator.clear(incident);
                sink.emit(&AppEvent::AlertCleared { incident });
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (UI, CLI).
    pub fn handle_command(&mut self, cmd: AppCommand) -> Result<()> {
        match cmd {
            AppCommand::ManualAlert { message, types } => {
                let request = AlertRequest {
                    message,
                    types,
                    metrics: Vec::new(),
                };
                request.validate()?;
                self.stats.manual_alerts += 1;
                info!("SESSION: manual alert to {}", request.types);
                self.runtime
                    .spawn_dispatch(Rc::clone(&self.dispatcher), AlertTrigger::Manual, request);
            }
            AppCommand::UpdateThresholds(thresholds) => {
                thresholds.validate()?;
                info!(
                    "SESSION: thresholds updated (hr>{} bpm, temp>{} °C)",
                    thresholds.heart_rate_max_bpm, thresholds.temperature_max_c
                );
                self.thresholds = thresholds;
            }
            AppCommand::ClearReadingLog => {
                info!("SESSION: reading log cleared ({} entries)", self.log.len());
                self.log.clear();
            }
        }
        Ok(())
    }

    /// Forward every finished dispatch to the sink.  Returns how many.
    pub fn drain_reports(&mut self, sink: &mut impl EventSink) -> usize {
        let mut n = 0;
        while let Some(report) = self.runtime.try_report() {
            sink.emit(&AppEvent::DispatchCompleted(report));
            n += 1;
        }
        n
    }

    // ── Teardown ──────────────────────────────────────────────

    /// Tear the session down.  In-flight dispatches keep running on the
    /// runtime; a raised indicator stays raised.
    pub fn disconnect(self, sink: &mut impl EventSink) -> SessionStats {
        if self.fsm.current_state() == StateId::Active {
            warn!(
                "SESSION: disconnected during incident #{}, indicator left raised",
                self.ctx.incident
            );
        }
        if !self.decoder.pending().is_empty() {
            debug!(
                "SESSION: discarding {} unterminated byte(s)",
                self.decoder.pending().len()
            );
        }
        info!(
            "SESSION: disconnected after {} reading(s), {} in-flight dispatch(es)",
            self.stats.readings,
            self.runtime.in_flight()
        );
        sink.emit(&AppEvent::Disconnected(self.stats));
        self.stats
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn reading_log(&self) -> &ReadingLog {
        &self.log
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn last_vitals(&self) -> Option<&VitalsSnapshot> {
        self.last_vitals.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Incidents raised so far (id of the current one while Active).
    pub fn incident(&self) -> u32 {
        self.ctx.incident
    }
}
