//! Outbound application events.
//!
//! The [`Session`](super::session::Session) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log lines, a UI panel, a push channel.

use serde::Serialize;

use crate::dispatch::DispatchReport;
use crate::error::{FrameError, ParseFailure};
use crate::fsm::StateId;
use crate::vitals::{MetricObservation, VitalsSnapshot};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A session was opened (carries the initial state).
    Started(StateId),

    /// Live panel text for the latest reading.
    Vitals(VitalsSnapshot),

    /// A complete line was not a usable reading.
    LineDropped(ParseFailure),

    /// The line decoder discarded an oversized record.
    FrameOverflow(FrameError),

    /// The emergency state machine changed state.
    StateChanged { from: StateId, to: StateId },

    /// Indicator raised and automatic dispatch started.
    AlertRaised {
        incident: u32,
        metrics: Vec<MetricObservation>,
    },

    /// Indicator cleared on return to Normal.
    AlertCleared { incident: u32 },

    /// An alert dispatch finished (automatic or manual).
    DispatchCompleted(DispatchReport),

    /// The session was torn down.
    Disconnected(SessionStats),
}

/// Counters accumulated over one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub chunks: u64,
    pub bytes: u64,
    pub lines: u64,
    pub readings: u64,
    pub dropped_lines: u64,
    pub frame_overflows: u64,
    pub incidents: u32,
    pub manual_alerts: u32,
}
