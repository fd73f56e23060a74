//! Shared mutable context threaded through every FSM handler.
//!
//! `AlertContext` is the blackboard the state handlers read from and write
//! to: the latest verdict goes in before each tick, and [`AlertCommand`]s
//! come out.  Handlers never touch ports themselves; the session drains the
//! commands after the tick and applies them.

use crate::vitals::{EmergencyVerdict, Evaluation, Metric, MetricObservation};

// ---------------------------------------------------------------------------
// Alert commands (written by state handlers; applied by the session)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum AlertCommand {
    /// Raise the indicator and dispatch to the automatic contact set.
    Raise {
        incident: u32,
        metrics: Vec<MetricObservation>,
    },
    /// Clear the indicator for a finished incident.
    Clear { incident: u32 },
}

// ---------------------------------------------------------------------------
// AlertContext
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AlertContext {
    // -- Input --
    /// Verdict of the reading being processed.
    pub verdict: EmergencyVerdict,
    /// Vitals of that reading with their status, attached to a raise.
    pub alert_observations: Vec<MetricObservation>,

    // -- Per-incident counters --
    /// Incidents raised so far; the current incident's id while Active.
    pub incident: u32,
    /// Triggered readings seen during the current incident.
    pub readings_in_incident: u32,
    /// Every metric that exceeded its threshold during the current incident.
    pub incident_metrics: Vec<Metric>,

    // -- Output --
    pub commands: Vec<AlertCommand>,
}

impl AlertContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the result of one evaluation before the FSM tick.
    pub fn set_evaluation(&mut self, evaluation: &Evaluation) {
        self.verdict = evaluation.verdict.clone();
        self.alert_observations = evaluation.alert_observations();
    }

    pub fn is_triggered(&self) -> bool {
        self.verdict.triggered
    }

    /// Record the current verdict's metrics against the open incident.
    pub fn note_incident_reading(&mut self) {
        self.readings_in_incident += 1;
        for m in &self.verdict.exceeded {
            if !self.incident_metrics.contains(m) {
                self.incident_metrics.push(*m);
            }
        }
    }

    pub fn reset_incident(&mut self) {
        self.readings_in_incident = 0;
        self.incident_metrics.clear();
    }

    /// Drain the commands issued during the last tick.
    pub fn take_commands(&mut self) -> Vec<AlertCommand> {
        core::mem::take(&mut self.commands)
    }
}
