//! Log-backed alert indicator.
//!
//! Stands in for the banner/modal/buzzer of a UI.  Tracks the raised
//! incident so the owner can tell whether the indicator is still up.

use log::{info, warn};

use crate::app::ports::AlertIndicator;
use crate::vitals::MetricObservation;

#[derive(Debug, Default)]
pub struct LogIndicator {
    raised: Option<u32>,
}

impl LogIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incident currently shown, if any.
    pub fn raised(&self) -> Option<u32> {
        self.raised
    }
}

impl AlertIndicator for LogIndicator {
    fn raise(&mut self, incident: u32, metrics: &[MetricObservation]) {
        self.raised = Some(incident);
        for m in metrics {
            warn!("INDICATOR | #{} {}: {}", incident, m.metric.label(), m.formatted);
        }
    }

    fn clear(&mut self, incident: u32) {
        if self.raised == Some(incident) {
            self.raised = None;
        }
        info!("INDICATOR | #{} cleared", incident);
    }
}
