//! Vital signs: reading model, threshold evaluation, reading log.
//!
//! ```text
//!  Reading ──▶ evaluate(thresholds) ──▶ Evaluation ──┬─▶ ReadingLog
//!                                                    ├─▶ VitalsSnapshot (live panel)
//!                                                    └─▶ alert FSM (verdict)
//! ```

pub mod reading;
pub mod reading_log;
pub mod thresholds;

use serde::Serialize;

pub use reading::{PressureSample, Reading, Vector3};
pub use reading_log::{LogEntry, ReadingLog};
pub use thresholds::{
    EmergencyVerdict, Evaluation, Metric, MetricObservation, MetricStatus, Thresholds, evaluate,
};

/// Placeholder for an absent heart-rate slot.
pub const NO_HEART_RATE: &str = "No data";
/// Placeholder for any other absent slot.
pub const NO_VALUE: &str = "--";

/// One slot of the live vitals panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    pub text: String,
    pub emergency: bool,
}

/// Per-metric display text for the most recent reading.
///
/// Every slot is always populated; metrics absent from the reading show a
/// placeholder instead of a stale value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalsSnapshot {
    pub heart_rate: Slot,
    pub temperature: Slot,
    pub pressure: Slot,
    pub accelerometer: Slot,
    pub magnetometer: Slot,
}

impl VitalsSnapshot {
    pub fn from_observations(observations: &[MetricObservation]) -> Self {
        let slot = |metric: Metric| {
            observations
                .iter()
                .find(|o| o.metric == metric)
                .map(|o| Slot {
                    text: o.formatted.clone(),
                    emergency: o.status.is_emergency(),
                })
                .unwrap_or_else(|| Slot {
                    text: placeholder(metric).to_string(),
                    emergency: false,
                })
        };
        Self {
            heart_rate: slot(Metric::HeartRate),
            temperature: slot(Metric::Temperature),
            pressure: slot(Metric::Pressure),
            accelerometer: slot(Metric::Accelerometer),
            magnetometer: slot(Metric::Magnetometer),
        }
    }

    pub fn slot(&self, metric: Metric) -> &Slot {
        match metric {
            Metric::HeartRate => &self.heart_rate,
            Metric::Temperature => &self.temperature,
            Metric::Pressure => &self.pressure,
            Metric::Accelerometer => &self.accelerometer,
            Metric::Magnetometer => &self.magnetometer,
        }
    }
}

fn placeholder(metric: Metric) -> &'static str {
    match metric {
        Metric::HeartRate => NO_HEART_RATE,
        _ => NO_VALUE,
    }
}
