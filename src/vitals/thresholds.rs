//! Threshold evaluation.
//!
//! Maps one [`Reading`] to per-metric observations plus an aggregate
//! verdict.  Pure and stateless: the same reading and thresholds always
//! produce the same [`Evaluation`].
//!
//! | Metric        | Valid iff                    | Emergency iff        |
//! |---------------|------------------------------|----------------------|
//! | heart rate    | finite, > 0                  | > `heart_rate_max`   |
//! | temperature   | finite                       | > `temperature_max`  |
//! | pressure      | nested magnitude, non-zero   | never                |
//! | accelerometer | at least one numeric axis    | never                |
//! | magnetometer  | at least one numeric axis    | never                |

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::vitals::reading::{Reading, Vector3};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Clinical limits.  Comparisons are strictly greater-than.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub heart_rate_max_bpm: f64,
    pub temperature_max_c: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            heart_rate_max_bpm: 120.0,
            temperature_max_c: 38.5,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.heart_rate_max_bpm.is_finite() && self.heart_rate_max_bpm > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "heart_rate_max_bpm must be a positive number",
            ));
        }
        if !self.temperature_max_c.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "temperature_max_c must be a finite number",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Metric identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "heartRate")]
    HeartRate,
    #[serde(rename = "temp")]
    Temperature,
    #[serde(rename = "pressure")]
    Pressure,
    #[serde(rename = "accel")]
    Accelerometer,
    #[serde(rename = "mag")]
    Magnetometer,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::HeartRate,
        Metric::Temperature,
        Metric::Pressure,
        Metric::Accelerometer,
        Metric::Magnetometer,
    ];

    /// Wire name of the field in a reading.
    pub fn name(self) -> &'static str {
        match self {
            Self::HeartRate => "heartRate",
            Self::Temperature => "temp",
            Self::Pressure => "pressure",
            Self::Accelerometer => "accel",
            Self::Magnetometer => "mag",
        }
    }

    /// Vital signs carried in an automatic alert.  Motion axes are not.
    pub fn is_vital(self) -> bool {
        matches!(self, Self::HeartRate | Self::Temperature | Self::Pressure)
    }

    /// Human-readable label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::HeartRate => "Heart Rate",
            Self::Temperature => "Temperature",
            Self::Pressure => "Pressure",
            Self::Accelerometer => "Accelerometer",
            Self::Magnetometer => "Magnetometer",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Normal,
    Emergency,
}

impl MetricStatus {
    pub fn is_emergency(self) -> bool {
        self == Self::Emergency
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Emergency => f.write_str("emergency"),
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation output
// ---------------------------------------------------------------------------

/// One metric as observed in one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricObservation {
    pub metric: Metric,
    /// Display text including the unit, e.g. `130 bpm`.
    pub formatted: String,
    pub status: MetricStatus,
}

/// Aggregate verdict for one reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmergencyVerdict {
    pub triggered: bool,
    /// Metrics that exceeded their threshold, in evaluation order.
    pub exceeded: Vec<Metric>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub observations: Vec<MetricObservation>,
    pub verdict: EmergencyVerdict,
}

impl Evaluation {
    /// Every vital present in the reading, each with its own status.
    pub fn alert_observations(&self) -> Vec<MetricObservation> {
        self.observations
            .iter()
            .filter(|o| o.metric.is_vital())
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate a reading against the thresholds.
pub fn evaluate(reading: &Reading, thresholds: &Thresholds) -> Evaluation {
    let mut observations = Vec::with_capacity(Metric::ALL.len());

    if let Some(bpm) = reading.heart_rate.filter(|v| v.is_finite() && *v > 0.0) {
        observations.push(MetricObservation {
            metric: Metric::HeartRate,
            formatted: format!("{bpm} bpm"),
            status: status(bpm > thresholds.heart_rate_max_bpm),
        });
    }

    if let Some(temp) = reading.temp.filter(|v| v.is_finite()) {
        observations.push(MetricObservation {
            metric: Metric::Temperature,
            formatted: format!("{temp:.1} °C"),
            status: status(temp > thresholds.temperature_max_c),
        });
    }

    if let Some(p) = reading
        .pressure
        .map(|s| s.pressure)
        .filter(|v| v.is_finite() && *v != 0.0)
    {
        observations.push(MetricObservation {
            metric: Metric::Pressure,
            formatted: format!("{p} Pa"),
            status: MetricStatus::Normal,
        });
    }

    if let Some(a) = reading.accel.filter(Vector3::has_any_axis) {
        observations.push(MetricObservation {
            metric: Metric::Accelerometer,
            formatted: format_vector(&a, |v| format!("{v:.2}")),
            status: MetricStatus::Normal,
        });
    }

    if let Some(m) = reading.mag.filter(Vector3::has_any_axis) {
        observations.push(MetricObservation {
            metric: Metric::Magnetometer,
            formatted: format_vector(&m, |v| format!("{v}")),
            status: MetricStatus::Normal,
        });
    }

    let exceeded: Vec<Metric> = observations
        .iter()
        .filter(|o| o.status.is_emergency())
        .map(|o| o.metric)
        .collect();

    Evaluation {
        observations,
        verdict: EmergencyVerdict {
            triggered: !exceeded.is_empty(),
            exceeded,
        },
    }
}

fn status(exceeded: bool) -> MetricStatus {
    if exceeded {
        MetricStatus::Emergency
    } else {
        MetricStatus::Normal
    }
}

fn format_vector(v: &Vector3, axis: impl Fn(f64) -> String) -> String {
    let fmt_axis = |a: Option<f64>| a.map(&axis).unwrap_or_else(|| "--".to_string());
    format!(
        "x: {}, y: {}, z: {}",
        fmt_axis(v.x),
        fmt_axis(v.y),
        fmt_axis(v.z)
    )
}
