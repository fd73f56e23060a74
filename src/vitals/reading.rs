//! Decoded telemetry snapshot.
//!
//! Every field is optional.  `None` means "no observation for this metric",
//! never zero.  Values of the wrong JSON type are treated as absent by the
//! parser, so consumers never need to re-check shapes.

/// One reading from the wearable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    /// Heart rate (beats/minute).
    pub heart_rate: Option<f64>,
    /// Body temperature (°C).
    pub temp: Option<f64>,
    /// Barometer sample.
    pub pressure: Option<PressureSample>,
    /// Accelerometer vector (g).
    pub accel: Option<Vector3>,
    /// Magnetometer vector (raw counts).
    pub mag: Option<Vector3>,
}

impl Reading {
    /// True if the reading carries no recognised field at all.
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_none()
            && self.temp.is_none()
            && self.pressure.is_none()
            && self.accel.is_none()
            && self.mag.is_none()
    }
}

/// Nested barometer object (`{"pressure": {"pressure": 1013.2, ...}}`).
/// Sibling keys such as the sensor's own temperature are not kept.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PressureSample {
    /// Pressure magnitude (Pa).
    pub pressure: f64,
}

/// Three-axis sample.  Individual axes may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl Vector3 {
    pub fn has_any_axis(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }
}
