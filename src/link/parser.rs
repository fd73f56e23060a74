//! Reading parser: complete line → [`Reading`].
//!
//! A cheap pre-filter (`{ ... }` after trimming) rejects banners, blank
//! lines and console noise before any JSON work is done.  Candidates are
//! decoded into a generic JSON object and then mapped field by field, so a
//! single field of the wrong type only drops that metric instead of the
//! whole reading.
//!
//! `parse_line` is total: every input yields either a reading or a
//! [`ParseFailure`], never a panic.

use serde_json::{Map, Value};

use crate::error::ParseFailure;
use crate::vitals::reading::{PressureSample, Reading, Vector3};

/// Parse one complete line into a reading.
pub fn parse_line(line: &str) -> Result<Reading, ParseFailure> {
    let trimmed = line.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return Err(ParseFailure::NotCandidate);
    }

    let obj: Map<String, Value> =
        serde_json::from_str(trimmed).map_err(|e| ParseFailure::Malformed(e.to_string()))?;

    Ok(Reading {
        heart_rate: number(&obj, "heartRate"),
        temp: number(&obj, "temp"),
        pressure: obj.get("pressure").and_then(pressure),
        accel: obj.get("accel").and_then(vector),
        mag: obj.get("mag").and_then(vector),
    })
}

fn number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn pressure(value: &Value) -> Option<PressureSample> {
    let obj = value.as_object()?;
    Some(PressureSample {
        pressure: number(obj, "pressure")?,
    })
}

fn vector(value: &Value) -> Option<Vector3> {
    let obj = value.as_object()?;
    let v = Vector3 {
        x: number(obj, "x"),
        y: number(obj, "y"),
        z: number(obj, "z"),
    };
    v.has_any_axis().then_some(v)
}
