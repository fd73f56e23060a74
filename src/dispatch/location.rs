//! Best-effort location for alert messages.
//!
//! The lookup never blocks or fails an alert: a denied lookup, a missing
//! provider and a timeout all resolve to [`LOCATION_UNAVAILABLE`].

use embassy_time::{Duration, with_timeout};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::Geolocator;

/// Fallback text when no position can be obtained.
pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Map link suitable for SMS bodies and spoken scripts.
    pub fn map_link(&self) -> String {
        format!(
            "https://maps.google.com/?q={:.6},{:.6}",
            self.latitude, self.longitude
        )
    }
}

/// Resolve a human-readable location reference within `timeout`.
pub async fn resolve_location<G: Geolocator>(geolocator: &G, timeout: Duration) -> String {
    match with_timeout(timeout, geolocator.locate()).await {
        Ok(Some(coords)) if coords.is_valid() => coords.map_link(),
        Ok(Some(coords)) => {
            warn!("LOCATION: provider returned out-of-range {:?}", coords);
            LOCATION_UNAVAILABLE.to_string()
        }
        Ok(None) => {
            info!("LOCATION: unavailable or denied, using fallback");
            LOCATION_UNAVAILABLE.to_string()
        }
        Err(_) => {
            warn!(
                "LOCATION: lookup timed out after {}ms, using fallback",
                timeout.as_millis()
            );
            LOCATION_UNAVAILABLE.to_string()
        }
    }
}
