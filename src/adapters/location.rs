//! Fixed-position geolocator for stationary gateways.

use crate::app::ports::Geolocator;
use crate::dispatch::location::Coordinates;

/// Reports a configured position, or "unavailable" when none is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinates>);

impl Geolocator for FixedLocation {
    async fn locate(&self) -> Option<Coordinates> {
        self.0
    }
}
