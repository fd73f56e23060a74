//! Inbound commands to the session.
//!
//! These represent actions requested by the outside world (UI, CLI) that
//! the [`Session`](super::session::Session) interprets and acts upon.

use crate::dispatch::ContactTypes;
use crate::vitals::Thresholds;

#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Send a user-authored alert now, regardless of the emergency state.
    ManualAlert { message: String, types: ContactTypes },

    /// Replace the clinical thresholds at runtime.
    UpdateThresholds(Thresholds),

    /// Empty the reading log.  Has no effect on emergency detection.
    ClearReadingLog,
}
