//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Session / AlertDispatcher (domain)
//! ```
//!
//! Driven adapters (contact store, notification providers, geolocation,
//! clock, indicator, event sinks, config storage) implement these traits.
//! The domain consumes them via generics, so tests run every path against
//! in-memory mocks.
//!
//! ## Notes
//!
//! - **VoiceChannel** / **SmsChannel** failures are per-contact values,
//!   never batch errors.
//! - **Geolocator** is best effort; the dispatcher bounds it with a timeout.
//! - **ConfigPort** implementations MUST validate before persisting.

use core::fmt;
use core::future::Future;

use chrono::{DateTime, Utc};

use crate::config::GatewayConfig;
use crate::dispatch::compose::VoiceScript;
use crate::dispatch::location::Coordinates;
use crate::dispatch::{AlertRequest, Contact, DispatchSummary};
use crate::error::{ChannelFailure, DispatchError};
use crate::vitals::MetricObservation;

// ───────────────────────────────────────────────────────────────
// Contact store (external collaborator, read-only here)
// ───────────────────────────────────────────────────────────────

/// Snapshot access to the persisted contact list.
pub trait ContactStore {
    fn list_contacts(&self) -> Vec<Contact>;
}

impl ContactStore for Vec<Contact> {
    fn list_contacts(&self) -> Vec<Contact> {
        self.clone()
    }
}

// ───────────────────────────────────────────────────────────────
// Notification channels (domain → providers)
// ───────────────────────────────────────────────────────────────

/// Voice-call provider.  Returns a provider reference (call id) on success.
pub trait VoiceChannel {
    fn place_call(
        &self,
        number: &str,
        script: &VoiceScript,
    ) -> impl Future<Output = Result<String, ChannelFailure>>;
}

/// SMS provider.  Returns a provider reference (message id) on success.
pub trait SmsChannel {
    fn send_sms(&self, number: &str, body: &str)
    -> impl Future<Output = Result<String, ChannelFailure>>;
}

// ───────────────────────────────────────────────────────────────
// Geolocation and time
// ───────────────────────────────────────────────────────────────

/// Best-effort position lookup.  `None` = denied or unavailable.
pub trait Geolocator {
    fn locate(&self) -> impl Future<Output = Option<Coordinates>>;
}

/// Wall clock used for message and log timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Alert dispatch (session → dispatcher)
// ───────────────────────────────────────────────────────────────

/// Fan-out of one alert to the matching contacts.
///
/// [`AlertDispatcher`](crate::dispatch::AlertDispatcher) is the production
/// implementation; the session only depends on this trait.
pub trait AlertPort {
    fn dispatch(
        &self,
        request: AlertRequest,
    ) -> impl Future<Output = Result<DispatchSummary, DispatchError>>;
}

// ───────────────────────────────────────────────────────────────
// Alert indicator (domain → UI)
// ───────────────────────────────────────────────────────────────

/// Persistent emergency indicator (banner, modal, buzzer).
///
/// Raised on entry to Active and kept until the matching `clear`; never
/// dismissed by a timer.
pub trait AlertIndicator {
    fn raise(&mut self, incident: u32, metrics: &[MetricObservation]);
    fn clear(&mut self, incident: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / UI)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists gateway configuration.
///
/// Implementations MUST validate before persisting.  Invalid values are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Returns [`ConfigError::NotFound`] if nothing is stored yet.
    fn load(&self) -> Result<GatewayConfig, ConfigError>;

    fn save(&self, config: &GatewayConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations and config validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first run).
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage could not be read or written.
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
