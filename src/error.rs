//! Unified error types for the VitalWatch gateway.
//!
//! Every fallible subsystem has its own small enum.  Only the ones that can
//! reach a caller of [`Session`](crate::app::session::Session) funnel into
//! [`Error`]; the others are reported in-band.
//!
//! Propagation rules:
//! - [`FrameError`] and [`ParseFailure`] never cross a record boundary.
//!   The session emits them as events and carries on with the next line.
//! - [`ChannelFailure`] never crosses a contact boundary.  It is recorded
//!   in that contact's outcome and the batch continues.
//! - [`DispatchError`] describes a whole batch that could not start.
//! - [`ConfigError`](crate::app::ports::ConfigError) is the only fatal
//!   class, raised once when the dispatcher is constructed.

use core::fmt;

use crate::app::ports::ConfigError;
use crate::dispatch::ContactTypes;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An alert batch could not be dispatched.
    Dispatch(DispatchError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatch(e) => write!(f, "dispatch: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// A record exceeded the decoder capacity before its separator arrived.
    LineTooLong { limit: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineTooLong { limit } => {
                write!(f, "record exceeds {limit} bytes without a separator, discarded")
            }
        }
    }
}

impl std::error::Error for FrameError {}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The trimmed line is not brace-delimited (blank lines, banners, noise).
    NotCandidate,
    /// The line looked like a JSON object but did not decode.
    Malformed(String),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCandidate => write!(f, "not a JSON object line"),
            Self::Malformed(msg) => write!(f, "malformed JSON: {msg}"),
        }
    }
}

impl std::error::Error for ParseFailure {}

// ---------------------------------------------------------------------------
// Notification channels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelFailure {
    /// The destination could not be normalised into a dialable number.
    InvalidNumber(String),
    /// The provider refused the request (bad destination, policy, quota).
    Rejected(String),
    /// The provider could not be reached.
    Unavailable(String),
    /// The provider rejected our credentials.
    Unauthorized,
}

impl fmt::Display for ChannelFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber(n) => write!(f, "invalid destination number '{n}'"),
            Self::Rejected(msg) => write!(f, "rejected by provider: {msg}"),
            Self::Unavailable(msg) => write!(f, "provider unavailable: {msg}"),
            Self::Unauthorized => write!(f, "provider rejected credentials"),
        }
    }
}

impl std::error::Error for ChannelFailure {}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The requested contact types matched nobody in the contact store.
    /// This is a configuration gap, not a transient fault.
    NoRecipients { requested: ContactTypes },
    /// A manual alert named no contact type at all.
    NoContactTypes,
    /// A manual alert had a blank message.
    EmptyMessage,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRecipients { requested } => {
                write!(f, "no emergency contacts of type {requested}")
            }
            Self::NoContactTypes => write!(f, "select at least one contact type"),
            Self::EmptyMessage => write!(f, "alert message is empty"),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<DispatchError> for Error {
    fn from(e: DispatchError) -> Self {
        Self::Dispatch(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
