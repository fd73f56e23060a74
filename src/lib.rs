//! VitalWatch gateway library.
//!
//! Reassembles wearable telemetry from a fragmented byte stream, evaluates
//! each reading against clinical thresholds, and drives a debounced
//! emergency state machine that fans alerts out to caregivers (voice) and
//! medical contacts (SMS).
//!
//! ```text
//!  link ──▶ vitals ──▶ fsm ──▶ dispatch
//!    └──────── app::session (one per connection) ────────┘
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fsm;
pub mod link;
pub mod vitals;

pub use app::session::Session;
pub use config::GatewayConfig;
pub use dispatch::{AlertDispatcher, AlertRuntime, Contact, ContactKind, ContactTypes};
pub use error::{Error, Result};
