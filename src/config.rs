//! Gateway configuration parameters
//!
//! All tunable parameters for the VitalWatch gateway.  Loaded from a JSON
//! file through [`ConfigPort`](crate::app::ports::ConfigPort); every
//! section falls back to its defaults when absent.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::dispatch::ContactTypes;
use crate::dispatch::location::Coordinates;
use crate::vitals::Thresholds;

/// Default message for alerts raised by the emergency state machine.
pub const AUTOMATIC_ALERT_MESSAGE: &str =
    "EMERGENCY ALERT: Abnormal health readings detected. Medical assistance may be needed.";

/// Core gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub thresholds: Thresholds,
    pub dispatch: DispatchSettings,
    pub alerts: AlertSettings,
    pub log: LogSettings,
    /// JSON file holding the contact list.
    pub contacts_path: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            dispatch: DispatchSettings::default(),
            alerts: AlertSettings::default(),
            log: LogSettings::default(),
            contacts_path: PathBuf::from("contacts.json"),
        }
    }
}

impl GatewayConfig {
    /// Check every section; returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        self.dispatch.validate()?;
        self.alerts.validate()?;
        self.log.validate()
    }
}

// --- Dispatch ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Name spoken and written in every alert.
    pub patient_name: String,
    /// Prefix for numbers entered without an international prefix.
    pub default_country_code: String,
    /// Caller ID / SMS sender registered with the provider.
    pub sender_number: Option<String>,
    /// Base URL of the voice callback server (`/emergency-call`).
    pub server_url: Option<String>,
    /// Upper bound on the geolocation lookup.
    pub location_timeout_ms: u64,
    /// Fixed position for gateways without a positioning provider.
    pub location: Option<Coordinates>,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            patient_name: "Patient".to_string(),
            default_country_code: "+234".to_string(),
            sender_number: None,
            server_url: None,
            location_timeout_ms: 5_000,
            location: None,
        }
    }
}

impl DispatchSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patient_name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("patient_name must not be empty"));
        }
        let cc = self.default_country_code.as_str();
        let valid_cc = cc
            .strip_prefix('+')
            .is_some_and(|d| (1..=3).contains(&d.len()) && d.chars().all(|c| c.is_ascii_digit()));
        if !valid_cc {
            return Err(ConfigError::ValidationFailed(
                "default_country_code must be '+' followed by 1-3 digits",
            ));
        }
        if !(1..=60_000).contains(&self.location_timeout_ms) {
            return Err(ConfigError::ValidationFailed(
                "location_timeout_ms must be within 1..=60000",
            ));
        }
        if self
            .server_url
            .as_deref()
            .is_some_and(|url| !(url.starts_with("http://") || url.starts_with("https://")))
        {
            return Err(ConfigError::ValidationFailed(
                "server_url must be an http(s) URL",
            ));
        }
        if self.location.is_some_and(|c| !c.is_valid()) {
            return Err(ConfigError::ValidationFailed(
                "location must be a valid latitude/longitude",
            ));
        }
        Ok(())
    }
}

// --- Automatic alerts ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub automatic_message: String,
    pub automatic_contact_types: ContactTypes,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            automatic_message: AUTOMATIC_ALERT_MESSAGE.to_string(),
            automatic_contact_types: ContactTypes::ALL,
        }
    }
}

impl AlertSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.automatic_message.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "alerts.automatic_message must not be empty",
            ));
        }
        if self.automatic_contact_types.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "alerts.automatic_contact_types must name at least one type",
            ));
        }
        Ok(())
    }
}

// --- Reading log ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Cap on retained reading-log entries.  `None` keeps everything.
    pub max_entries: Option<usize>,
}

impl LogSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == Some(0) {
            return Err(ConfigError::ValidationFailed("log.max_entries must be at least 1"));
        }
        Ok(())
    }
}
