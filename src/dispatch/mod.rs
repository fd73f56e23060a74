//! Alert fan-out to emergency contacts.
//!
//! ```text
//!  AlertRequest ──▶ ContactStore snapshot ──▶ filter by type
//!                                               │ (none → NoRecipients)
//!                                               ▼
//!                     Geolocator (bounded) ──▶ compose voice / SMS
//!                                               │
//!               ┌───────────────┬───────────────┼───────────────┐
//!               ▼               ▼               ▼               ▼
//!          task: call      task: call      task: sms       task: sms     (concurrent)
//!               └───────────────┴───────┬───────┴───────────────┘
//!                                       ▼
//!                         DispatchSummary { sent, failed, outcomes }
//! ```
//!
//! One contact's channel failure is recorded in its [`ContactOutcome`] and
//! never aborts the batch.

pub mod compose;
pub mod location;
pub mod phone;
pub mod runtime;

use core::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use embassy_time::Duration;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{
    AlertPort, Clock, ConfigError, ContactStore, Geolocator, SmsChannel, VoiceChannel,
};
use crate::config::DispatchSettings;
use crate::error::{ChannelFailure, DispatchError};
use crate::vitals::MetricObservation;

use compose::AlertContent;
use location::resolve_location;
use phone::normalize_phone;
pub use runtime::{AlertExecutor, AlertRuntime, AlertTrigger, DispatchReport};

// ───────────────────────────────────────────────────────────────
// Contacts
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Caregiver,
    Medical,
}

impl ContactKind {
    pub const fn mask(self) -> u8 {
        match self {
            Self::Caregiver => 0b01,
            Self::Medical => 0b10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Caregiver => "caregiver",
            Self::Medical => "medical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: ContactKind,
}

/// Set of contact kinds, stored as a bitmask.
///
/// Serialises as a list (`["caregiver", "medical"]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ContactKind>", into = "Vec<ContactKind>")]
pub struct ContactTypes(u8);

impl ContactTypes {
    pub const NONE: Self = Self(0);
    pub const CAREGIVERS: Self = Self(ContactKind::Caregiver.mask());
    pub const MEDICAL: Self = Self(ContactKind::Medical.mask());
    pub const ALL: Self = Self(ContactKind::Caregiver.mask() | ContactKind::Medical.mask());

    pub fn contains(self, kind: ContactKind) -> bool {
        self.0 & kind.mask() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn with(self, kind: ContactKind) -> Self {
        Self(self.0 | kind.mask())
    }

    pub fn kinds(self) -> impl Iterator<Item = ContactKind> {
        [ContactKind::Caregiver, ContactKind::Medical]
            .into_iter()
            .filter(move |k| self.contains(*k))
    }
}

impl FromIterator<ContactKind> for ContactTypes {
    fn from_iter<I: IntoIterator<Item = ContactKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

impl From<Vec<ContactKind>> for ContactTypes {
    fn from(kinds: Vec<ContactKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<ContactTypes> for Vec<ContactKind> {
    fn from(types: ContactTypes) -> Self {
        types.kinds().collect()
    }
}

impl fmt::Display for ContactTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.kinds().map(ContactKind::as_str).collect();
        f.write_str(&names.join(", "))
    }
}

// ───────────────────────────────────────────────────────────────
// Request / result
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct AlertRequest {
    pub message: String,
    pub types: ContactTypes,
    /// Observations attached to the alert (every vital of the triggering
    /// reading, with its status, for automatic alerts).
    pub metrics: Vec<MetricObservation>,
}

impl AlertRequest {
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.types.is_empty() {
            return Err(DispatchError::NoContactTypes);
        }
        if self.message.trim().is_empty() {
            return Err(DispatchError::EmptyMessage);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Voice,
    Sms,
}

impl ChannelKind {
    pub fn for_contact(kind: ContactKind) -> Self {
        match kind {
            ContactKind::Caregiver => Self::Voice,
            ContactKind::Medical => Self::Sms,
        }
    }
}

/// Result of one contact's attempt.  `Ok` carries the provider reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactOutcome {
    pub contact: Contact,
    pub channel: ChannelKind,
    pub result: Result<String, ChannelFailure>,
}

impl ContactOutcome {
    pub fn is_sent(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
    /// One entry per recipient, in contact-store order.
    pub outcomes: Vec<ContactOutcome>,
    pub location: String,
    pub sent_at: DateTime<Utc>,
}

impl DispatchSummary {
    pub fn from_outcomes(
        outcomes: Vec<ContactOutcome>,
        location: String,
        sent_at: DateTime<Utc>,
    ) -> Self {
        let sent = outcomes.iter().filter(|o| o.is_sent()).count();
        Self {
            sent,
            failed: outcomes.len() - sent,
            outcomes,
            location,
            sent_at,
        }
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ContactOutcome> {
        self.outcomes.iter().filter(|o| !o.is_sent())
    }
}

// ───────────────────────────────────────────────────────────────
// AlertDispatcher
// ───────────────────────────────────────────────────────────────

/// Production [`AlertPort`]: fans one request out over voice and SMS.
pub struct AlertDispatcher<C, V, S, G, K> {
    contacts: C,
    voice: Rc<V>,
    sms: Rc<S>,
    geolocator: G,
    clock: K,
    settings: DispatchSettings,
    executor: Rc<AlertExecutor>,
}

impl<C, V, S, G, K> AlertDispatcher<C, V, S, G, K>
where
    C: ContactStore,
    V: VoiceChannel + 'static,
    S: SmsChannel + 'static,
    G: Geolocator,
    K: Clock,
{
    /// Build a dispatcher.  Invalid settings are rejected here, once,
    /// rather than on every alert.
    pub fn new(
        contacts: C,
        voice: V,
        sms: S,
        geolocator: G,
        clock: K,
        settings: DispatchSettings,
        executor: Rc<AlertExecutor>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            contacts,
            voice: Rc::new(voice),
            sms: Rc::new(sms),
            geolocator,
            clock,
            settings,
            executor,
        })
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    fn recipients(&self, types: ContactTypes) -> Vec<Contact> {
        self.contacts
            .list_contacts()
            .into_iter()
            .filter(|c| types.contains(c.kind))
            .collect()
    }
}

impl<C, V, S, G, K> AlertPort for AlertDispatcher<C, V, S, G, K>
where
    C: ContactStore,
    V: VoiceChannel + 'static,
    S: SmsChannel + 'static,
    G: Geolocator,
    K: Clock,
{
    async fn dispatch(&self, request: AlertRequest) -> Result<DispatchSummary, DispatchError> {
        request.validate()?;

        let recipients = self.recipients(request.types);
        if recipients.is_empty() {
            warn!("DISPATCH: no contacts of type {}", request.types);
            return Err(DispatchError::NoRecipients {
                requested: request.types,
            });
        }

        let timeout = Duration::from_millis(self.settings.location_timeout_ms);
        let location = resolve_location(&self.geolocator, timeout).await;
        let sent_at = self.clock.now();

        let content = AlertContent {
            patient_name: &self.settings.patient_name,
            message: &request.message,
            metrics: &request.metrics,
            location: &location,
            sent_at,
        };
        let script = Rc::new(compose::voice_script(
            &content,
            self.settings.server_url.as_deref(),
        ));
        let body: Rc<str> = compose::sms_body(&content).into();

        info!(
            "DISPATCH: alerting {} contact(s) of type {}",
            recipients.len(),
            request.types
        );

        // Spawn every attempt before awaiting any, so they run concurrently.
        let attempts: Vec<_> = recipients
            .into_iter()
            .map(|contact| {
                let number = normalize_phone(&contact.phone, &self.settings.default_country_code);
                let channel = ChannelKind::for_contact(contact.kind);
                let task = match channel {
                    ChannelKind::Voice => {
                        let voice = Rc::clone(&self.voice);
                        let script = Rc::clone(&script);
                        self.executor.spawn(async move {
                            let number = number?;
                            voice.place_call(&number, &script).await
                        })
                    }
                    ChannelKind::Sms => {
                        let sms = Rc::clone(&self.sms);
                        let body = Rc::clone(&body);
                        self.executor.spawn(async move {
                            let number = number?;
                            sms.send_sms(&number, &body).await
                        })
                    }
                };
                (contact, channel, task)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(attempts.len());
        for (contact, channel, task) in attempts {
            let result = task.await;
            match &result {
                Ok(reference) => info!(
                    "DISPATCH: {:?} to {} ok ({})",
                    channel, contact.name, reference
                ),
                Err(e) => warn!("DISPATCH: {:?} to {} failed: {}", channel, contact.name, e),
            }
            outcomes.push(ContactOutcome {
                contact,
                channel,
                result,
            });
        }

        let summary = DispatchSummary::from_outcomes(outcomes, location, sent_at);
        info!(
            "DISPATCH: sent to {} of {} contact(s)",
            summary.sent,
            summary.attempted()
        );
        Ok(summary)
    }
}
