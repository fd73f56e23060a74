//! Mock adapters for integration tests.
//!
//! Every mock records what it was asked to do so tests can assert on the
//! full call history without a provider, a UI, or a real clock.

use std::cell::{Cell, RefCell};
use std::future::{pending, poll_fn};
use std::rc::Rc;
use std::task::Poll;

use chrono::{DateTime, TimeZone, Utc};

use vitalwatch::app::events::AppEvent;
use vitalwatch::app::ports::{
    AlertIndicator, AlertPort, Clock, EventSink, Geolocator, SmsChannel, VoiceChannel,
};
use vitalwatch::dispatch::compose::VoiceScript;
use vitalwatch::dispatch::location::Coordinates;
use vitalwatch::dispatch::{AlertRequest, DispatchSummary};
use vitalwatch::error::{ChannelFailure, DispatchError};
use vitalwatch::vitals::MetricObservation;
use vitalwatch::{Contact, ContactKind};

// ── Clock ─────────────────────────────────────────────────────

/// Always 2024-03-01 12:00:00 UTC.
#[derive(Clone, Copy)]
pub struct FixedClock;

impl FixedClock {
    pub fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Self::instant()
    }
}

// ── Alert port ────────────────────────────────────────────────

/// Records every request and answers with an empty summary.
#[derive(Default)]
pub struct RecordingAlertPort {
    pub requests: RefCell<Vec<AlertRequest>>,
}

#[allow(dead_code)]
impl RecordingAlertPort {
    pub fn count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last(&self) -> Option<AlertRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl AlertPort for RecordingAlertPort {
    async fn dispatch(&self, request: AlertRequest) -> Result<DispatchSummary, DispatchError> {
        request.validate()?;
        self.requests.borrow_mut().push(request);
        Ok(DispatchSummary::from_outcomes(
            Vec::new(),
            "Location unavailable".into(),
            FixedClock::instant(),
        ))
    }
}

// ── Notification channels ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelCall {
    Voice { number: String, script: VoiceScript },
    Sms { number: String, body: String },
}

/// Voice + SMS mock.  Numbers listed in `failing` are rejected.
///
/// Clones share one call log, so a test can keep a handle after moving
/// the channel into a dispatcher.
#[derive(Clone, Default)]
pub struct MockChannel {
    pub calls: Rc<RefCell<Vec<ChannelCall>>>,
    pub failing: Vec<String>,
}

#[allow(dead_code)]
impl MockChannel {
    pub fn failing_for(number: &str) -> Self {
        Self {
            calls: Rc::default(),
            failing: vec![number.to_string()],
        }
    }

    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn numbers(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| match c {
                ChannelCall::Voice { number, .. } | ChannelCall::Sms { number, .. } => {
                    number.clone()
                }
            })
            .collect()
    }

    fn answer(&self, number: &str, prefix: &str) -> Result<String, ChannelFailure> {
        if self.failing.iter().any(|f| f == number) {
            return Err(ChannelFailure::Rejected(format!("{number} unreachable")));
        }
        Ok(format!("{prefix}{}", self.count()))
    }
}

impl VoiceChannel for MockChannel {
    async fn place_call(&self, number: &str, script: &VoiceScript) -> Result<String, ChannelFailure> {
        self.calls.borrow_mut().push(ChannelCall::Voice {
            number: number.to_string(),
            script: script.clone(),
        });
        self.answer(number, "CA")
    }
}

impl SmsChannel for MockChannel {
    async fn send_sms(&self, number: &str, body: &str) -> Result<String, ChannelFailure> {
        self.calls.borrow_mut().push(ChannelCall::Sms {
            number: number.to_string(),
            body: body.to_string(),
        });
        self.answer(number, "SM")
    }
}

/// Voice mock whose first call stays pending until a second call has
/// started.  If calls run one after another the first one gives up after
/// `patience` polls and fails.
#[derive(Clone)]
pub struct GatedVoice {
    pub started: Rc<Cell<usize>>,
    pub finished: Rc<RefCell<Vec<String>>>,
    pub patience: usize,
}

impl Default for GatedVoice {
    fn default() -> Self {
        Self {
            started: Rc::default(),
            finished: Rc::default(),
            patience: 1_000,
        }
    }
}

impl VoiceChannel for GatedVoice {
    async fn place_call(&self, number: &str, _script: &VoiceScript) -> Result<String, ChannelFailure> {
        let order = self.started.get();
        self.started.set(order + 1);

        if order == 0 {
            let mut polls = 0;
            let opened = poll_fn(|cx| {
                if self.started.get() >= 2 {
                    return Poll::Ready(true);
                }
                polls += 1;
                if polls > self.patience {
                    return Poll::Ready(false);
                }
                cx.waker().wake_by_ref();
                Poll::Pending
            })
            .await;
            if !opened {
                return Err(ChannelFailure::Unavailable("second call never started".into()));
            }
        }

        self.finished.borrow_mut().push(number.to_string());
        Ok(format!("CA{order}"))
    }
}

// ── Geolocation ───────────────────────────────────────────────

pub struct StaticLocation(pub Coordinates);

impl Geolocator for StaticLocation {
    async fn locate(&self) -> Option<Coordinates> {
        Some(self.0)
    }
}

/// A lookup that never answers (permission prompt left open).
pub struct HangingLocation;

impl Geolocator for HangingLocation {
    async fn locate(&self) -> Option<Coordinates> {
        pending().await
    }
}

// ── Indicator ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorCall {
    Raise { incident: u32, metrics: usize },
    Clear { incident: u32 },
}

#[derive(Default)]
pub struct MockIndicator {
    pub calls: Vec<IndicatorCall>,
}

#[allow(dead_code)]
impl MockIndicator {
    pub fn raised(&self) -> bool {
        matches!(self.calls.last(), Some(IndicatorCall::Raise { .. }))
    }
}

impl AlertIndicator for MockIndicator {
    fn raise(&mut self, incident: u32, metrics: &[MetricObservation]) {
        self.calls.push(IndicatorCall::Raise {
            incident,
            metrics: metrics.len(),
        });
    }

    fn clear(&mut self, incident: u32) {
        self.calls.push(IndicatorCall::Clear { incident });
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Fixtures ──────────────────────────────────────────────────

#[allow(dead_code)]
pub fn contact(name: &str, phone: &str, kind: ContactKind) -> Contact {
    Contact {
        name: name.to_string(),
        phone: phone.to_string(),
        kind,
    }
}
