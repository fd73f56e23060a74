//! Message composition per channel kind.
//!
//! Caregivers get a voice call; medical contacts get an SMS with the
//! vitals block, where readings over their limit are marked.  Both carry the patient name, the location reference and
//! the alert timestamp.

use chrono::{DateTime, Utc};

use crate::vitals::MetricObservation;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Everything a message needs, resolved once per dispatch.
#[derive(Debug, Clone)]
pub struct AlertContent<'a> {
    pub patient_name: &'a str,
    pub message: &'a str,
    pub metrics: &'a [MetricObservation],
    pub location: &'a str,
    pub sent_at: DateTime<Utc>,
}

/// Spoken alert for a voice call.
///
/// When a callback server is configured the provider fetches the prompt
/// from `callback_url` instead of reading `text` directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceScript {
    pub text: String,
    pub callback_url: Option<String>,
}

pub fn voice_script(content: &AlertContent<'_>, server_url: Option<&str>) -> VoiceScript {
    let name = content.patient_name;
    let text = format!(
        "Emergency alert for {name}. This is an automated emergency call. {message} \
         {name} requires immediate assistance. Their current location is: {location}. \
         Alert raised at {time}. Please respond immediately.",
        message = content.message.trim(),
        location = content.location,
        time = content.sent_at.format(TIMESTAMP_FORMAT),
    );
    VoiceScript {
        text,
        callback_url: server_url.map(|url| callback_url(url, content.location, name)),
    }
}

/// `{server}/emergency-call?location=..&patientName=..`
pub fn callback_url(server_url: &str, location: &str, patient_name: &str) -> String {
    format!(
        "{}/emergency-call?location={}&patientName={}",
        server_url.trim_end_matches('/'),
        urlencoding::encode(location),
        urlencoding::encode(patient_name)
    )
}

pub fn sms_body(content: &AlertContent<'_>) -> String {
    let mut body = format!(
        "EMERGENCY ALERT for {}\n\n{}\n\nVitals:\n",
        content.patient_name,
        content.message.trim()
    );
    if content.metrics.is_empty() {
        body.push_str("- none attached\n");
    }
    for m in content.metrics {
        let mark = if m.status.is_emergency() { " (EMERGENCY)" } else { "" };
        body.push_str(&format!("- {}: {}{mark}\n", m.metric.label(), m.formatted));
    }
    body.push_str(&format!(
        "\nLocation: {}\nTime: {}\n\nPlease respond immediately.",
        content.location,
        content.sent_at.format(TIMESTAMP_FORMAT)
    ));
    body
}
