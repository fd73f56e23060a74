//! Dry-run notification channel.
//!
//! Implements both [`VoiceChannel`] and [`SmsChannel`] by logging what
//! would be sent.  Used by the CLI replay and for bench testing without
//! provider credentials.

use core::cell::Cell;

use log::info;

use crate::app::ports::{SmsChannel, VoiceChannel};
use crate::dispatch::compose::VoiceScript;
use crate::error::ChannelFailure;

#[derive(Default)]
pub struct DryRunChannel {
    sender: Option<String>,
    calls: Cell<u32>,
    messages: Cell<u32>,
}

impl DryRunChannel {
    pub fn new(sender: Option<String>) -> Self {
        Self {
            sender,
            calls: Cell::new(0),
            messages: Cell::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }

    pub fn messages(&self) -> u32 {
        self.messages.get()
    }

    fn sender(&self) -> &str {
        self.sender.as_deref().unwrap_or("(unset)")
    }
}

impl VoiceChannel for DryRunChannel {
    async fn place_call(&self, number: &str, script: &VoiceScript) -> Result<String, ChannelFailure> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        match &script.callback_url {
            Some(url) => info!("DRYRUN | call {} -> {} | prompt={}", self.sender(), number, url),
            None => info!("DRYRUN | call {} -> {} | say: {}", self.sender(), number, script.text),
        }
        Ok(format!("dry-call-{n}"))
    }
}

impl SmsChannel for DryRunChannel {
    async fn send_sms(&self, number: &str, body: &str) -> Result<String, ChannelFailure> {
        let n = self.messages.get() + 1;
        self.messages.set(n);
        info!(
            "DRYRUN | sms {} -> {} | {}",
            self.sender(),
            number,
            body.replace('\n', " / ")
        );
        Ok(format!("dry-sms-{n}"))
    }
}
