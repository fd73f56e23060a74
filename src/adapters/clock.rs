//! System clock adapter.

use chrono::{DateTime, Utc};

use crate::app::ports::Clock;

/// Wall clock from the host OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
