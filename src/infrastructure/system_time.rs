// System clock time source
use crate::application::provider::TimeSource;
use crate::domain::error::PanelError;
use chrono::{DateTime, Datelike, Utc};

/// Wall-clock time from the OS. A reading before 2020 means the clock was
/// never synced (the device boots at the epoch until NTP succeeds), which
/// the cycle treats as time being unavailable.
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_utc(&self) -> Result<DateTime<Utc>, PanelError> {
        let now = Utc::now();
        if now.year() < 2020 {
            return Err(PanelError::TimeUnavailable);
        }
        Ok(now)
    }
}
