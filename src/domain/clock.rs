// Logical wake-cycle clock - all freshness decisions are judged against it
use chrono::{DateTime, Datelike, TimeZone, Timelike};

/// Snapshot of the device's local calendar position, taken once per wake
/// cycle. Never mutated afterwards; every staleness decision in the cache
/// compares against the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalClock {
    pub day_of_year: u32,
    pub hour_of_day: u32,
}

impl LogicalClock {
    pub fn from_local<Tz: TimeZone>(local: &DateTime<Tz>) -> Self {
        Self {
            day_of_year: local.ordinal(),
            hour_of_day: local.hour(),
        }
    }
}

/// Seconds to sleep so the next wake lands on the next hour boundary.
/// Clamped to at least one second so a wake at xx:59:59 does not busy-loop.
pub fn seconds_until_next_hour<Tz: TimeZone>(local: &DateTime<Tz>) -> u64 {
    let elapsed = u64::from(local.minute() * 60 + local.second());
    (3600 - elapsed).max(1)
}
