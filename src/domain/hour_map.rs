// Local-time hour mapper - places UTC-stamped points into today's 24 slots
use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

/// Map a UTC instant to a slot (0-23) of the local day `reference_day`
/// (ordinal day-of-year in `tz`). Points whose local day differs are
/// rejected, not clamped: an adjacent UTC day that does not land on the
/// local "today" is dropped.
///
/// Conversion goes through chrono-tz, so it is pure and reentrant; no
/// process-wide timezone state is touched. During a DST fall-back two UTC
/// instants can map to the same slot; the cache's merge layer resolves that
/// by last write wins.
pub fn local_slot(time_utc: DateTime<Utc>, tz: Tz, reference_day: u32) -> Option<usize> {
    let local = time_utc.with_timezone(&tz);
    if local.ordinal() != reference_day {
        return None;
    }
    Some(local.hour() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Australia::Melbourne;
    use chrono_tz::Europe::Berlin;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_utc_evening_lands_on_next_local_day() {
        // 2026-01-03T23:30Z is 2026-01-04 10:30 in Melbourne (UTC+11).
        let t = utc(2026, 1, 3, 23, 30);
        let jan4 = 4;
        assert_eq!(local_slot(t, Melbourne, jan4), Some(10));
    }

    #[test]
    fn test_wrong_reference_day_is_rejected() {
        let t = utc(2026, 1, 3, 23, 30);
        let jan3 = 3;
        assert_eq!(local_slot(t, Melbourne, jan3), None);
    }

    #[test]
    fn test_local_midnight_boundary() {
        // 13:00Z on Jan 3 is exactly local midnight of Jan 4 in Melbourne.
        assert_eq!(local_slot(utc(2026, 1, 3, 13, 0), Melbourne, 4), Some(0));
        assert_eq!(local_slot(utc(2026, 1, 3, 12, 59), Melbourne, 3), Some(23));
    }

    #[test]
    fn test_dst_fall_back_duplicate_hour() {
        // Berlin leaves DST on 2026-10-25: 00:30Z and 01:30Z both map to
        // local 02:30 (first CEST, then CET). Both land in slot 2; the
        // merge layer keeps the later write.
        let day = utc(2026, 10, 25, 0, 30).with_timezone(&Berlin).ordinal();
        assert_eq!(local_slot(utc(2026, 10, 25, 0, 30), Berlin, day), Some(2));
        assert_eq!(local_slot(utc(2026, 10, 25, 1, 30), Berlin, day), Some(2));
    }
}
