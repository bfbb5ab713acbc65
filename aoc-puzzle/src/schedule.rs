//! Release schedule of the event
//!
//! Puzzles unlock at midnight US Eastern time (UTC-5), one per day starting
//! December 1st. Events before 2025 run 25 days, later ones 12.

use crate::identity::{FIRST_YEAR, PuzzleIdentity};
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};

/// Offset of the release time zone from UTC, in hours
const RELEASE_UTC_OFFSET_HOURS: i64 = -5;

/// Number of puzzles in the event of `year`
pub fn days_in_event(year: u16) -> u8 {
    if year >= 2025 { 12 } else { 25 }
}

/// Moment the puzzle of `identity` unlocks
pub fn unlock_time(identity: PuzzleIdentity) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(i32::from(identity.year()), 12, u32::from(identity.day()))?;
    let local_midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(local_midnight - TimeDelta::hours(RELEASE_UTC_OFFSET_HOURS))
}

/// Whether the puzzle of `identity` is available at `now`
pub fn is_unlocked(identity: PuzzleIdentity, now: DateTime<Utc>) -> bool {
    identity.day() <= days_in_event(identity.year())
        && unlock_time(identity).is_some_and(|t| t <= now)
}

/// Most recently unlocked day of the `year` event at `now`
///
/// Returns `None` before the first puzzle of that event is out.
pub fn latest_unlocked_day(year: u16, now: DateTime<Utc>) -> Option<u8> {
    if year < FIRST_YEAR {
        return None;
    }
    (1..=days_in_event(year)).rev().find(|&day| {
        PuzzleIdentity::new(year, day).is_ok_and(|identity| is_unlocked(identity, now))
    })
}

/// Year of the most recent event that has started at `now`
pub fn current_event_year(now: DateTime<Utc>) -> u16 {
    let release_local = now + TimeDelta::hours(RELEASE_UTC_OFFSET_HOURS);
    let year = u16::try_from(release_local.year()).unwrap_or(FIRST_YEAR);
    let year = if release_local.month() == 12 { year } else { year.saturating_sub(1) };
    year.max(FIRST_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_unlock_time_is_midnight_eastern() {
        let identity = PuzzleIdentity::new(2024, 6).unwrap();
        assert_eq!(unlock_time(identity), Some(at(2024, 12, 6, 5)));
    }

    #[test]
    fn test_latest_day_during_event() {
        assert_eq!(latest_unlocked_day(2024, at(2024, 12, 6, 4)), Some(5));
        assert_eq!(latest_unlocked_day(2024, at(2024, 12, 6, 5)), Some(6));
    }

    #[test]
    fn test_latest_day_before_and_after_event() {
        assert_eq!(latest_unlocked_day(2024, at(2024, 11, 30, 12)), None);
        assert_eq!(latest_unlocked_day(2023, at(2024, 6, 1, 0)), Some(25));
        assert_eq!(latest_unlocked_day(2025, at(2026, 1, 1, 0)), Some(12));
    }

    #[test]
    fn test_days_in_event() {
        assert_eq!(days_in_event(2015), 25);
        assert_eq!(days_in_event(2024), 25);
        assert_eq!(days_in_event(2025), 12);
    }

    #[test]
    fn test_current_event_year() {
        assert_eq!(current_event_year(at(2024, 12, 1, 5)), 2024);
        // Still November 30th on the US east coast
        assert_eq!(current_event_year(at(2024, 12, 1, 4)), 2023);
        assert_eq!(current_event_year(at(2025, 1, 15, 0)), 2024);
        assert_eq!(current_event_year(at(2026, 10, 18, 12)), 2025);
    }

    #[test]
    fn test_future_years_are_locked() {
        let identity = PuzzleIdentity::new(2030, 1).unwrap();
        assert!(!is_unlocked(identity, at(2026, 10, 18, 0)));
        assert_eq!(latest_unlocked_day(2030, at(2026, 10, 18, 0)), None);
    }
}
