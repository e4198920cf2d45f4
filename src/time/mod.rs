//! Civil-time arithmetic shared by the schedule builder.
//!
//! All session math resolves the *local* wall-clock time in the exchange
//! timezone first and converts to UTC second, so daylight-saving
//! transitions shift the UTC open/close instants the way the exchange
//! actually experiences them.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Normalize an instant to the UTC midnight of its calendar day.
///
/// Session tables are keyed by these midnights.
pub fn midnight_utc(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Shift a sequence of calendar dates to wall-clock time `t` in `tz`,
/// `day_offset` whole days later (or earlier, when negative), and return
/// the resulting UTC instants in input order.
///
/// Any time-of-day carried by the inputs is irrelevant: only the calendar
/// date is used.
pub fn days_at_time(days: &[NaiveDate], t: NaiveTime, tz: Tz, day_offset: i64) -> Vec<DateTime<Utc>> {
    days.iter()
        .map(|&day| day_at_time(day, t, tz, day_offset))
        .collect()
}

/// Single-date form of [`days_at_time`].
pub fn day_at_time(day: NaiveDate, t: NaiveTime, tz: Tz, day_offset: i64) -> DateTime<Utc> {
    let local_day = day + Duration::days(day_offset);
    resolve_local(tz, local_day.and_time(t)).with_timezone(&Utc)
}

/// Map a naive local datetime onto the timezone's timeline.
///
/// chrono has no built-in resolution policy, so the crate defines one:
/// ambiguous wall-clock times (fall-back) take the earliest instant, and
/// nonexistent wall-clock times (spring-forward) roll forward until the
/// clock exists again.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut probe = local + Duration::hours(1);
            loop {
                match tz.from_local_datetime(&probe) {
                    LocalResult::Single(dt) => return dt,
                    LocalResult::Ambiguous(earliest, _) => return earliest,
                    // DST gaps are at most a few hours wide
                    LocalResult::None => probe += Duration::hours(1),
                }
            }
        }
    }
}
