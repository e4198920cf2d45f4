//! Merging of special open/close exception dates.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::time::days_at_time;

use super::definition::{SpecialAdhoc, SpecialRule};

/// Union rule-driven and ad-hoc exception dates into one sorted,
/// de-duplicated sequence of UTC instants restricted to `[start, end]`.
///
/// Shared logic for special opens and special closes: each rule calendar
/// contributes its holiday dates at the paired local time, each ad-hoc list
/// contributes its dates at its paired local time.
pub(crate) fn special_dates(
    rules: &[SpecialRule],
    adhoc: &[SpecialAdhoc],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: Tz,
) -> Vec<DateTime<Utc>> {
    let mut instants = Vec::new();
    for (time, calendar) in rules {
        let dates = calendar.holidays_in_range(start.date_naive(), end.date_naive());
        instants.extend(days_at_time(&dates, *time, tz, 0));
    }
    for (time, dates) in adhoc {
        instants.extend(days_at_time(dates, *time, tz, 0));
    }
    instants.retain(|instant| *instant >= start && *instant <= end);
    instants.sort_unstable();
    instants.dedup();
    instants
}
