//! London Stock Exchange.

use chrono::{NaiveDate, NaiveTime, Weekday};

use crate::calendar::CalendarDefinition;
use crate::holidays::{HolidayRule, Observance, RuleCalendar};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Regular session 08:00-16:30 Europe/London.
///
/// UK bank-holiday substitution: a holiday landing on a weekend moves to
/// the next working day, and because Christmas and Boxing Day are
/// consecutive they shift as a pair when either hits the weekend.
pub fn lse() -> CalendarDefinition {
    let holidays = RuleCalendar::new(vec![
        HolidayRule::fixed_observed(1, 1, Observance::NextMonday), // New Year's Day
        HolidayRule::easter_offset(-2),                            // Good Friday
        HolidayRule::easter_offset(1),                             // Easter Monday
        HolidayRule::nth_weekday(5, Weekday::Mon, 1),              // Early May bank holiday
        HolidayRule::last_weekday(5, Weekday::Mon),                // Spring bank holiday
        HolidayRule::last_weekday(8, Weekday::Mon),                // Summer bank holiday
        HolidayRule::fixed_observed(12, 25, Observance::WeekendPlusTwo), // Christmas
        HolidayRule::fixed_observed(12, 26, Observance::WeekendPlusTwo), // Boxing Day
    ]);

    let half_day = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
    let half_days = RuleCalendar::new(vec![
        HolidayRule::fixed_observed(12, 24, Observance::SkipWeekend), // Christmas Eve
        HolidayRule::fixed_observed(12, 31, Observance::SkipWeekend), // New Year's Eve
    ]);

    CalendarDefinition::new(
        "LSE",
        chrono_tz::Europe::London,
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
    )
    .with_holiday_calendar(holidays)
    .with_adhoc_holidays(vec![
        // Royal wedding
        date(2011, 4, 29),
        // Queen's Diamond Jubilee; the spring bank holiday moved to June 4
        // with an extra holiday on June 5.
        date(2012, 6, 4),
        date(2012, 6, 5),
    ])
    .with_special_close(half_day, half_days)
}
