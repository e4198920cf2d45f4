//! New York Stock Exchange.

use chrono::{NaiveDate, NaiveTime, Weekday};

use crate::calendar::CalendarDefinition;
use crate::holidays::{HolidayRule, Observance, RuleCalendar};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Regular session 09:30-16:00 America/New_York.
///
/// Early closes at 13:00 on the day after Thanksgiving and, when they fall
/// on a weekday that is itself a session, on July 3rd and Christmas Eve.
/// The weekday masks keep those rules off dates absorbed by the observed
/// holiday (July 3rd on a Friday is the observed July 4th, not a half day).
pub fn nyse() -> CalendarDefinition {
    let holidays = RuleCalendar::new(vec![
        // New Year's Day; Saturday stays unobserved, the following Jan 2
        // session is regular.
        HolidayRule::fixed_observed(1, 1, Observance::SundayToMonday),
        HolidayRule::nth_weekday(1, Weekday::Mon, 3), // Martin Luther King Jr. Day
        HolidayRule::nth_weekday(2, Weekday::Mon, 3), // Washington's Birthday
        HolidayRule::easter_offset(-2),               // Good Friday
        HolidayRule::last_weekday(5, Weekday::Mon),   // Memorial Day
        HolidayRule::fixed_observed(7, 4, Observance::Nearest), // Independence Day
        HolidayRule::nth_weekday(9, Weekday::Mon, 1), // Labor Day
        HolidayRule::nth_weekday(11, Weekday::Thu, 4), // Thanksgiving
        HolidayRule::fixed_observed(12, 25, Observance::Nearest), // Christmas
    ]);

    let early_close = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
    let weekdays_before_friday = vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu];
    let special_closes = RuleCalendar::new(vec![
        HolidayRule::nth_weekday_offset(11, Weekday::Thu, 4, 1), // day after Thanksgiving
        HolidayRule::fixed_on_days(7, 3, weekdays_before_friday.clone()),
        HolidayRule::fixed_on_days(12, 24, weekdays_before_friday),
    ]);

    CalendarDefinition::new(
        "NYSE",
        chrono_tz::America::New_York,
        NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
    )
    .with_holiday_calendar(holidays)
    .with_adhoc_holidays(vec![
        // September 11 attacks
        date(2001, 9, 11),
        date(2001, 9, 12),
        date(2001, 9, 13),
        date(2001, 9, 14),
        // Mourning for President Reagan
        date(2004, 6, 11),
        // Mourning for President Ford
        date(2007, 1, 2),
        // Hurricane Sandy
        date(2012, 10, 29),
        date(2012, 10, 30),
        // Mourning for President G.H.W. Bush
        date(2018, 12, 5),
    ])
    .with_special_close(early_close, special_closes)
    // Circuit-breaker halt during the October 1997 mini-crash.
    .with_special_close_adhoc(
        NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
        vec![date(1997, 10, 27)],
    )
}
