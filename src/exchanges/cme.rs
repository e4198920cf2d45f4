//! Chicago Mercantile Exchange (Globex).

use chrono::{NaiveTime, Weekday};

use crate::calendar::CalendarDefinition;
use crate::holidays::{HolidayRule, Observance, RuleCalendar};

/// Globex session: opens 17:00 America/Chicago the evening before each
/// trading day and closes 16:00 on the day itself, hence the -1 open
/// offset.
///
/// Most US holidays are abbreviated sessions rather than full closures;
/// the exchange only halts outright for New Year's, Good Friday and
/// Christmas. Abbreviated days close at 12:00.
pub fn cme() -> CalendarDefinition {
    let holidays = RuleCalendar::new(vec![
        HolidayRule::fixed_observed(1, 1, Observance::SundayToMonday),
        HolidayRule::easter_offset(-2),
        HolidayRule::fixed_observed(12, 25, Observance::Nearest),
    ]);

    let abbreviated = RuleCalendar::new(vec![
        HolidayRule::nth_weekday(1, Weekday::Mon, 3), // Martin Luther King Jr. Day
        HolidayRule::nth_weekday(2, Weekday::Mon, 3), // Presidents' Day
        HolidayRule::last_weekday(5, Weekday::Mon),   // Memorial Day
        HolidayRule::fixed_observed(7, 4, Observance::Nearest), // Independence Day
        HolidayRule::nth_weekday(9, Weekday::Mon, 1), // Labor Day
        HolidayRule::nth_weekday(11, Weekday::Thu, 4), // Thanksgiving
    ]);

    CalendarDefinition::new(
        "CME",
        chrono_tz::America::Chicago,
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
    )
    .with_open_offset(-1)
    .with_holiday_calendar(holidays)
    .with_special_close(NaiveTime::from_hms_opt(12, 0, 0).unwrap(), abbreviated)
}
