//! Recurring holiday rules.
//!
//! Exchange holiday calendars mix a handful of shapes: fixed dates with
//! weekend-observance shifts (New Year's Day, Christmas), nth-weekday-of-month
//! dates (Thanksgiving, US Labor Day), last-weekday-of-month dates (Memorial
//! Day, UK bank holidays), and Easter-anchored dates (Good Friday, Easter
//! Monday). [`RuleCalendar`] bundles a set of rules into the holiday
//! predicate consumed by the schedule builder; the same type also drives
//! rule-based special opens/closes (e.g. half days before a holiday).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// How a fixed-date holiday shifts when it lands on a weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Observance {
    /// Observed on the nominal date, weekend or not
    Exact,
    /// Saturday -> Friday, Sunday -> Monday (US federal style)
    Nearest,
    /// Sunday -> Monday, Saturday unobserved elsewhere (NYSE New Year's Day)
    SundayToMonday,
    /// Saturday or Sunday -> following Monday
    NextMonday,
    /// Saturday or Sunday -> two days later; lets paired holidays such as UK
    /// Christmas and Boxing Day claim consecutive substitute weekdays
    WeekendPlusTwo,
    /// Weekend occurrences are dropped entirely
    SkipWeekend,
}

impl Observance {
    /// Apply the shift, or `None` when the occurrence is not observed.
    pub fn observe(self, date: NaiveDate) -> Option<NaiveDate> {
        let shifted = match (self, date.weekday()) {
            (Observance::Nearest, Weekday::Sat) => date - Duration::days(1),
            (Observance::Nearest, Weekday::Sun) => date + Duration::days(1),
            (Observance::SundayToMonday, Weekday::Sun) => date + Duration::days(1),
            (Observance::NextMonday, Weekday::Sat) => date + Duration::days(2),
            (Observance::NextMonday, Weekday::Sun) => date + Duration::days(1),
            (Observance::WeekendPlusTwo, Weekday::Sat | Weekday::Sun) => date + Duration::days(2),
            (Observance::SkipWeekend, Weekday::Sat | Weekday::Sun) => return None,
            _ => date,
        };
        Some(shifted)
    }
}

/// One recurring holiday, producing at most one date per year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HolidayRule {
    /// A fixed month/day with an observance shift and an optional weekday
    /// filter on the observed date (e.g. Christmas Eve half days only apply
    /// Monday through Thursday)
    Fixed {
        month: u32,
        day: u32,
        observance: Observance,
        #[serde(default)]
        days_of_week: Option<Vec<Weekday>>,
    },
    /// The nth given weekday of a month, shifted by `offset_days` (the day
    /// after the fourth Thursday of November is `offset_days = 1`)
    NthWeekday {
        month: u32,
        weekday: Weekday,
        nth: u8,
        #[serde(default)]
        offset_days: i64,
    },
    /// The last given weekday of a month
    LastWeekday { month: u32, weekday: Weekday },
    /// A fixed offset in days from Easter Sunday (Good Friday is -2)
    EasterOffset { days: i64 },
}

impl HolidayRule {
    pub fn fixed(month: u32, day: u32) -> Self {
        Self::fixed_observed(month, day, Observance::Exact)
    }

    pub fn fixed_observed(month: u32, day: u32, observance: Observance) -> Self {
        HolidayRule::Fixed {
            month,
            day,
            observance,
            days_of_week: None,
        }
    }

    pub fn fixed_on_days(month: u32, day: u32, days_of_week: Vec<Weekday>) -> Self {
        HolidayRule::Fixed {
            month,
            day,
            observance: Observance::Exact,
            days_of_week: Some(days_of_week),
        }
    }

    pub fn nth_weekday(month: u32, weekday: Weekday, nth: u8) -> Self {
        HolidayRule::NthWeekday {
            month,
            weekday,
            nth,
            offset_days: 0,
        }
    }

    pub fn nth_weekday_offset(month: u32, weekday: Weekday, nth: u8, offset_days: i64) -> Self {
        HolidayRule::NthWeekday {
            month,
            weekday,
            nth,
            offset_days,
        }
    }

    pub fn last_weekday(month: u32, weekday: Weekday) -> Self {
        HolidayRule::LastWeekday { month, weekday }
    }

    pub fn easter_offset(days: i64) -> Self {
        HolidayRule::EasterOffset { days }
    }

    /// The observed occurrence for a given year, if any.
    ///
    /// Observance shifts can push the result into an adjacent year
    /// (Jan 1 on a Saturday observed Dec 31, for instance).
    pub fn date_in_year(&self, year: i32) -> Option<NaiveDate> {
        match self {
            HolidayRule::Fixed {
                month,
                day,
                observance,
                days_of_week,
            } => {
                let nominal = NaiveDate::from_ymd_opt(year, *month, *day)?;
                let observed = observance.observe(nominal)?;
                match days_of_week {
                    Some(mask) if !mask.contains(&observed.weekday()) => None,
                    _ => Some(observed),
                }
            }
            HolidayRule::NthWeekday {
                month,
                weekday,
                nth,
                offset_days,
            } => nth_weekday_of_month(year, *month, *weekday, *nth)
                .map(|d| d + Duration::days(*offset_days)),
            HolidayRule::LastWeekday { month, weekday } => {
                last_weekday_of_month(year, *month, *weekday)
            }
            HolidayRule::EasterOffset { days } => {
                easter_sunday(year).map(|d| d + Duration::days(*days))
            }
        }
    }
}

/// An immutable set of holiday rules acting as a date predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleCalendar {
    rules: Vec<HolidayRule>,
}

impl RuleCalendar {
    pub fn new(rules: Vec<HolidayRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[HolidayRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True if any rule observes a holiday on `date`.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        // Observance shifts can cross a year boundary, so probe the
        // occurrence years either side of the query date's year.
        (date.year() - 1..=date.year() + 1).any(|year| {
            self.rules
                .iter()
                .any(|rule| rule.date_in_year(year) == Some(date))
        })
    }

    /// All observed holiday dates in `[start, end]`, sorted and de-duplicated.
    pub fn holidays_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        for year in start.year() - 1..=end.year() + 1 {
            for rule in &self.rules {
                if let Some(date) = rule.date_in_year(year) {
                    if date >= start && date <= end {
                        dates.push(date);
                    }
                }
            }
        }
        dates.sort_unstable();
        dates.dedup();
        dates
    }
}

/// Easter Sunday in the Gregorian calendar (Meeus/Jones/Butcher computus).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: u8) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let shift = (weekday.num_days_from_monday() + 7 - first.weekday().num_days_from_monday()) % 7;
    let date = first + Duration::days(i64::from(shift) + 7 * (i64::from(nth) - 1));
    (date.month() == month).then_some(date)
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_month_first - Duration::days(1);
    let back = (last.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
    Some(last - Duration::days(i64::from(back)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_easter_sunday_known_years() {
        assert_eq!(easter_sunday(2021), Some(date(2021, 4, 4)));
        assert_eq!(easter_sunday(2023), Some(date(2023, 4, 9)));
        assert_eq!(easter_sunday(2024), Some(date(2024, 3, 31)));
    }

    #[test]
    fn test_good_friday() {
        let rule = HolidayRule::easter_offset(-2);
        assert_eq!(rule.date_in_year(2023), Some(date(2023, 4, 7)));
        assert_eq!(rule.date_in_year(2024), Some(date(2024, 3, 29)));
    }

    #[test]
    fn test_nth_weekday() {
        // MLK Day: third Monday of January.
        let rule = HolidayRule::nth_weekday(1, Weekday::Mon, 3);
        assert_eq!(rule.date_in_year(2024), Some(date(2024, 1, 15)));

        // Thanksgiving: fourth Thursday of November.
        let rule = HolidayRule::nth_weekday(11, Weekday::Thu, 4);
        assert_eq!(rule.date_in_year(2024), Some(date(2024, 11, 28)));

        // Day after Thanksgiving is always the Friday after, even when the
        // month starts on a Friday and the fourth Friday precedes it.
        let rule = HolidayRule::nth_weekday_offset(11, Weekday::Thu, 4, 1);
        assert_eq!(rule.date_in_year(2019), Some(date(2019, 11, 29)));
        assert_eq!(rule.date_in_year(2024), Some(date(2024, 11, 29)));
    }

    #[test]
    fn test_last_weekday() {
        // Memorial Day: last Monday of May.
        let rule = HolidayRule::last_weekday(5, Weekday::Mon);
        assert_eq!(rule.date_in_year(2024), Some(date(2024, 5, 27)));
        // UK summer bank holiday: last Monday of August.
        let rule = HolidayRule::last_weekday(8, Weekday::Mon);
        assert_eq!(rule.date_in_year(2023), Some(date(2023, 8, 28)));
    }

    #[test]
    fn test_observance_nearest() {
        // Christmas 2021 fell on a Saturday, observed Friday Dec 24.
        let rule = HolidayRule::fixed_observed(12, 25, Observance::Nearest);
        assert_eq!(rule.date_in_year(2021), Some(date(2021, 12, 24)));
        // Christmas 2022 fell on a Sunday, observed Monday Dec 26.
        assert_eq!(rule.date_in_year(2022), Some(date(2022, 12, 26)));
    }

    #[test]
    fn test_observance_sunday_to_monday() {
        let rule = HolidayRule::fixed_observed(1, 1, Observance::SundayToMonday);
        // 2023-01-01 was a Sunday, observed Monday Jan 2.
        assert_eq!(rule.date_in_year(2023), Some(date(2023, 1, 2)));
        // 2022-01-01 was a Saturday: left in place (and skipped as a weekend
        // by the business-day filter).
        assert_eq!(rule.date_in_year(2022), Some(date(2022, 1, 1)));
    }

    #[test]
    fn test_observance_weekend_plus_two() {
        // UK 2021: Christmas Sat -> Mon 27, Boxing Day Sun -> Tue 28.
        let christmas = HolidayRule::fixed_observed(12, 25, Observance::WeekendPlusTwo);
        let boxing = HolidayRule::fixed_observed(12, 26, Observance::WeekendPlusTwo);
        assert_eq!(christmas.date_in_year(2021), Some(date(2021, 12, 27)));
        assert_eq!(boxing.date_in_year(2021), Some(date(2021, 12, 28)));
    }

    #[test]
    fn test_observance_skip_weekend() {
        let rule = HolidayRule::fixed_observed(12, 31, Observance::SkipWeekend);
        // 2022-12-31 was a Saturday: no occurrence that year.
        assert_eq!(rule.date_in_year(2022), None);
        assert_eq!(rule.date_in_year(2024), Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_days_of_week_filter() {
        // Christmas Eve half day only applies Monday through Thursday.
        let rule = HolidayRule::fixed_on_days(
            12,
            24,
            vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu],
        );
        // 2024-12-24 was a Tuesday.
        assert_eq!(rule.date_in_year(2024), Some(date(2024, 12, 24)));
        // 2021-12-24 was a Friday (observed Christmas): filtered out.
        assert_eq!(rule.date_in_year(2021), None);
    }

    #[test]
    fn test_rule_calendar_predicate_and_range() {
        let cal = RuleCalendar::new(vec![
            HolidayRule::fixed_observed(1, 1, Observance::SundayToMonday),
            HolidayRule::easter_offset(-2),
            HolidayRule::nth_weekday(11, Weekday::Thu, 4),
        ]);

        assert!(cal.is_holiday(date(2023, 1, 2))); // observed New Year
        assert!(!cal.is_holiday(date(2023, 1, 1))); // nominal date unobserved
        assert!(cal.is_holiday(date(2023, 4, 7))); // Good Friday
        assert!(!cal.is_holiday(date(2023, 4, 10)));

        let holidays = cal.holidays_in_range(date(2023, 1, 1), date(2023, 12, 31));
        assert_eq!(
            holidays,
            vec![date(2023, 1, 2), date(2023, 4, 7), date(2023, 11, 23)]
        );
    }

    #[test]
    fn test_observance_crossing_year_boundary() {
        // July 4-style Nearest on Jan 1: Saturday 2022-01-01 observed
        // Friday 2021-12-31, which belongs to the previous calendar year.
        let cal = RuleCalendar::new(vec![HolidayRule::fixed_observed(1, 1, Observance::Nearest)]);
        assert!(cal.is_holiday(date(2021, 12, 31)));
        assert_eq!(
            cal.holidays_in_range(date(2021, 12, 1), date(2021, 12, 31)),
            vec![date(2021, 12, 31)]
        );
    }
}
