//! Per-exchange static configuration.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::holidays::RuleCalendar;

/// A local wall-clock time paired with the rule calendar selecting the
/// dates it applies to.
pub type SpecialRule = (NaiveTime, RuleCalendar);

/// A local wall-clock time paired with an explicit list of dates it
/// applies to.
pub type SpecialAdhoc = (NaiveTime, Vec<NaiveDate>);

/// Everything an exchange supplies to have its calendar built.
///
/// Immutable for the lifetime of any calendar instance constructed from it.
/// Open/close day offsets cover exchanges whose session nominally starts or
/// ends on an adjacent calendar day (CME opens at 17:00 the previous
/// evening, so its open offset is -1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDefinition {
    pub name: String,
    pub timezone: Tz,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    #[serde(default)]
    pub open_offset: i64,
    #[serde(default)]
    pub close_offset: i64,
    /// Recurring holidays
    #[serde(default)]
    pub holiday_calendar: RuleCalendar,
    /// One-off closures with no recurring rule
    #[serde(default)]
    pub holidays_adhoc: Vec<NaiveDate>,
    #[serde(default)]
    pub special_opens: Vec<SpecialRule>,
    #[serde(default)]
    pub special_opens_adhoc: Vec<SpecialAdhoc>,
    #[serde(default)]
    pub special_closes: Vec<SpecialRule>,
    #[serde(default)]
    pub special_closes_adhoc: Vec<SpecialAdhoc>,
}

impl CalendarDefinition {
    /// A definition with nominal hours only; add exceptions with the
    /// `with_*` builders.
    pub fn new(
        name: impl Into<String>,
        timezone: Tz,
        open_time: NaiveTime,
        close_time: NaiveTime,
    ) -> Self {
        Self {
            name: name.into(),
            timezone,
            open_time,
            close_time,
            open_offset: 0,
            close_offset: 0,
            holiday_calendar: RuleCalendar::default(),
            holidays_adhoc: Vec::new(),
            special_opens: Vec::new(),
            special_opens_adhoc: Vec::new(),
            special_closes: Vec::new(),
            special_closes_adhoc: Vec::new(),
        }
    }

    pub fn with_open_offset(mut self, days: i64) -> Self {
        self.open_offset = days;
        self
    }

    pub fn with_close_offset(mut self, days: i64) -> Self {
        self.close_offset = days;
        self
    }

    pub fn with_holiday_calendar(mut self, rules: RuleCalendar) -> Self {
        self.holiday_calendar = rules;
        self
    }

    pub fn with_adhoc_holidays(mut self, dates: Vec<NaiveDate>) -> Self {
        self.holidays_adhoc = dates;
        self
    }

    pub fn with_special_open(mut self, time: NaiveTime, rules: RuleCalendar) -> Self {
        self.special_opens.push((time, rules));
        self
    }

    pub fn with_special_open_adhoc(mut self, time: NaiveTime, dates: Vec<NaiveDate>) -> Self {
        self.special_opens_adhoc.push((time, dates));
        self
    }

    pub fn with_special_close(mut self, time: NaiveTime, rules: RuleCalendar) -> Self {
        self.special_closes.push((time, rules));
        self
    }

    pub fn with_special_close_adhoc(mut self, time: NaiveTime, dates: Vec<NaiveDate>) -> Self {
        self.special_closes_adhoc.push((time, dates));
        self
    }
}
