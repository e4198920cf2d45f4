//! The session table and its construction.
//!
//! A [`Schedule`] is built once per calendar instance: business days are
//! enumerated, nominal open/close instants are computed from the exchange's
//! local wall-clock hours, and special opens/closes are overlaid in place on
//! the still-mutable columns. The finished table is then published immutable;
//! nothing mutates it afterward.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use tracing::debug;

use crate::error::{CalendarError, CalendarResult};
use crate::time::{days_at_time, midnight_utc};

use super::definition::CalendarDefinition;
use super::special::special_dates;

/// One trading session: the open and close instants of a single business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub market_open: DateTime<Utc>,
    pub market_close: DateTime<Utc>,
}

/// Immutable session table: one row per business day in range, keyed by the
/// day's UTC midnight, with the session's open and close instants.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// UTC midnights of the business days, strictly increasing
    days: Vec<DateTime<Utc>>,
    /// Parallel to `days`
    sessions: Vec<Session>,
    /// Session dates whose close was overridden by a special close
    early_closes: Vec<DateTime<Utc>>,
    first_trading_day: DateTime<Utc>,
    last_trading_day: DateTime<Utc>,
}

impl Schedule {
    /// Build the session table for `[start, end]`.
    ///
    /// Fails without publishing anything when a special date does not align
    /// to a business day, when the internal columns disagree in length, or
    /// when the range contains no business day at all.
    pub fn build(
        definition: &CalendarDefinition,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CalendarResult<Self> {
        let dates = business_dates(definition, start.date_naive(), end.date_naive());
        if dates.is_empty() {
            return Err(CalendarError::EmptySchedule { start, end });
        }
        let days: Vec<DateTime<Utc>> = dates
            .iter()
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            .collect();

        let tz = definition.timezone;
        let mut opens = days_at_time(&dates, definition.open_time, tz, definition.open_offset);
        let mut closes = days_at_time(&dates, definition.close_time, tz, definition.close_offset);

        let special_opens = special_dates(
            &definition.special_opens,
            &definition.special_opens_adhoc,
            start,
            end,
            tz,
        );
        let special_closes = special_dates(
            &definition.special_closes,
            &definition.special_closes_adhoc,
            start,
            end,
            tz,
        );

        overwrite_special_dates(&days, &mut opens, &special_opens)?;
        overwrite_special_dates(&days, &mut closes, &special_closes)?;

        // Every published row must open before it closes; a special close
        // earlier than the session's open is a configuration error.
        for ((&day, &open), &close) in days.iter().zip(&opens).zip(&closes) {
            if open >= close {
                return Err(CalendarError::InvalidSessionBounds {
                    date: day,
                    open,
                    close,
                });
            }
        }

        let mut early_closes: Vec<DateTime<Utc>> =
            special_closes.iter().map(|dt| midnight_utc(*dt)).collect();
        early_closes.dedup();

        debug!(
            name = %definition.name,
            sessions = days.len(),
            special_opens = special_opens.len(),
            special_closes = special_closes.len(),
            "built calendar schedule"
        );

        let sessions = opens
            .into_iter()
            .zip(closes)
            .map(|(market_open, market_close)| Session {
                market_open,
                market_close,
            })
            .collect();
        let first_trading_day = days[0];
        let last_trading_day = days[days.len() - 1];
        Ok(Self {
            days,
            sessions,
            early_closes,
            first_trading_day,
            last_trading_day,
        })
    }

    /// Ordered session dates (UTC midnights), one per business day.
    pub fn days(&self) -> &[DateTime<Utc>] {
        &self.days
    }

    /// Ordered session rows, parallel to [`Schedule::days`].
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Number of sessions in the table (never zero).
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first_trading_day(&self) -> DateTime<Utc> {
        self.first_trading_day
    }

    pub fn last_trading_day(&self) -> DateTime<Utc> {
        self.last_trading_day
    }

    /// Session dates whose close was overridden by a special close.
    pub fn early_closes(&self) -> &[DateTime<Utc>] {
        &self.early_closes
    }

    /// Index of the session on the calendar day of `dt`, if that day trades.
    pub(crate) fn index_of(&self, dt: DateTime<Utc>) -> Option<usize> {
        self.days.binary_search(&midnight_utc(dt)).ok()
    }
}

/// Calendar dates in `[start, end]` that are neither weekends nor holidays.
fn business_dates(
    definition: &CalendarDefinition,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    let adhoc: HashSet<NaiveDate> = definition.holidays_adhoc.iter().copied().collect();
    let mut dates = Vec::new();
    let mut day = start;
    while day <= end {
        let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
        if !weekend && !adhoc.contains(&day) && !definition.holiday_calendar.is_holiday(day) {
            dates.push(day);
        }
        day += Duration::days(1);
    }
    dates
}

/// Overwrite entries of `opens_or_closes` with the special instants aligned
/// to the same business day.
///
/// Validates everything before writing anything: a misaligned special date
/// or a column length mismatch aborts with no mutation. The length check
/// should never trigger given the construction order above, but the overlay
/// refuses to index on faith.
fn overwrite_special_dates(
    days: &[DateTime<Utc>],
    opens_or_closes: &mut [DateTime<Utc>],
    specials: &[DateTime<Utc>],
) -> CalendarResult<()> {
    if specials.is_empty() {
        return Ok(());
    }
    if days.len() != opens_or_closes.len() {
        return Err(CalendarError::MisalignedSchedule {
            days: days.len(),
            columns: opens_or_closes.len(),
        });
    }

    let mut aligned = Vec::with_capacity(specials.len());
    let mut misaligned = Vec::new();
    for &special in specials {
        match days.binary_search(&midnight_utc(special)) {
            Ok(index) => aligned.push((index, special)),
            Err(_) => misaligned.push(special),
        }
    }
    if !misaligned.is_empty() {
        return Err(CalendarError::MisalignedSpecialDates { dates: misaligned });
    }

    for (index, special) in aligned {
        opens_or_closes[index] = special;
    }
    Ok(())
}
