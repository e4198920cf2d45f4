//! Exchange calendars: immutable session tables with navigation and
//! minute grids.
//!
//! [`ExchangeCalendar`] owns a [`Schedule`] built once from a
//! [`CalendarDefinition`] and exposes the full query surface. The expensive
//! minute grid is computed lazily on first access and memoized; everything
//! else is a binary-search read, safe for unlimited concurrent readers.

mod definition;
mod minutes;
mod navigation;
mod schedule;
mod special;

pub use definition::{CalendarDefinition, SpecialAdhoc, SpecialRule};
pub use schedule::{Schedule, Session};

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::CalendarResult;
use crate::time::midnight_utc;

/// Forward buffer past "today" so consumers can always ask for the next
/// session or minute.
const END_BUFFER_DAYS: i64 = 365;

/// Default horizon start: 1990-01-01 UTC.
pub fn default_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()
}

/// Default horizon end: today's UTC midnight plus a one-year buffer.
pub fn default_end() -> DateTime<Utc> {
    midnight_utc(Utc::now()) + Duration::days(END_BUFFER_DAYS)
}

/// The timing capability set every market calendar provides.
///
/// Concrete exchanges are just configuration: one [`ExchangeCalendar`]
/// implementation derives all of these from its session table.
pub trait MarketCalendar {
    /// Exchange name, e.g. `NYSE`, `CME`, `LSE`.
    fn name(&self) -> &str;

    /// The exchange's native timezone.
    fn tz(&self) -> Tz;

    /// Is the exchange open at minute `dt` (session boundaries inclusive)?
    fn is_open_on_minute(&self, dt: DateTime<Utc>) -> bool;

    /// Is the exchange open at any time during the calendar day of `dt`?
    fn is_open_on_day(&self, dt: DateTime<Utc>) -> bool;

    /// Session dates within `[start, end]`.
    fn trading_days(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> &[DateTime<Utc>];

    /// Open and close instants of the session on the calendar day of `date`.
    fn open_and_close(&self, date: DateTime<Utc>) -> CalendarResult<Session>;

    /// Session date containing `dt`, or the next session's date when `dt`
    /// falls while the market is closed.
    fn session_date(&self, dt: DateTime<Utc>) -> CalendarResult<DateTime<Utc>>;
}

/// A single exchange's trading calendar over a fixed horizon.
pub struct ExchangeCalendar {
    definition: CalendarDefinition,
    schedule: Schedule,
    /// Lazily expanded minute grid; at most one computation even under
    /// concurrent first access.
    minutes: OnceCell<Vec<DateTime<Utc>>>,
}

impl ExchangeCalendar {
    /// Build a calendar from a definition over `[start, end]`, defaulting
    /// to the crate horizon when bounds are omitted.
    pub fn new(
        definition: CalendarDefinition,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> CalendarResult<Self> {
        let start = start.unwrap_or_else(default_start);
        let end = end.unwrap_or_else(default_end);
        let schedule = Schedule::build(&definition, start, end)?;
        info!(
            name = %definition.name,
            sessions = schedule.len(),
            %start,
            %end,
            "constructed exchange calendar"
        );
        Ok(Self {
            definition,
            schedule,
            minutes: OnceCell::new(),
        })
    }

    pub fn definition(&self) -> &CalendarDefinition {
        &self.definition
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn first_trading_day(&self) -> DateTime<Utc> {
        self.schedule.first_trading_day()
    }

    pub fn last_trading_day(&self) -> DateTime<Utc> {
        self.schedule.last_trading_day()
    }

    /// Session dates whose close was overridden by a special close.
    pub fn early_closes(&self) -> &[DateTime<Utc>] {
        self.schedule.early_closes()
    }

    /// Every session date in the horizon.
    pub fn all_trading_days(&self) -> &[DateTime<Utc>] {
        self.schedule.days()
    }

    /// Every tradable minute in the horizon, open through close inclusive
    /// per session. Expanded on first access and cached.
    pub fn all_trading_minutes(&self) -> &[DateTime<Utc>] {
        self.minutes
            .get_or_init(|| minutes::expand_minutes(&self.schedule))
    }

    pub fn next_trading_day(&self, date: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        self.schedule.next_trading_day(date)
    }

    pub fn previous_trading_day(&self, date: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        self.schedule.previous_trading_day(date)
    }

    pub fn next_open_and_close(&self, date: DateTime<Utc>) -> CalendarResult<Session> {
        self.schedule.next_open_and_close(date)
    }

    pub fn previous_open_and_close(&self, date: DateTime<Utc>) -> CalendarResult<Session> {
        self.schedule.previous_open_and_close(date)
    }

    pub fn trading_day_distance(&self, first: DateTime<Utc>, second: DateTime<Utc>) -> i64 {
        self.schedule.trading_day_distance(first, second)
    }

    pub fn trading_minutes_for_day(
        &self,
        day: DateTime<Utc>,
    ) -> CalendarResult<Vec<DateTime<Utc>>> {
        self.schedule.trading_minutes_for_day(day)
    }

    pub fn trading_days_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> &[DateTime<Utc>] {
        self.schedule.trading_days_in_range(start, end)
    }

    pub fn trading_minutes_for_days_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<DateTime<Utc>> {
        self.schedule.trading_minutes_for_days_in_range(start, end)
    }

    pub fn add_trading_days(&self, n: i64, date: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        self.schedule.add_trading_days(n, date)
    }

    pub fn next_trading_minute(&self, start: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        self.schedule.next_trading_minute(start)
    }

    pub fn previous_trading_minute(&self, start: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        self.schedule.previous_trading_minute(start)
    }
}

impl MarketCalendar for ExchangeCalendar {
    fn name(&self) -> &str {
        &self.definition.name
    }

    fn tz(&self) -> Tz {
        self.definition.timezone
    }

    fn is_open_on_minute(&self, dt: DateTime<Utc>) -> bool {
        self.schedule.is_open_on_minute(dt)
    }

    fn is_open_on_day(&self, dt: DateTime<Utc>) -> bool {
        self.schedule.is_open_on_day(dt)
    }

    fn trading_days(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> &[DateTime<Utc>] {
        self.schedule.trading_days_in_range(start, end)
    }

    fn open_and_close(&self, date: DateTime<Utc>) -> CalendarResult<Session> {
        self.schedule.open_and_close(date)
    }

    fn session_date(&self, dt: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        self.schedule.session_date(dt)
    }
}
