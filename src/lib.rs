//! Exchange trading calendars for backtesting and simulation engines.
//!
//! A calendar is built once from a [`CalendarDefinition`] (timezone, nominal
//! open/close times, holiday rules, special open/close exceptions) and then
//! answers timing queries against an immutable session table: is the market
//! open at time T, what is the next/previous session, what are the open and
//! close instants of a session, and what is the full minute grid across the
//! horizon.

pub mod calendar;
pub mod error;
pub mod exchanges;
pub mod holidays;
pub mod registry;
pub mod time;

pub use calendar::{
    CalendarDefinition, ExchangeCalendar, MarketCalendar, Schedule, Session,
};
pub use error::{CalendarError, CalendarResult, Direction};
pub use holidays::{HolidayRule, Observance, RuleCalendar};
pub use registry::{clear_calendars, deregister_calendar, get_calendar, register_calendar};
