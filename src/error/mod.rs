//! Consolidated error handling for the calendar crate.
//!
//! Three failure families, all surfaced synchronously at the call that
//! triggers them:
//! - configuration errors found while building a schedule (the calendar is
//!   never published partially built)
//! - range errors from navigation past either end of the session table
//! - registry errors (name collisions, unknown names)

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Direction of a navigation request that ran out of tabulated sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// Errors raised by calendar construction, navigation, and the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CalendarError {
    /// Lookup of a name with no registered calendar and no known constructor
    #[error("Invalid calendar name: {name}")]
    InvalidCalendarName { name: String },

    /// Registration under a name that is already taken
    #[error("A calendar is already registered under the name: {name}")]
    CalendarNameCollision { name: String },

    /// Navigation walked past the first or last tabulated session
    #[error("No further {direction} data in calendar (bound: {bound})")]
    NoFurtherData {
        direction: Direction,
        bound: DateTime<Utc>,
    },

    /// A special open/close instant does not fall on any business day
    #[error("Special dates are not trading days: {dates:?}")]
    MisalignedSpecialDates { dates: Vec<DateTime<Utc>> },

    /// The business-day sequence and an open/close column disagree in length
    #[error("Misaligned schedule: {days} business days but {columns} open/close entries")]
    MisalignedSchedule { days: usize, columns: usize },

    /// A session's open does not precede its close after special overlays
    #[error("Session on {date} opens at {open} but closes at {close}")]
    InvalidSessionBounds {
        date: DateTime<Utc>,
        open: DateTime<Utc>,
        close: DateTime<Utc>,
    },

    /// No business day exists in the requested range
    #[error("No business days between {start} and {end}")]
    EmptySchedule {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A session-level query was made for a date with no session
    #[error("{date} is not a trading session")]
    NotASession { date: DateTime<Utc> },
}
