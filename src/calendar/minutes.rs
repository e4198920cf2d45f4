//! Minute-grid expansion of a session table.
//!
//! At decade scale the grid holds tens of millions of instants, so the
//! whole sequence is sized up front from the per-session counts and filled
//! in one pass. No per-day reallocation.

use chrono::{DateTime, Duration, Utc};

use super::schedule::{Schedule, Session};

/// Minutes in one session, open through close inclusive.
pub(crate) fn session_minute_count(session: &Session) -> usize {
    // +1: a 09:30-16:00 session has 391 minute marks, not 390.
    ((session.market_close - session.market_open).num_minutes() + 1) as usize
}

/// Every minute of one session as a fresh sequence.
pub(crate) fn minute_range(session: &Session) -> Vec<DateTime<Utc>> {
    let mut minutes = Vec::with_capacity(session_minute_count(session));
    fill_session_minutes(&mut minutes, session);
    minutes
}

fn fill_session_minutes(minutes: &mut Vec<DateTime<Utc>>, session: &Session) {
    let count = session_minute_count(session) as i64;
    minutes.extend((0..count).map(|i| session.market_open + Duration::minutes(i)));
}

/// The complete ordered minute grid across every session of the schedule.
pub(crate) fn expand_minutes(schedule: &Schedule) -> Vec<DateTime<Utc>> {
    let total: usize = schedule.sessions().iter().map(session_minute_count).sum();
    let mut minutes = Vec::with_capacity(total);
    for session in schedule.sessions() {
        fill_session_minutes(&mut minutes, session);
    }
    minutes
}
