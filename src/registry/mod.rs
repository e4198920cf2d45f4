//! Process-wide calendar registry.
//!
//! Calendars are expensive to construct, so lookups by exchange name share
//! one [`ExchangeCalendar`] instance behind an `Arc`. Built-in names are
//! constructed on first request; anything else must be registered
//! explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::calendar::ExchangeCalendar;
use crate::error::{CalendarError, CalendarResult};
use crate::exchanges;

static CALENDARS: Lazy<RwLock<HashMap<String, Arc<ExchangeCalendar>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a calendar under its own name.
///
/// Fails with [`CalendarError::CalendarNameCollision`] when the name is
/// taken and `force` is false; with `force`, the previous registration is
/// replaced. Returns the shared handle now held by the registry.
pub fn register_calendar(
    calendar: ExchangeCalendar,
    force: bool,
) -> CalendarResult<Arc<ExchangeCalendar>> {
    let name = calendar.definition().name.clone();
    let mut calendars = CALENDARS.write();
    if !force && calendars.contains_key(&name) {
        return Err(CalendarError::CalendarNameCollision { name });
    }
    debug!(%name, force, "registering calendar");
    let shared = Arc::new(calendar);
    calendars.insert(name, Arc::clone(&shared));
    Ok(shared)
}

/// Drop the registration for `name`. Existing handles stay valid; a no-op
/// when the name was never registered.
pub fn deregister_calendar(name: &str) {
    if CALENDARS.write().remove(name).is_some() {
        debug!(%name, "deregistered calendar");
    }
}

/// Drop every registration.
pub fn clear_calendars() {
    CALENDARS.write().clear();
}

/// Fetch the shared calendar for `name`, constructing and caching a
/// built-in definition (`NYSE`, `CME`, `LSE`) on first request.
///
/// `start` and `end` only apply to that first construction; once a name is
/// registered, later calls return the cached instance regardless of the
/// bounds they pass.
pub fn get_calendar(
    name: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> CalendarResult<Arc<ExchangeCalendar>> {
    if let Some(calendar) = CALENDARS.read().get(name) {
        return Ok(Arc::clone(calendar));
    }

    let definition = match name {
        "NYSE" => exchanges::nyse(),
        "CME" => exchanges::cme(),
        "LSE" => exchanges::lse(),
        _ => {
            return Err(CalendarError::InvalidCalendarName {
                name: name.to_string(),
            })
        }
    };

    debug!(%name, "constructing built-in calendar");
    let calendar = Arc::new(ExchangeCalendar::new(definition, start, end)?);

    // Another thread may have raced us here; keep whichever registration
    // landed first so every caller shares one instance.
    let mut calendars = CALENDARS.write();
    let shared = calendars
        .entry(name.to_string())
        .or_insert_with(|| calendar);
    Ok(Arc::clone(shared))
}
