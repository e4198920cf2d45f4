//! Built-in exchange definitions.
//!
//! Each function returns the static configuration for one venue; pass the
//! result to [`ExchangeCalendar::new`](crate::ExchangeCalendar::new) or go
//! through [`get_calendar`](crate::get_calendar) for a shared instance.

mod cme;
mod lse;
mod nyse;

pub use cme::cme;
pub use lse::lse;
pub use nyse::nyse;
