//! Session navigation over the session table.
//!
//! Pure reads against the immutable [`Schedule`]; all position lookups are
//! binary searches on the sorted day and session columns. Requests that
//! would walk past either end of the table fail with
//! [`CalendarError::NoFurtherData`], never clamp.

use chrono::{DateTime, Duration, Utc};

use crate::error::{CalendarError, CalendarResult, Direction};
use crate::time::midnight_utc;

use super::minutes::minute_range;
use super::schedule::{Schedule, Session};

impl Schedule {
    /// Smallest session date strictly after the calendar day of `date`.
    pub fn next_trading_day(&self, date: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        let day = midnight_utc(date);
        let index = self.days().partition_point(|d| *d <= day);
        self.days()
            .get(index)
            .copied()
            .ok_or(CalendarError::NoFurtherData {
                direction: Direction::Forward,
                bound: self.last_trading_day(),
            })
    }

    /// Largest session date strictly before the calendar day of `date`.
    pub fn previous_trading_day(&self, date: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        let day = midnight_utc(date);
        let index = self.days().partition_point(|d| *d < day);
        if index == 0 {
            return Err(CalendarError::NoFurtherData {
                direction: Direction::Backward,
                bound: self.first_trading_day(),
            });
        }
        Ok(self.days()[index - 1])
    }

    /// Open and close instants of the session on the calendar day of `date`.
    pub fn open_and_close(&self, date: DateTime<Utc>) -> CalendarResult<Session> {
        self.index_of(date)
            .map(|index| self.sessions()[index])
            .ok_or(CalendarError::NotASession {
                date: midnight_utc(date),
            })
    }

    /// Open and close of the next session after the calendar day of `date`.
    pub fn next_open_and_close(&self, date: DateTime<Utc>) -> CalendarResult<Session> {
        self.open_and_close(self.next_trading_day(date)?)
    }

    /// Open and close of the last session before the calendar day of `date`.
    pub fn previous_open_and_close(&self, date: DateTime<Utc>) -> CalendarResult<Session> {
        self.open_and_close(self.previous_trading_day(date)?)
    }

    /// Signed count of sessions from `first` to `second` by table position.
    ///
    /// Antisymmetric: swapping the arguments flips the sign.
    pub fn trading_day_distance(&self, first: DateTime<Utc>, second: DateTime<Utc>) -> i64 {
        self.position(second) as i64 - self.position(first) as i64
    }

    fn position(&self, date: DateTime<Utc>) -> usize {
        let day = midnight_utc(date);
        self.days().partition_point(|d| *d < day)
    }

    /// Every minute of the session on `day`, open through close inclusive.
    pub fn trading_minutes_for_day(
        &self,
        day: DateTime<Utc>,
    ) -> CalendarResult<Vec<DateTime<Utc>>> {
        let session = self.open_and_close(day)?;
        Ok(minute_range(&session))
    }

    /// Session dates falling within `[start, end]`.
    pub fn trading_days_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> &[DateTime<Utc>] {
        let (lo, hi) = self.range_indices(start, end);
        &self.days()[lo..hi]
    }

    /// Concatenated per-session minutes for every session in `[start, end]`,
    /// in session order.
    pub fn trading_minutes_for_days_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<DateTime<Utc>> {
        let (lo, hi) = self.range_indices(start, end);
        let mut minutes = Vec::new();
        for session in &self.sessions()[lo..hi] {
            minutes.extend(minute_range(session));
        }
        minutes
    }

    fn range_indices(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> (usize, usize) {
        let lo = self.days().partition_point(|d| *d < start);
        let hi = self.days().partition_point(|d| *d <= end);
        (lo, hi.max(lo))
    }

    /// Walk `n` sessions from `date` (forward when positive, backward when
    /// negative).
    ///
    /// `n = 0` returns `date` unchanged but requires it to be a session
    /// itself; a walk that would leave the table fails with
    /// [`CalendarError::NoFurtherData`].
    pub fn add_trading_days(&self, n: i64, date: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        let day = midnight_utc(date);
        if n == 0 {
            return if self.index_of(day).is_some() {
                Ok(day)
            } else {
                Err(CalendarError::NotASession { date: day })
            };
        }
        let mut current = day;
        for _ in 0..n.unsigned_abs() {
            current = if n > 0 {
                self.next_trading_day(current)?
            } else {
                self.previous_trading_day(current)?
            };
        }
        Ok(current)
    }

    /// True if any session exists on the calendar day containing `dt`.
    pub fn is_open_on_day(&self, dt: DateTime<Utc>) -> bool {
        self.index_of(dt).is_some()
    }

    /// True if `dt` falls inside a session, open and close inclusive.
    pub fn is_open_on_minute(&self, dt: DateTime<Utc>) -> bool {
        let index = self.sessions().partition_point(|s| s.market_close < dt);
        self.sessions()
            .get(index)
            .is_some_and(|s| s.market_open <= dt && dt <= s.market_close)
    }

    /// Session date of the session containing `dt`, or of the next session
    /// when `dt` falls in a closed gap.
    pub fn session_date(&self, dt: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        let index = self.sessions().partition_point(|s| s.market_close < dt);
        self.days()
            .get(index)
            .copied()
            .ok_or(CalendarError::NoFurtherData {
                direction: Direction::Forward,
                bound: self.last_trading_day(),
            })
    }

    /// First tradable minute strictly after `start` (the next session's
    /// open when `start` is outside any session).
    ///
    /// Sessions are located by their open/close interval, not by calendar
    /// day: a session that opens the previous evening (day-offset
    /// calendars) still contains its overnight minutes.
    pub fn next_trading_minute(&self, start: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        let index = self.sessions().partition_point(|s| s.market_close <= start);
        let session = self
            .sessions()
            .get(index)
            .ok_or(CalendarError::NoFurtherData {
                direction: Direction::Forward,
                bound: self.last_trading_day(),
            })?;
        if start < session.market_open {
            Ok(session.market_open)
        } else {
            Ok(start + Duration::minutes(1))
        }
    }

    /// Last tradable minute strictly before `start` (the previous session's
    /// close when `start` is outside any session).
    pub fn previous_trading_minute(&self, start: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
        let index = self.sessions().partition_point(|s| s.market_open < start);
        if index == 0 {
            return Err(CalendarError::NoFurtherData {
                direction: Direction::Backward,
                bound: self.first_trading_day(),
            });
        }
        let session = self.sessions()[index - 1];
        if start > session.market_close {
            Ok(session.market_close)
        } else {
            Ok(start - Duration::minutes(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::definition::CalendarDefinition;
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use chrono_tz::America::New_York;

    fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    /// Weekday sessions 09:30-16:00 New York over two weeks of June 2024,
    /// with an ad-hoc holiday on Wednesday June 5.
    fn fixture() -> Schedule {
        let def = CalendarDefinition::new(
            "TEST",
            New_York,
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        )
        .with_adhoc_holidays(vec![NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()]);
        Schedule::build(&def, midnight(2024, 6, 3), midnight(2024, 6, 14)).unwrap()
    }

    #[test]
    fn test_next_trading_day_skips_holiday() {
        let schedule = fixture();
        // Tuesday -> Thursday, across the ad-hoc Wednesday holiday.
        assert_eq!(
            schedule.next_trading_day(midnight(2024, 6, 4)).unwrap(),
            midnight(2024, 6, 6)
        );
        // Saturday -> Monday.
        assert_eq!(
            schedule.next_trading_day(midnight(2024, 6, 8)).unwrap(),
            midnight(2024, 6, 10)
        );
    }

    #[test]
    fn test_previous_trading_day_skips_holiday() {
        let schedule = fixture();
        assert_eq!(
            schedule.previous_trading_day(midnight(2024, 6, 6)).unwrap(),
            midnight(2024, 6, 4)
        );
    }

    #[test]
    fn test_navigation_fails_out_of_range() {
        let schedule = fixture();
        let err = schedule.next_trading_day(midnight(2024, 6, 14)).unwrap_err();
        assert!(matches!(
            err,
            CalendarError::NoFurtherData {
                direction: Direction::Forward,
                ..
            }
        ));
        let err = schedule
            .previous_trading_day(midnight(2024, 6, 3))
            .unwrap_err();
        assert!(matches!(
            err,
            CalendarError::NoFurtherData {
                direction: Direction::Backward,
                ..
            }
        ));
    }

    #[test]
    fn test_round_trip_between_bounds() {
        let schedule = fixture();
        for &day in &schedule.days()[1..schedule.len() - 1] {
            let forth = schedule.previous_trading_day(day).unwrap();
            assert_eq!(schedule.next_trading_day(forth).unwrap(), day);
        }
    }

    #[test]
    fn test_open_and_close_lookup() {
        let schedule = fixture();
        let session = schedule.open_and_close(midnight(2024, 6, 4)).unwrap();
        assert_eq!(session.market_open, utc(2024, 6, 4, 13, 30));
        assert_eq!(session.market_close, utc(2024, 6, 4, 20, 0));

        let err = schedule.open_and_close(midnight(2024, 6, 5)).unwrap_err();
        assert!(matches!(err, CalendarError::NotASession { .. }));
    }

    #[test]
    fn test_next_and_previous_open_and_close() {
        let schedule = fixture();
        let next = schedule.next_open_and_close(midnight(2024, 6, 4)).unwrap();
        assert_eq!(next.market_open, utc(2024, 6, 6, 13, 30));
        let previous = schedule
            .previous_open_and_close(midnight(2024, 6, 6))
            .unwrap();
        assert_eq!(previous.market_close, utc(2024, 6, 4, 20, 0));
    }

    #[test]
    fn test_trading_day_distance_is_antisymmetric() {
        let schedule = fixture();
        let tuesday = midnight(2024, 6, 4);
        let thursday = midnight(2024, 6, 6);
        assert_eq!(schedule.trading_day_distance(tuesday, thursday), 1);
        assert_eq!(schedule.trading_day_distance(thursday, tuesday), -1);
        assert_eq!(schedule.trading_day_distance(tuesday, tuesday), 0);
        // Across the weekend: Thu 6th -> Tue 11th spans Fri, Mon, Tue.
        assert_eq!(schedule.trading_day_distance(thursday, midnight(2024, 6, 11)), 3);
    }

    #[test]
    fn test_trading_minutes_for_day_endpoints_and_length() {
        let schedule = fixture();
        let minutes = schedule.trading_minutes_for_day(midnight(2024, 6, 4)).unwrap();
        assert_eq!(minutes.len(), 391);
        assert_eq!(minutes[0], utc(2024, 6, 4, 13, 30));
        assert_eq!(minutes[minutes.len() - 1], utc(2024, 6, 4, 20, 0));
        // One-minute spacing throughout.
        assert!(minutes
            .windows(2)
            .all(|w| w[1] - w[0] == Duration::minutes(1)));
    }

    #[test]
    fn test_trading_days_in_range() {
        let schedule = fixture();
        let days = schedule.trading_days_in_range(midnight(2024, 6, 4), midnight(2024, 6, 10));
        assert_eq!(
            days,
            &[
                midnight(2024, 6, 4),
                midnight(2024, 6, 6),
                midnight(2024, 6, 7),
                midnight(2024, 6, 10)
            ]
        );
        // Inverted range is empty, not a panic.
        assert!(schedule
            .trading_days_in_range(midnight(2024, 6, 10), midnight(2024, 6, 4))
            .is_empty());
    }

    #[test]
    fn test_trading_minutes_for_days_in_range() {
        let schedule = fixture();
        let minutes =
            schedule.trading_minutes_for_days_in_range(midnight(2024, 6, 4), midnight(2024, 6, 6));
        assert_eq!(minutes.len(), 391 * 2);
        assert_eq!(minutes[0], utc(2024, 6, 4, 13, 30));
        assert_eq!(minutes[391], utc(2024, 6, 6, 13, 30));
    }

    #[test]
    fn test_add_trading_days() {
        let schedule = fixture();
        let tuesday = midnight(2024, 6, 4);
        assert_eq!(
            schedule.add_trading_days(2, tuesday).unwrap(),
            midnight(2024, 6, 7)
        );
        assert_eq!(
            schedule.add_trading_days(-1, midnight(2024, 6, 6)).unwrap(),
            tuesday
        );
        assert_eq!(schedule.add_trading_days(0, tuesday).unwrap(), tuesday);

        // Zero days from a non-session is a failure, not a coercion.
        let err = schedule
            .add_trading_days(0, midnight(2024, 6, 5))
            .unwrap_err();
        assert!(matches!(err, CalendarError::NotASession { .. }));

        // Walking off the table surfaces the range error.
        let err = schedule.add_trading_days(100, tuesday).unwrap_err();
        assert!(matches!(err, CalendarError::NoFurtherData { .. }));
    }

    #[test]
    fn test_is_open_on_minute_boundaries() {
        let schedule = fixture();
        assert!(schedule.is_open_on_minute(utc(2024, 6, 4, 13, 30)));
        assert!(schedule.is_open_on_minute(utc(2024, 6, 4, 20, 0)));
        assert!(schedule.is_open_on_minute(utc(2024, 6, 4, 15, 45)));
        assert!(!schedule.is_open_on_minute(utc(2024, 6, 4, 13, 29)));
        assert!(!schedule.is_open_on_minute(utc(2024, 6, 4, 20, 1)));
        // Holiday Wednesday.
        assert!(!schedule.is_open_on_minute(utc(2024, 6, 5, 15, 0)));
    }

    #[test]
    fn test_session_date_in_session_and_in_gap() {
        let schedule = fixture();
        // Inside Tuesday's session.
        assert_eq!(
            schedule.session_date(utc(2024, 6, 4, 15, 0)).unwrap(),
            midnight(2024, 6, 4)
        );
        // In the closed gap after Tuesday's close: next session is Thursday.
        assert_eq!(
            schedule.session_date(utc(2024, 6, 4, 22, 0)).unwrap(),
            midnight(2024, 6, 6)
        );
        // Past the end of the table.
        let err = schedule.session_date(utc(2024, 6, 14, 21, 0)).unwrap_err();
        assert!(matches!(err, CalendarError::NoFurtherData { .. }));
    }

    #[test]
    fn test_next_trading_minute() {
        let schedule = fixture();
        // Within a session: one minute forward.
        assert_eq!(
            schedule.next_trading_minute(utc(2024, 6, 4, 15, 0)).unwrap(),
            utc(2024, 6, 4, 15, 1)
        );
        // Exactly at the open.
        assert_eq!(
            schedule.next_trading_minute(utc(2024, 6, 4, 13, 30)).unwrap(),
            utc(2024, 6, 4, 13, 31)
        );
        // Exactly at the close: jumps to Thursday's open across the holiday.
        assert_eq!(
            schedule.next_trading_minute(utc(2024, 6, 4, 20, 0)).unwrap(),
            utc(2024, 6, 6, 13, 30)
        );
        // Before the open on a trading day.
        assert_eq!(
            schedule.next_trading_minute(utc(2024, 6, 4, 9, 0)).unwrap(),
            utc(2024, 6, 4, 13, 30)
        );
        // On the holiday itself.
        assert_eq!(
            schedule.next_trading_minute(utc(2024, 6, 5, 15, 0)).unwrap(),
            utc(2024, 6, 6, 13, 30)
        );
    }

    /// Globex-style sessions opening 17:00 Chicago the previous evening.
    fn offset_fixture() -> Schedule {
        let def = CalendarDefinition::new(
            "TEST",
            chrono_tz::America::Chicago,
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        )
        .with_open_offset(-1);
        Schedule::build(&def, midnight(2024, 1, 8), midnight(2024, 1, 12)).unwrap()
    }

    #[test]
    fn test_minute_navigation_inside_overnight_session() {
        let schedule = offset_fixture();
        // Tuesday's session opens Monday 17:00 CST = Monday 23:00 UTC.
        let monday_evening = utc(2024, 1, 8, 23, 30);
        assert!(schedule.is_open_on_minute(monday_evening));
        assert_eq!(
            schedule.next_trading_minute(monday_evening).unwrap(),
            utc(2024, 1, 8, 23, 31)
        );
        assert_eq!(
            schedule.previous_trading_minute(monday_evening).unwrap(),
            utc(2024, 1, 8, 23, 29)
        );

        // The hour between close and the next open: Tuesday 22:00-23:00 UTC.
        let settlement_gap = utc(2024, 1, 9, 22, 30);
        assert!(!schedule.is_open_on_minute(settlement_gap));
        assert_eq!(
            schedule.next_trading_minute(settlement_gap).unwrap(),
            utc(2024, 1, 9, 23, 0)
        );
        assert_eq!(
            schedule.previous_trading_minute(settlement_gap).unwrap(),
            utc(2024, 1, 9, 22, 0)
        );

        // Exactly at the overnight open: back to the prior day's close.
        assert_eq!(
            schedule.previous_trading_minute(utc(2024, 1, 8, 23, 0)).unwrap(),
            utc(2024, 1, 8, 22, 0)
        );
    }

    #[test]
    fn test_previous_trading_minute() {
        let schedule = fixture();
        assert_eq!(
            schedule
                .previous_trading_minute(utc(2024, 6, 4, 15, 0))
                .unwrap(),
            utc(2024, 6, 4, 14, 59)
        );
        // Exactly at the open: previous session's close (Monday).
        assert_eq!(
            schedule
                .previous_trading_minute(utc(2024, 6, 4, 13, 30))
                .unwrap(),
            utc(2024, 6, 3, 20, 0)
        );
        // After the close on a trading day.
        assert_eq!(
            schedule
                .previous_trading_minute(utc(2024, 6, 4, 22, 0))
                .unwrap(),
            utc(2024, 6, 4, 20, 0)
        );
        // Backing out of the first session fails.
        let err = schedule
            .previous_trading_minute(utc(2024, 6, 3, 13, 30))
            .unwrap_err();
        assert!(matches!(err, CalendarError::NoFurtherData { .. }));
    }
}
