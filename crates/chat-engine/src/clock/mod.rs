//! # Shift Clock
//!
//! Maps wall-clock time to the current [`Shift`] and to whether office hours
//! are in effect. The engine never reads the system time directly: every
//! timestamp, shift lookup and office-hours check goes through a
//! [`ShiftClock`], so tests can drive shift transitions and overflow
//! activation deterministically with a [`ManualClock`].
//!
//! | UTC hour   | Shift |
//! |------------|-------|
//! | `[0, 8)`   | 3     |
//! | `[8, 16)`  | 1     |
//! | `[16, 24)` | 2     |
//!
//! Office hours are evaluated in *local* time, inclusive of both bounds
//! (08:00–18:00 by default).

use std::fmt;

use chrono::{DateTime, Local, NaiveTime, Timelike, Utc};
use parking_lot::Mutex;

use crate::agent::Shift;

/// Source of time, shift and office-hours information
pub trait ShiftClock: Send + Sync + fmt::Debug {
    /// Current instant, used for all session timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Shift in effect right now
    fn current_shift(&self) -> Shift {
        shift_for_hour(self.now().hour())
    }

    /// Whether the overflow tier may be activated right now
    fn is_office_hours(&self) -> bool;
}

/// Shift running during the given UTC hour of day
pub fn shift_for_hour(hour: u32) -> Shift {
    match hour {
        0..=7 => Shift::Third,
        8..=15 => Shift::First,
        _ => Shift::Second,
    }
}

/// Inclusive local time-of-day window during which overflow is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficeHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OfficeHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time <= self.end
    }
}

impl Default for OfficeHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        }
    }
}

/// Clock backed by the system time
///
/// Shifts follow UTC; office hours follow the host's local time zone.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    office_hours: OfficeHours,
}

impl SystemClock {
    pub fn new(office_hours: OfficeHours) -> Self {
        Self { office_hours }
    }
}

impl ShiftClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn is_office_hours(&self) -> bool {
        self.office_hours.contains(Local::now().time())
    }
}

/// Settable clock for tests and simulations
///
/// Time only moves when [`advance`](ManualClock::advance) or
/// [`set_now`](ManualClock::set_now) is called. Shift and office-hours
/// answers are derived from the current instant (treated as local time for
/// office hours) unless pinned with an override; the two overrides are
/// independent of each other.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    office_hours: OfficeHours,
    shift_override: Mutex<Option<Shift>>,
    office_hours_override: Mutex<Option<bool>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            office_hours: OfficeHours::default(),
            shift_override: Mutex::new(None),
            office_hours_override: Mutex::new(None),
        }
    }

    /// Clock pinned to a shift and an office-hours answer, starting at the
    /// current system time
    pub fn pinned(shift: Shift, office_hours: bool) -> Self {
        let clock = Self::new(Utc::now());
        clock.set_shift(Some(shift));
        clock.set_office_hours(Some(office_hours));
        clock
    }

    pub fn set_now(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now = *now + by;
    }

    /// Pin the reported shift, or `None` to derive it from the time again
    pub fn set_shift(&self, shift: Option<Shift>) {
        *self.shift_override.lock() = shift;
    }

    /// Pin the office-hours answer, or `None` to derive it from the time
    pub fn set_office_hours(&self, office_hours: Option<bool>) {
        *self.office_hours_override.lock() = office_hours;
    }
}

impl ShiftClock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn current_shift(&self) -> Shift {
        self.shift_override
            .lock()
            .unwrap_or_else(|| shift_for_hour(self.now().hour()))
    }

    fn is_office_hours(&self) -> bool {
        self.office_hours_override
            .lock()
            .unwrap_or_else(|| self.office_hours.contains(self.now().time()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, minute, second).unwrap()
    }

    #[test]
    fn test_shift_boundaries() {
        assert_eq!(shift_for_hour(0), Shift::Third);
        assert_eq!(shift_for_hour(7), Shift::Third);
        assert_eq!(shift_for_hour(8), Shift::First);
        assert_eq!(shift_for_hour(15), Shift::First);
        assert_eq!(shift_for_hour(16), Shift::Second);
        assert_eq!(shift_for_hour(23), Shift::Second);
    }

    #[test]
    fn test_office_hours_inclusive_bounds() {
        let hours = OfficeHours::default();
        assert!(hours.contains(NaiveTime::from_hms_opt(8, 0, 0).unwrap()));
        assert!(hours.contains(NaiveTime::from_hms_opt(18, 0, 0).unwrap()));
        assert!(!hours.contains(NaiveTime::from_hms_opt(7, 59, 59).unwrap()));
        assert!(!hours.contains(NaiveTime::from_hms_opt(18, 0, 1).unwrap()));
    }

    #[test]
    fn test_manual_clock_derives_from_time() {
        let clock = ManualClock::new(at(7, 59, 0));
        assert_eq!(clock.current_shift(), Shift::Third);
        assert!(!clock.is_office_hours());

        clock.advance(chrono::Duration::minutes(1));
        assert_eq!(clock.current_shift(), Shift::First);
        assert!(clock.is_office_hours());

        clock.set_now(at(18, 30, 0));
        assert_eq!(clock.current_shift(), Shift::Second);
        assert!(!clock.is_office_hours());
    }

    #[test]
    fn test_manual_clock_overrides_are_independent() {
        let clock = ManualClock::new(at(2, 0, 0));
        clock.set_office_hours(Some(true));
        assert_eq!(clock.current_shift(), Shift::Third);
        assert!(clock.is_office_hours());

        clock.set_shift(Some(Shift::Second));
        clock.set_office_hours(None);
        assert_eq!(clock.current_shift(), Shift::Second);
        assert!(!clock.is_office_hours());
    }

    #[test]
    fn test_pinned_clock() {
        let clock = ManualClock::pinned(Shift::First, false);
        assert_eq!(clock.current_shift(), Shift::First);
        assert!(!clock.is_office_hours());
    }
}
