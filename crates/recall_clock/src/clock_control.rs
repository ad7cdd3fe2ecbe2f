// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use crate::Clock;

/// A manual time source for tests.
///
/// A control starts at the UNIX epoch and moves only when told to, so a test
/// can cross an expiry boundary in a microsecond-long run instead of
/// sleeping. Build as many [`Clock`] handles from it as the code under test
/// needs via [`to_clock`][ClockControl::to_clock]; all of them observe the
/// control's time, as do clones of the control itself.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use recall_clock::ClockControl;
///
/// let control = ClockControl::new();
/// let clock = control.to_clock();
///
/// control.advance(Duration::from_secs(61));
///
/// assert_eq!(
///     clock.system_time(),
///     SystemTime::UNIX_EPOCH + Duration::from_secs(61),
/// );
/// ```
///
/// Enable the `test-util` feature under `[dev-dependencies]` only; production
/// builds have no reason to carry a controllable clock:
///
/// ```toml
/// [dev-dependencies]
/// recall_clock = { version = "*", features = ["test-util"] }
/// ```
#[derive(Debug, Clone)]
pub struct ClockControl {
    // Shared by every clone and by every clock built from this control.
    time: Arc<Mutex<SystemTime>>,
}

impl ClockControl {
    /// Creates a control frozen at the UNIX epoch.
    ///
    /// Starting from the epoch keeps test arithmetic simple: the controlled
    /// time is always the epoch plus whatever the test has advanced.
    #[must_use]
    pub fn new() -> Self {
        Self::new_at(SystemTime::UNIX_EPOCH)
    }

    /// Creates a control frozen at the given timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    ///
    /// use recall_clock::ClockControl;
    ///
    /// let noon = SystemTime::UNIX_EPOCH + Duration::from_secs(43_200);
    /// let control = ClockControl::new_at(noon);
    ///
    /// assert_eq!(control.system_time(), noon);
    /// ```
    #[must_use]
    pub fn new_at(time: impl Into<SystemTime>) -> Self {
        Self {
            time: Arc::new(Mutex::new(time.into())),
        }
    }

    /// Creates a control frozen at the current operating system time.
    ///
    /// Useful when the code under test mixes controlled timestamps with
    /// values captured from the real clock.
    #[must_use]
    pub fn now() -> Self {
        Self::new_at(SystemTime::now())
    }

    /// Builds a [`Clock`] that reads this control's time.
    #[must_use]
    pub fn to_clock(&self) -> Clock {
        Clock::controlled(self)
    }

    /// Moves time forward by `duration`.
    ///
    /// # Panics
    ///
    /// Panics if the resulting time cannot be represented as a
    /// [`SystemTime`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    ///
    /// use recall_clock::ClockControl;
    ///
    /// let control = ClockControl::new();
    ///
    /// control.advance(Duration::from_secs(30));
    /// control.advance(Duration::from_secs(31));
    ///
    /// assert_eq!(
    ///     control.system_time(),
    ///     SystemTime::UNIX_EPOCH + Duration::from_secs(61),
    /// );
    /// ```
    pub fn advance(&self, duration: Duration) {
        let mut time = self.time();
        *time = time
            .checked_add(duration)
            .expect("advanced past the end of representable time");
    }

    /// Moves the control to the given timestamp.
    ///
    /// Moving backwards is allowed; code under test then observes time
    /// regressing, just as it would when an operating system clock is reset.
    pub fn advance_to(&self, time: impl Into<SystemTime>) {
        *self.time() = time.into();
    }

    /// Returns the controlled time.
    #[must_use]
    pub fn system_time(&self) -> SystemTime {
        *self.time()
    }

    fn time(&self) -> MutexGuard<'_, SystemTime> {
        self.time.lock().expect("clock time lock poisoned")
    }
}

impl Default for ClockControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(ClockControl: std::fmt::Debug, Send, Sync, Clone, Default);

    #[test]
    fn starts_at_the_epoch() {
        assert_eq!(ClockControl::new().system_time(), SystemTime::UNIX_EPOCH);
        assert_eq!(ClockControl::default().system_time(), SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn advance_moves_every_observer() {
        let control = ClockControl::new();
        let clock = control.to_clock();
        let other = control.to_clock();

        () = control.advance(Duration::from_secs(5));

        assert_eq!(clock.system_time(), SystemTime::UNIX_EPOCH + Duration::from_secs(5));
        assert_eq!(other.system_time(), clock.system_time());
    }

    #[test]
    fn advance_accumulates() {
        let control = ClockControl::new();

        () = control.advance(Duration::from_secs(60));
        () = control.advance(Duration::from_millis(1));

        assert_eq!(
            control.system_time(),
            SystemTime::UNIX_EPOCH + Duration::from_millis(60_001)
        );
    }

    #[test]
    fn advance_to_jumps_forward() {
        let control = ClockControl::new();
        let target = SystemTime::UNIX_EPOCH + Duration::from_secs(120);

        () = control.advance_to(target);

        assert_eq!(control.system_time(), target);
    }

    #[test]
    fn advance_to_allows_moving_backwards() {
        let control = ClockControl::new_at(SystemTime::UNIX_EPOCH + Duration::from_secs(100));

        () = control.advance_to(SystemTime::UNIX_EPOCH + Duration::from_secs(40));

        assert_eq!(
            control.system_time(),
            SystemTime::UNIX_EPOCH + Duration::from_secs(40)
        );
    }

    #[test]
    fn new_at_starts_where_asked() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(222);

        assert_eq!(ClockControl::new_at(start).to_clock().system_time(), start);
    }

    #[cfg(not(miri))] // Reading the OS clock needs FFI calls Miri cannot make.
    #[test]
    fn now_is_roughly_the_present() {
        let floor = SystemTime::now();

        assert!(ClockControl::now().system_time() >= floor);
    }

    #[test]
    fn clones_share_state() {
        let control = ClockControl::new();
        let clone = control.clone();

        () = control.advance(Duration::from_secs(7));

        assert_eq!(clone.system_time(), SystemTime::UNIX_EPOCH + Duration::from_secs(7));
    }
}
