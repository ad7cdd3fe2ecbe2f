// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::SystemTime;

/// A handle to the source of wall-clock time.
///
/// Expiry decisions depend on "now", and code that calls [`SystemTime::now`]
/// directly cannot be tested without real waiting. `Clock` is the seam: hand
/// every component the same handle, and production reads the operating system
/// clock while tests substitute a source that moves only when told to.
///
/// Clones are cheap and stay linked: a clock built from a
/// [`ClockControl`][crate::ClockControl] observes every adjustment made
/// through the control, no matter how many times the clock has been cloned.
///
/// # Examples
///
/// ```
/// use recall_clock::Clock;
///
/// let clock = Clock::new();
/// let earlier = clock.system_time();
///
/// assert!(clock.system_time() >= earlier);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    source: TimeSource,
}

#[derive(Debug, Clone)]
enum TimeSource {
    System,
    #[cfg(any(feature = "test-util", test))]
    Controlled(crate::ClockControl),
}

impl Clock {
    /// Creates a clock that reads the operating system time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: TimeSource::System,
        }
    }

    /// Creates a clock frozen at the UNIX epoch.
    ///
    /// Shorthand for `ClockControl::new().to_clock()`, for tests where time
    /// only needs to stand still. Build the clock from a
    /// [`ClockControl`][crate::ClockControl] instead when the test also needs
    /// to move time.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::SystemTime;
    ///
    /// use recall_clock::Clock;
    ///
    /// let clock = Clock::new_frozen();
    ///
    /// assert_eq!(clock.system_time(), SystemTime::UNIX_EPOCH);
    /// assert_eq!(clock.system_time(), clock.system_time());
    /// ```
    #[cfg(any(feature = "test-util", test))]
    #[must_use]
    pub fn new_frozen() -> Self {
        crate::ClockControl::new().to_clock()
    }

    /// Creates a clock frozen at the given timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    ///
    /// use recall_clock::Clock;
    ///
    /// let launch = SystemTime::UNIX_EPOCH + Duration::from_secs(1_750_000_000);
    /// let clock = Clock::new_frozen_at(launch);
    ///
    /// assert_eq!(clock.system_time(), launch);
    /// ```
    #[cfg(any(feature = "test-util", test))]
    #[must_use]
    pub fn new_frozen_at(time: impl Into<SystemTime>) -> Self {
        crate::ClockControl::new_at(time).to_clock()
    }

    /// Reads the current wall-clock time.
    ///
    /// Wall-clock time is not monotonic: the operating system clock can be
    /// set backwards, and a controlled clock can be moved backwards on
    /// purpose. Callers comparing timestamps must tolerate regression.
    #[must_use]
    pub fn system_time(&self) -> SystemTime {
        match &self.source {
            TimeSource::System => SystemTime::now(),
            #[cfg(any(feature = "test-util", test))]
            TimeSource::Controlled(control) => control.system_time(),
        }
    }

    #[cfg(any(feature = "test-util", test))]
    pub(crate) fn controlled(control: &crate::ClockControl) -> Self {
        Self {
            source: TimeSource::Controlled(control.clone()),
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
