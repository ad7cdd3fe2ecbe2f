// Copyright (c) Microsoft Corporation.

use std::{
    ops::Deref,
    time::{Duration, SystemTime},
};

/// A cached value with its storage timestamp and time-to-live.
///
/// `CacheEntry` records when a value was stored and how long it stays fresh.
/// Both pieces of metadata are mandatory: every entry eventually expires, and
/// expiry is evaluated lazily from the entry itself rather than by a
/// background sweeper. Entries are immutable once created; replacing a value
/// means removing the old entry and inserting a new one.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use recall_store::CacheEntry;
///
/// let stored_at = SystemTime::UNIX_EPOCH;
/// let entry = CacheEntry::new(42, stored_at, Duration::from_secs(60));
///
/// assert_eq!(*entry.value(), 42);
/// assert!(!entry.is_expired(stored_at + Duration::from_secs(60)));
/// assert!(entry.is_expired(stored_at + Duration::from_secs(61)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<V> {
    value: V,
    stored_at: SystemTime,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// Creates a new cache entry stored at the given timestamp with the given
    /// time-to-live.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    ///
    /// use recall_store::CacheEntry;
    ///
    /// let entry = CacheEntry::new(42, SystemTime::UNIX_EPOCH, Duration::from_secs(60));
    /// assert_eq!(*entry.value(), 42);
    /// assert_eq!(entry.ttl(), Duration::from_secs(60));
    /// ```
    pub fn new(value: V, stored_at: SystemTime, ttl: Duration) -> Self {
        Self { value, stored_at, ttl }
    }

    /// Returns the timestamp when this entry was stored.
    #[must_use]
    pub fn stored_at(&self) -> SystemTime {
        self.stored_at
    }

    /// Returns the time-to-live this entry was stored under.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns `true` if this entry has outlived its time-to-live at the
    /// given instant.
    ///
    /// An entry is expired strictly after `stored_at + ttl`; at exactly that
    /// instant it is still fresh. If `now` is earlier than the storage
    /// timestamp the clock has moved backwards, and the entry is treated as
    /// expired rather than trusted with an unknowable age.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    ///
    /// use recall_store::CacheEntry;
    ///
    /// let stored_at = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
    /// let entry = CacheEntry::new("value", stored_at, Duration::from_secs(30));
    ///
    /// assert!(!entry.is_expired(stored_at));
    /// assert!(!entry.is_expired(stored_at + Duration::from_secs(30)));
    /// assert!(entry.is_expired(stored_at + Duration::from_secs(31)));
    /// assert!(entry.is_expired(stored_at - Duration::from_secs(1)));
    /// ```
    #[must_use]
    pub fn is_expired(&self, now: SystemTime) -> bool {
        match now.duration_since(self.stored_at) {
            Ok(elapsed) => elapsed > self.ttl,
            // The clock moved backwards past the storage timestamp.
            Err(_) => true,
        }
    }

    /// Unwraps the entry into the value it holds.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Borrows the stored value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V> Deref for CacheEntry<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
