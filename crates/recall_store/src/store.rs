// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The storage interface a cache backend implements.
//!
//! [`CacheStore`] defines the interface that all storage backends must
//! implement. The trait is designed for composition: implement the storage
//! operations, then use `recall` to layer key derivation, expiry, and the
//! cacheability policy on top.

use crate::{CacheEntry, Error};

/// The outcome of a [`CacheStore::put_if_absent`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The key was vacant and the entry was inserted.
    Inserted,
    /// An entry was already present and was kept untouched.
    KeptExisting,
}

impl PutOutcome {
    /// Returns `true` if the entry was inserted.
    #[must_use]
    pub fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Trait for cache storage backends.
///
/// Implement this trait to provide the bounded key-value container the cache
/// stores entries in. Backends hold [`CacheEntry`] values opaquely: expiry is
/// decided by the policy layer from entry metadata, so a backend must keep
/// expired entries visible to `get` until they are explicitly removed.
///
/// Writes go through [`put_if_absent`](CacheStore::put_if_absent), which must
/// be atomic per key: when two writers race, exactly one inserts and the
/// other observes [`PutOutcome::KeptExisting`]. A stored entry is never
/// mutated in place; replacement is `remove` followed by a fresh
/// `put_if_absent`.
///
/// The four storage methods are required. Size reporting is optional:
/// `len` defaults to `None`, and `is_empty` answers through whatever `len`
/// reports.
pub trait CacheStore<K, V>: Send + Sync {
    /// Gets the entry stored under `key`, returning an error if the
    /// operation fails.
    ///
    /// Expired entries are returned like any other; the caller decides what
    /// expiry means.
    fn get(&self, key: &K) -> impl Future<Output = Result<Option<CacheEntry<V>>, Error>> + Send;

    /// Inserts `entry` under `key` only if no entry is present, returning an
    /// error if the operation fails.
    ///
    /// This must be atomic with respect to concurrent writers of the same
    /// key: an existing entry is never overwritten.
    fn put_if_absent(&self, key: &K, entry: CacheEntry<V>) -> impl Future<Output = Result<PutOutcome, Error>> + Send;

    /// Removes the entry stored under `key`, returning an error if the
    /// operation fails.
    ///
    /// Removing a vacant key is not an error.
    fn remove(&self, key: &K) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes all entries, returning an error if the operation fails.
    fn clear(&self) -> impl Future<Output = Result<(), Error>> + Send;

    /// Returns the number of stored entries, or `None` when the backend does
    /// not track its size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns whether the store holds no entries, or `None` when the
    /// backend does not track its size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}
