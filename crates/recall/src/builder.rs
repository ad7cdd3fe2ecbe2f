// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for assembling a call cache and the store it owns.

use std::marker::PhantomData;
use std::time::Duration;

use recall_clock::Clock;
#[cfg(feature = "memory")]
use recall_memory::MemoryStore;
use recall_store::CacheStore;

use crate::cache::{CacheName, CallCache};
use crate::config::CacheConfig;
use crate::key::CallKey;

/// Builder for [`CallCache`] instances.
///
/// Created through [`CallCache::builder`]. The builder owns the clock from
/// the start and acquires a store along the way, either the built-in memory
/// store via [`memory`](CallCacheBuilder::memory) or a caller-supplied one
/// via [`storage`](CallCacheBuilder::storage). Settings that shape the store
/// itself, such as [`max_entries`](CallCacheBuilder::max_entries), are only
/// available before the store is chosen.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use recall::CallCache;
/// use recall_clock::Clock;
///
/// let cache = CallCache::builder::<String>(Clock::new())
///     .max_entries(1_000)
///     .memory()
///     .name("greetings")
///     .ttl(Duration::from_secs(30))
///     .build();
///
/// assert_eq!(cache.name(), "greetings");
/// ```
#[derive(Debug)]
pub struct CallCacheBuilder<V, S = ()> {
    name: Option<CacheName>,
    storage: S,
    ttl: Option<Duration>,
    max_entries: Option<u64>,
    clock: Clock,
    _values: PhantomData<V>,
}

impl<V> CallCacheBuilder<V> {
    pub(crate) fn new(clock: Clock) -> Self {
        Self {
            name: None,
            storage: (),
            ttl: None,
            max_entries: None,
            clock,
            _values: PhantomData,
        }
    }

    /// Supplies the store the cache will own.
    #[must_use]
    pub fn storage<S>(self, storage: S) -> CallCacheBuilder<V, S>
    where
        S: CacheStore<CallKey, V>,
    {
        CallCacheBuilder {
            name: self.name,
            storage,
            ttl: self.ttl,
            max_entries: self.max_entries,
            clock: self.clock,
            _values: PhantomData,
        }
    }

    /// Uses the built-in in-memory store, bounded by
    /// [`max_entries`](CallCacheBuilder::max_entries).
    #[cfg(feature = "memory")]
    #[must_use]
    pub fn memory(self) -> CallCacheBuilder<V, MemoryStore<CallKey, V>>
    where
        V: Clone + Send + Sync + 'static,
    {
        let capacity = self
            .max_entries
            .unwrap_or_else(|| CacheConfig::default().max_entries);
        let storage = MemoryStore::with_capacity(capacity);
        self.storage(storage)
    }

    /// Sets the maximum number of entries the built-in memory store keeps.
    ///
    /// Applies to the store created by [`memory`](CallCacheBuilder::memory);
    /// a store supplied through [`storage`](CallCacheBuilder::storage)
    /// arrives already bounded. Defaults to the [`CacheConfig`] default.
    #[must_use]
    pub fn max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Applies `config`, setting [`max_entries`](CallCacheBuilder::max_entries)
    /// and [`ttl`](CallCacheBuilder::ttl) from its fields.
    #[must_use]
    pub fn config(mut self, config: &CacheConfig) -> Self {
        self.max_entries = Some(config.max_entries);
        self.ttl = Some(config.ttl());
        self
    }
}

impl<V, S> CallCacheBuilder<V, S> {
    /// Sets the name used to identify this cache in logs.
    ///
    /// Defaults to the short type name of the store.
    #[must_use]
    pub fn name(mut self, name: CacheName) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the time-to-live for stored results.
    ///
    /// A result older than this is expired and will be recomputed. Defaults
    /// to the [`CacheConfig`] default; there is no way to keep results
    /// forever.
    #[must_use]
    pub fn ttl(mut self, ttl: impl Into<Duration>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    /// Returns the clock the built cache will read.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

impl<V, S> CallCacheBuilder<V, S>
where
    S: CacheStore<CallKey, V>,
{
    /// Builds the cache, taking ownership of the store.
    #[must_use]
    pub fn build(self) -> CallCache<V, S> {
        let ttl = self.ttl.unwrap_or_else(|| CacheConfig::default().ttl());
        CallCache::new(
            short_type_name::<S>(self.name),
            self.storage,
            self.clock,
            ttl,
        )
    }
}

/// Returns `user_name` when set, otherwise the unqualified name of `S` with
/// any generic parameters stripped.
fn short_type_name<S>(user_name: Option<CacheName>) -> CacheName {
    user_name.unwrap_or_else(|| {
        let full = std::any::type_name::<S>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    })
}
