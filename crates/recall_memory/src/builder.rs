// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Configuration for [`MemoryStore`]s.

use std::hash::Hash;
use std::marker::PhantomData;

use moka::future::Cache;

use crate::store::MemoryStore;

/// Configures and builds a [`MemoryStore`].
///
/// The builder covers the handful of knobs the store exposes — capacity
/// bounds and a diagnostic name — and keeps the rest of moka's surface an
/// implementation detail.
///
/// Time-based expiry is deliberately not configurable here: freshness is
/// carried in each entry's metadata and evaluated by the policy layer, never
/// by the backend.
///
/// # Examples
///
/// ```
/// use recall_memory::MemoryStore;
///
/// let store = MemoryStore::<String, Vec<String>>::builder()
///     .max_capacity(10_000)
///     .initial_capacity(256)
///     .name("jobs")
///     .build();
/// ```
#[derive(Debug)]
pub struct MemoryStoreBuilder<K, V> {
    max_capacity: Option<u64>,
    initial_capacity: Option<usize>,
    name: Option<String>,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> Default for MemoryStoreBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryStoreBuilder<K, V> {
    /// Creates a builder for an unbounded, unnamed store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_capacity: None,
            initial_capacity: None,
            name: None,
            _phantom: PhantomData,
        }
    }

    /// Bounds the store to `capacity` entries.
    ///
    /// A full store displaces the least valuable entries (moka's `TinyLFU`
    /// policy, LRU eviction with LFU admission) to admit new ones. Without a
    /// bound the store grows with every distinct key.
    ///
    /// # Examples
    ///
    /// ```
    /// use recall_memory::MemoryStore;
    ///
    /// let store = MemoryStore::<String, i32>::builder()
    ///     .max_capacity(10_000)
    ///     .build();
    /// ```
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Pre-allocates room for roughly `capacity` entries.
    ///
    /// Purely a performance hint for the initial population phase; the store
    /// grows past it as needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use recall_memory::MemoryStore;
    ///
    /// let store = MemoryStore::<String, i32>::builder()
    ///     .initial_capacity(256)
    ///     .max_capacity(10_000)
    ///     .build();
    /// ```
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Names the store for diagnostics from the underlying cache.
    ///
    /// # Examples
    ///
    /// ```
    /// use recall_memory::MemoryStore;
    ///
    /// let store = MemoryStore::<String, i32>::builder()
    ///     .name("jobs")
    ///     .build();
    /// ```
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the configured store.
    #[must_use]
    pub fn build(self) -> MemoryStore<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let mut cache = Cache::builder();

        if let Some(capacity) = self.max_capacity {
            cache = cache.max_capacity(capacity);
        }

        if let Some(capacity) = self.initial_capacity {
            cache = cache.initial_capacity(capacity);
        }

        if let Some(name) = self.name.as_deref() {
            cache = cache.name(name);
        }

        MemoryStore::from_cache(cache.build())
    }
}
