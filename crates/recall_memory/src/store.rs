//! A bounded in-memory store backed by moka.

use std::hash::Hash;

use moka::future::Cache;
use recall_store::{CacheEntry, CacheStore, Error, PutOutcome};

use crate::builder::MemoryStoreBuilder;

/// An in-memory store built on [moka](https://crates.io/crates/moka)'s
/// concurrent cache.
///
/// Capacity is the only pressure this store reacts to: once full, the least
/// valuable entries are displaced using moka's `TinyLFU` policy. Time never
/// evicts here. An entry's freshness travels in its [`CacheEntry`] metadata
/// and is judged by the policy layer, so an expired entry stays retrievable
/// until it is explicitly removed or displaced for space.
///
/// Clones share the same underlying cache.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use recall_memory::MemoryStore;
/// use recall_store::{CacheEntry, CacheStore};
/// # futures::executor::block_on(async {
///
/// let store = MemoryStore::<String, i32>::with_capacity(1_000);
///
/// let entry = CacheEntry::new(42, SystemTime::now(), Duration::from_secs(60));
/// store.put_if_absent(&"key".to_string(), entry).await.unwrap();
///
/// let found = store.get(&"key".to_string()).await.unwrap();
/// assert_eq!(*found.unwrap().value(), 42);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, CacheEntry<V>>,
}

impl<K, V> Default for MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a store with no capacity bound.
    ///
    /// Prefer [`with_capacity`](MemoryStore::with_capacity) unless the key
    /// space itself is bounded; an unbounded store grows with every distinct
    /// key it ever sees.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a store that holds at most `max_entries` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use recall_memory::MemoryStore;
    ///
    /// let store = MemoryStore::<String, i32>::with_capacity(10_000);
    /// ```
    #[must_use]
    pub fn with_capacity(max_entries: u64) -> Self {
        Self::builder().max_capacity(max_entries).build()
    }

    /// Starts configuring a store.
    ///
    /// The builder exposes the remaining knobs: an initial capacity hint and
    /// a diagnostic name.
    ///
    /// # Examples
    ///
    /// ```
    /// use recall_memory::MemoryStore;
    ///
    /// let store = MemoryStore::<String, i32>::builder()
    ///     .max_capacity(10_000)
    ///     .initial_capacity(256)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> MemoryStoreBuilder<K, V> {
        MemoryStoreBuilder::new()
    }

    pub(crate) fn from_cache(inner: Cache<K, CacheEntry<V>>) -> Self {
        Self { inner }
    }
}

impl<K, V> CacheStore<K, V> for MemoryStore<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        Ok(self.inner.get(key).await)
    }

    async fn put_if_absent(&self, key: &K, entry: CacheEntry<V>) -> Result<PutOutcome, Error> {
        // moka's entry API resolves concurrent writers of one key to a single
        // winner, so this is a true atomic put-if-absent, not check-then-act.
        let inserted = self.inner.entry_by_ref(key).or_insert(entry).await;
        Ok(if inserted.is_fresh() {
            PutOutcome::Inserted
        } else {
            PutOutcome::KeptExisting
        })
    }

    async fn remove(&self, key: &K) -> Result<(), Error> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.inner.invalidate_all();
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        // Eventually consistent; see the crate docs.
        Some(self.inner.entry_count())
    }
}
