// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A recording mock store for tests.
//!
//! [`MockStore`] keeps entries in a plain map, logs every operation asked of
//! it, and can be told to fail chosen operations, which is what tests of
//! error paths and operation ordering are built on.

use std::{collections::HashMap, hash::Hash, sync::Arc};

use parking_lot::{Mutex, MutexGuard};

use crate::{CacheEntry, CacheStore, Error, PutOutcome};

/// One recorded store operation, with the arguments it was called with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp<K, V> {
    /// A lookup of the given key.
    Get(K),
    /// A conditional insert of the given key.
    Put {
        /// The key that was written.
        key: K,
        /// The cache entry that was offered for insertion.
        entry: CacheEntry<V>,
    },
    /// A removal of the given key.
    Remove(K),
    /// A removal of every entry.
    Clear,
}

type FailPredicate<K, V> = Box<dyn Fn(&StoreOp<K, V>) -> bool + Send + Sync>;

struct Inner<K, V> {
    data: HashMap<K, CacheEntry<V>>,
    log: Vec<StoreOp<K, V>>,
    fail_when: Option<FailPredicate<K, V>>,
}

/// An in-memory store that records everything asked of it.
///
/// Tests hand a `MockStore` to the code under test, run the scenario, and
/// assert on [`operations`](MockStore::operations): the log keeps every call
/// in order, including the full entry offered to `put_if_absent`, which is
/// how ordering rules such as evict-before-recompute are verified.
///
/// Clones share the same map and log, so a test can keep one handle while
/// the code under test owns another.
///
/// # Examples
///
/// ```no_run
/// use std::time::{Duration, SystemTime};
///
/// use recall_store::{testing::{MockStore, StoreOp}, CacheStore, CacheEntry};
///
/// # async fn example() {
/// let store = MockStore::<String, i32>::new();
/// let entry = CacheEntry::new(7, SystemTime::UNIX_EPOCH, Duration::from_secs(60));
///
/// store.put_if_absent(&"answer".to_string(), entry.clone()).await.unwrap();
/// let found = store.get(&"answer".to_string()).await.unwrap();
/// assert_eq!(*found.unwrap().value(), 7);
///
/// assert_eq!(store.operations(), vec![
///     StoreOp::Put { key: "answer".to_string(), entry },
///     StoreOp::Get("answer".to_string()),
/// ]);
/// # }
/// ```
///
/// # Failure Injection
///
/// A predicate set through [`fail_when`](MockStore::fail_when) decides,
/// per operation, whether the store reports an error. Failed operations are
/// still logged but leave the stored data untouched.
///
/// ```no_run
/// use recall_store::{testing::{MockStore, StoreOp}, CacheStore};
///
/// # async fn example() {
/// let store: MockStore<String, i32> = MockStore::new();
///
/// store.fail_when(|op| matches!(op, StoreOp::Remove(_)));
/// assert!(store.remove(&"stuck".to_string()).await.is_err());
/// assert!(store.get(&"stuck".to_string()).await.is_ok());
/// # }
/// ```
pub struct MockStore<K, V> {
    inner: Arc<Mutex<Inner<K, V>>>,
}

impl<K, V> MockStore<K, V> {
    /// Creates an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_map(HashMap::new())
    }

    fn from_map(data: HashMap<K, CacheEntry<V>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                data,
                log: Vec::new(),
                fail_when: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        self.inner.lock()
    }
}

impl<K, V> MockStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates a mock store already holding the given entries.
    ///
    /// Seeding data directly keeps the operation log clean: only what the
    /// code under test does shows up in it.
    #[must_use]
    pub fn with_data(data: HashMap<K, CacheEntry<V>>) -> Self {
        Self::from_map(data)
    }

    /// Returns the number of entries currently held.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.lock().data.len()
    }

    /// Returns whether an entry is currently held under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.lock().data.contains_key(key)
    }
}

impl<K, V> MockStore<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Makes operations matched by `predicate` fail from now on.
    ///
    /// Matched operations are still logged, but return an error and leave
    /// the stored data as it was. Setting a new predicate replaces the
    /// previous one.
    ///
    /// # Examples
    ///
    /// ```
    /// use recall_store::testing::{MockStore, StoreOp};
    ///
    /// let store: MockStore<String, i32> = MockStore::new();
    ///
    /// // Every operation fails.
    /// store.fail_when(|_| true);
    ///
    /// // Only lookups fail.
    /// store.fail_when(|op| matches!(op, StoreOp::Get(_)));
    ///
    /// // Only lookups of one key fail.
    /// store.fail_when(|op| matches!(op, StoreOp::Get(k) if k == "flaky"));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp<K, V>) -> bool + Send + Sync + 'static,
    {
        self.lock().fail_when = Some(Box::new(predicate));
    }

    /// Removes the failure predicate; subsequent operations succeed.
    pub fn clear_failures(&self) {
        self.lock().fail_when = None;
    }

    /// Returns every recorded operation, oldest first.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp<K, V>> {
        self.lock().log.clone()
    }

    /// Empties the operation log; the stored data is untouched.
    pub fn clear_operations(&self) {
        self.lock().log.clear();
    }
}

impl<K, V> Inner<K, V> {
    /// Logs `op` and reports whether the failure predicate rejects it.
    fn admit(&mut self, op: StoreOp<K, V>) -> Result<(), Error> {
        let rejected = self.fail_when.as_ref().is_some_and(|predicate| predicate(&op));
        let name = match &op {
            StoreOp::Get(_) => "get",
            StoreOp::Put { .. } => "put",
            StoreOp::Remove(_) => "remove",
            StoreOp::Clear => "clear",
        };
        self.log.push(op);
        if rejected {
            return Err(Error::from_message(format!("mock: {name} failed")));
        }
        Ok(())
    }
}

impl<K, V> Default for MockStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for MockStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> std::fmt::Debug for MockStore<K, V>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("MockStore")
            .field("data", &inner.data)
            .field("log", &inner.log)
            .field("fail_when", &inner.fail_when.is_some())
            .finish()
    }
}

impl<K, V> CacheStore<K, V> for MockStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        let mut inner = self.lock();
        inner.admit(StoreOp::Get(key.clone()))?;
        Ok(inner.data.get(key).cloned())
    }

    async fn put_if_absent(&self, key: &K, entry: CacheEntry<V>) -> Result<PutOutcome, Error> {
        let mut inner = self.lock();
        inner.admit(StoreOp::Put {
            key: key.clone(),
            entry: entry.clone(),
        })?;
        match inner.data.entry(key.clone()) {
            std::collections::hash_map::Entry::Occupied(_) => Ok(PutOutcome::KeptExisting),
            std::collections::hash_map::Entry::Vacant(vacant) => {
                let _ = vacant.insert(entry);
                Ok(PutOutcome::Inserted)
            }
        }
    }

    async fn remove(&self, key: &K) -> Result<(), Error> {
        let mut inner = self.lock();
        inner.admit(StoreOp::Remove(key.clone()))?;
        let _ = inner.data.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        let mut inner = self.lock();
        inner.admit(StoreOp::Clear)?;
        inner.data.clear();
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        Some(self.lock().data.len() as u64)
    }
}
