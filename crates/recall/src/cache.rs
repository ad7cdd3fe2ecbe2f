// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The call cache and the policy that drives it.

use std::marker::PhantomData;
use std::time::Duration;

use recall_clock::Clock;
use recall_store::{CacheEntry, CacheStore, Error, PutOutcome};
use tracing::{debug, trace, warn};

use crate::builder::CallCacheBuilder;
use crate::cacheable::{Cacheable, should_cache};
use crate::key::{CallKey, KeyError};

/// The name of a cache, used to identify it in logs.
pub type CacheName = &'static str;

/// The error returned by [`CallCache::intercept`].
///
/// The two failure kinds are kept apart because they call for different
/// handling: a key failure is a defect in the call signature and will repeat
/// on every attempt, while a computation failure belongs to the underlying
/// operation and is handed back exactly as it occurred.
#[derive(Debug, thiserror::Error)]
pub enum CallError<E> {
    /// No cache key could be derived; the operation was never invoked.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The underlying operation failed; nothing was stored.
    #[error(transparent)]
    Compute(E),
}

impl<E> CallError<E> {
    /// Returns the computation failure, if that is what this error holds.
    pub fn into_compute(self) -> Option<E> {
        match self {
            Self::Compute(error) => Some(error),
            Self::Key(_) => None,
        }
    }
}

/// A transparent cache of call results.
///
/// The cache sits between callers and an expensive operation. Results are
/// stored under a [`CallKey`] derived from the operation name and arguments,
/// and served for equal calls until their time-to-live elapses. The operation
/// keeps its exact semantics: failures pass through unchanged, and callers
/// cannot tell a stored result from a computed one except by latency.
///
/// Not every result is worth keeping. Storage decisions go through
/// [`should_cache`]: absent results are never stored, and a collection that
/// comes back empty is stored only when an entry for the call existed before.
///
/// The cache owns its store. Construction goes through
/// [`builder`](CallCache::builder), and [`shutdown`](CallCache::shutdown)
/// clears and releases the store when the cache is retired.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use recall::CallCache;
/// use recall_clock::Clock;
/// # futures::executor::block_on(async {
///
/// let cache = CallCache::builder::<Vec<String>>(Clock::new())
///     .memory()
///     .name("jobs")
///     .ttl(Duration::from_secs(30))
///     .build();
///
/// // The first call computes and stores its result.
/// let jobs = cache
///     .intercept("find_jobs", &(0, 20), || async {
///         Ok::<_, std::io::Error>(vec!["build".to_string(), "deploy".to_string()])
///     })
///     .await?;
/// assert_eq!(jobs.len(), 2);
///
/// // An equal call is served from the store; the closure does not run.
/// let jobs = cache
///     .intercept("find_jobs", &(0, 20), || async { Ok::<_, std::io::Error>(Vec::new()) })
///     .await?;
/// assert_eq!(jobs.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
#[derive(Debug)]
pub struct CallCache<V, S> {
    name: CacheName,
    storage: S,
    clock: Clock,
    ttl: Duration,
    _values: PhantomData<V>,
}

impl CallCache<(), ()> {
    /// Creates a builder for a cache holding results of type `V`.
    ///
    /// The clock drives expiry decisions; pass [`Clock::new`] in production
    /// and a controlled clock in tests.
    #[must_use]
    pub fn builder<V>(clock: Clock) -> CallCacheBuilder<V> {
        CallCacheBuilder::new(clock)
    }
}

/// Construction and access to the owned store.
impl<V, S> CallCache<V, S>
where
    S: CacheStore<CallKey, V>,
{
    pub(crate) fn new(name: CacheName, storage: S, clock: Clock, ttl: Duration) -> Self {
        Self {
            name,
            storage,
            clock,
            ttl,
            _values: PhantomData,
        }
    }

    /// Returns a reference to the underlying store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.storage
    }

    /// Consumes the cache and returns the underlying store.
    ///
    /// Stored entries are left in place; use [`shutdown`](CallCache::shutdown)
    /// to retire the cache and its contents together.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.storage
    }
}

/// Public API methods for inspecting the cache.
impl<V, S> CallCache<V, S> {
    /// Returns the name of this cache.
    #[must_use]
    pub fn name(&self) -> CacheName {
        self.name
    }

    /// Returns the clock this cache reads for expiry decisions.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns the time-to-live applied to newly stored results.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Public API methods for executing calls and managing stored results.
impl<V, S> CallCache<V, S>
where
    V: Clone + Send + Sync + 'static,
    S: CacheStore<CallKey, V>,
{
    /// Returns the stored result for `key`, or computes, stores, and returns
    /// a fresh one.
    ///
    /// A fresh stored result is returned without invoking `compute`. An
    /// expired entry is removed before `compute` runs, so concurrent readers
    /// observe a miss instead of stale data while the new result is being
    /// produced. Once computed, the result is stored only when
    /// [`should_cache`] approves it, and only if no other caller stored one
    /// first.
    ///
    /// There is no lock around the computation: concurrent callers of the
    /// same key may each invoke `compute`, the store keeps whichever result
    /// lands first, and every caller still returns the result it computed
    /// itself.
    ///
    /// Store failures never fail the call. A failed lookup is treated as a
    /// miss, and a failed removal or insert is logged and ignored.
    ///
    /// # Errors
    ///
    /// Fails only when `compute` fails. The failure is returned unchanged and
    /// nothing is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use recall::{CallCache, CallKey};
    /// use recall_clock::Clock;
    /// # futures::executor::block_on(async {
    ///
    /// let cache = CallCache::builder::<u32>(Clock::new())
    ///     .memory()
    ///     .ttl(Duration::from_secs(60))
    ///     .build();
    ///
    /// let key = CallKey::for_call("answer", &())?;
    ///
    /// let value = cache
    ///     .execute(&key, || async { Ok::<_, std::io::Error>(42) })
    ///     .await?;
    /// assert_eq!(value, 42);
    ///
    /// // The second call is served from the store; the new closure does not run.
    /// let value = cache
    ///     .execute(&key, || async { Ok::<_, std::io::Error>(7) })
    ///     .await?;
    /// assert_eq!(value, 42);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// # });
    /// ```
    pub async fn execute<E, Fut>(
        &self,
        key: &CallKey,
        compute: impl FnOnce() -> Fut + Send,
    ) -> Result<V, E>
    where
        V: Cacheable,
        Fut: Future<Output = Result<V, E>> + Send,
    {
        let prior = match self.storage.get(key).await {
            Ok(prior) => prior,
            Err(error) => {
                warn!(cache = self.name, key = %key, error = %error, "lookup failed, treating as a miss");
                None
            }
        };

        let had_prior_value = if let Some(entry) = prior {
            if !entry.is_expired(self.clock.system_time()) {
                trace!(cache = self.name, key = %key, "serving stored result");
                return Ok(entry.into_value());
            }

            // Evict before computing so concurrent readers see a miss
            // instead of the stale entry while the new result is produced.
            trace!(cache = self.name, key = %key, "stored result expired");
            if let Err(error) = self.storage.remove(key).await {
                warn!(cache = self.name, key = %key, error = %error, "failed to evict expired entry");
            }
            true
        } else {
            trace!(cache = self.name, key = %key, "no stored result");
            false
        };

        let value = compute().await?;

        if should_cache(&value, had_prior_value) {
            self.do_store(key, value.clone()).await;
        } else {
            trace!(cache = self.name, key = %key, "result not worth storing");
        }

        Ok(value)
    }

    /// Intercepts a call: derives the cache key from `operation` and
    /// `arguments`, then delegates to [`execute`](CallCache::execute) with
    /// `proceed` as the computation.
    ///
    /// `arguments` is typically a tuple of the call's arguments in order; any
    /// serializable type works. Equal calls map to equal keys regardless of
    /// where the keys are built.
    ///
    /// # Errors
    ///
    /// Fails with [`CallError::Key`] when no key can be derived, in which
    /// case `proceed` is never invoked, and with [`CallError::Compute`] when
    /// `proceed` fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use recall::CallCache;
    /// use recall_clock::Clock;
    /// # futures::executor::block_on(async {
    ///
    /// let cache = CallCache::builder::<String>(Clock::new())
    ///     .memory()
    ///     .ttl(Duration::from_secs(60))
    ///     .build();
    ///
    /// let greeting = cache
    ///     .intercept("greet", &("World",), || async {
    ///         Ok::<_, std::io::Error>("Hello, World!".to_string())
    ///     })
    ///     .await?;
    /// assert_eq!(greeting, "Hello, World!");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// # });
    /// ```
    pub async fn intercept<A, E, Fut>(
        &self,
        operation: &str,
        arguments: &A,
        proceed: impl FnOnce() -> Fut + Send,
    ) -> Result<V, CallError<E>>
    where
        A: serde::Serialize + ?Sized,
        V: Cacheable,
        Fut: Future<Output = Result<V, E>> + Send,
    {
        let key = CallKey::for_call(operation, arguments)?;
        self.execute(&key, proceed).await.map_err(CallError::Compute)
    }

    /// Returns the stored result for `key` if a fresh one exists.
    ///
    /// This never computes and never modifies the store: an expired entry is
    /// reported as absent but left in place.
    ///
    /// # Errors
    ///
    /// Fails when the store lookup fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use recall::{CallCache, CallKey};
    /// use recall_clock::Clock;
    /// # futures::executor::block_on(async {
    ///
    /// let cache = CallCache::builder::<u32>(Clock::new())
    ///     .memory()
    ///     .ttl(Duration::from_secs(60))
    ///     .build();
    ///
    /// let key = CallKey::for_call("answer", &())?;
    /// assert_eq!(cache.peek(&key).await?, None);
    ///
    /// let _: u32 = cache
    ///     .execute(&key, || async { Ok::<_, std::io::Error>(42) })
    ///     .await?;
    /// assert_eq!(cache.peek(&key).await?, Some(42));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// # });
    /// ```
    pub async fn peek(&self, key: &CallKey) -> Result<Option<V>, Error> {
        let now = self.clock.system_time();
        Ok(self
            .storage
            .get(key)
            .await?
            .filter(|entry| !entry.is_expired(now))
            .map(CacheEntry::into_value))
    }

    /// Returns whether a fresh result is stored for `key`.
    ///
    /// # Errors
    ///
    /// Fails when the store lookup fails.
    pub async fn contains(&self, key: &CallKey) -> Result<bool, Error> {
        Ok(self.peek(key).await?.is_some())
    }

    /// Removes the stored result for `key`, forcing the next call to compute.
    ///
    /// Removing a key with no stored result is not an error.
    ///
    /// # Errors
    ///
    /// Fails when the store cannot remove the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use recall::{CallCache, CallKey};
    /// use recall_clock::Clock;
    /// # futures::executor::block_on(async {
    ///
    /// let cache = CallCache::builder::<u32>(Clock::new())
    ///     .memory()
    ///     .ttl(Duration::from_secs(60))
    ///     .build();
    ///
    /// let key = CallKey::for_call("answer", &())?;
    /// let _: u32 = cache
    ///     .execute(&key, || async { Ok::<_, std::io::Error>(42) })
    ///     .await?;
    ///
    /// cache.invalidate(&key).await?;
    /// assert_eq!(cache.peek(&key).await?, None);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// # });
    /// ```
    pub async fn invalidate(&self, key: &CallKey) -> Result<(), Error> {
        self.storage.remove(key).await
    }

    /// Removes every stored result.
    ///
    /// # Errors
    ///
    /// Fails when the store cannot be cleared.
    pub async fn clear(&self) -> Result<(), Error> {
        self.storage.clear().await
    }

    /// Returns the number of stored entries, if the store reports one.
    ///
    /// Expired entries count until they are evicted.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.storage.len()
    }

    /// Returns whether the store holds no entries, if the store reports a
    /// size.
    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        self.storage.is_empty()
    }

    /// Shuts the cache down: clears the store, then consumes the cache and
    /// releases the store with it.
    ///
    /// A failed clear is logged and does not block the shutdown; the store is
    /// dropped regardless.
    pub async fn shutdown(self) {
        if let Err(error) = self.storage.clear().await {
            warn!(cache = self.name, error = %error, "failed to clear entries during shutdown");
        }
        debug!(cache = self.name, "cache shut down");
    }

    async fn do_store(&self, key: &CallKey, value: V) {
        let entry = CacheEntry::new(value, self.clock.system_time(), self.ttl);
        match self.storage.put_if_absent(key, entry).await {
            Ok(PutOutcome::Inserted) => {
                debug!(cache = self.name, key = %key, "stored computed result");
            }
            Ok(PutOutcome::KeptExisting) => {
                debug!(cache = self.name, key = %key, "an entry already exists, kept it");
            }
            Err(error) => {
                warn!(cache = self.name, key = %key, error = %error, "failed to store computed result");
            }
        }
    }
}
