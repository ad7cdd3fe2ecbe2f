// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Recall — transparent caching of call results
//!
//! Recall caches the results of expensive calls without changing how the
//! calls look or behave. Wrap an operation in [`CallCache::intercept`] and
//! equal calls within the time-to-live are served from the store; everything
//! else about the operation, including its failures, passes through
//! unchanged.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//!
//! use recall::CallCache;
//! use recall_clock::Clock;
//! # futures::executor::block_on(async {
//!
//! let cache = CallCache::builder::<Vec<String>>(Clock::new())
//!     .max_entries(10_000)
//!     .memory()
//!     .name("jobs")
//!     .ttl(Duration::from_secs(30))
//!     .build();
//!
//! // The first call runs the closure and stores the result.
//! let jobs = cache
//!     .intercept("find_jobs", &(0, 20), || async {
//!         Ok::<_, std::io::Error>(vec!["build".to_string()])
//!     })
//!     .await?;
//!
//! // An equal call within the TTL never reaches the closure.
//! let cached = cache
//!     .intercept("find_jobs", &(0, 20), || async { Ok::<_, std::io::Error>(Vec::new()) })
//!     .await?;
//! assert_eq!(jobs, cached);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```
//!
//! # How a call becomes an entry
//!
//! Three pieces cooperate, each replaceable on its own:
//!
//! - **Keys.** [`CallKey::for_call`] derives a deterministic key from the
//!   operation name and its ordered arguments, so independently built keys
//!   for equal calls address the same stored result.
//! - **Policy.** [`CallCache::execute`] decides when to serve, when to
//!   compute, and, through [`should_cache`], which results are worth keeping:
//!   absent results never, first-seen empty collections no, anything else
//!   yes.
//! - **Storage.** A [`CacheStore`] holds the entries. Entries carry their own
//!   timestamp and time-to-live; the store keeps them visible until the
//!   policy layer removes them, which is what lets an expired entry vouch
//!   that a call produced results before.
//!
//! The cache degrades rather than fails when its store misbehaves: a failed
//! lookup is treated as a miss and a failed write is logged (via `tracing`)
//! and ignored, so callers still get their computed result.
//!
//! # Bring your own store
//!
//! The `memory` feature (on by default) provides a bounded in-memory store.
//! Any other backend works by implementing [`CacheStore`] and passing it to
//! [`CallCacheBuilder::storage`].
//!
//! # Testing
//!
//! With the `test-util` feature this crate re-exports `MockStore`, which
//! records operations and injects failures, and `recall_clock` provides
//! `ClockControl` for driving expiry without sleeping.
//!
//! # Crate Features
//!
//! - `memory` *(default)*: the built-in bounded in-memory store.
//! - `test-util`: testing helpers, including the mock store and the
//!   controllable clock.

mod builder;
mod cache;
mod cacheable;
mod config;
mod key;

pub use builder::CallCacheBuilder;
pub use cache::{CacheName, CallCache, CallError};
pub use cacheable::{Cacheable, should_cache};
pub use config::CacheConfig;
pub use key::{CallKey, KeyError};
pub use recall_store::{CacheEntry, CacheStore, Error, PutOutcome, Result};

#[cfg(feature = "memory")]
#[cfg_attr(docsrs, doc(cfg(feature = "memory")))]
pub use recall_memory::{MemoryStore, MemoryStoreBuilder};

#[cfg(any(feature = "test-util", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
pub use recall_store::testing::{MockStore, StoreOp};
