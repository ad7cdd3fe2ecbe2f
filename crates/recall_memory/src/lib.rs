// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Bounded in-memory storage for cached call results.
//!
//! [`MemoryStore`] keeps entries in a concurrent [moka] cache, so it needs no
//! external service and no locking discipline from its callers. When the
//! store reaches capacity, moka's `TinyLFU` policy picks the entries to
//! evict, favoring keys that are looked up often. Construct a store directly
//! with [`MemoryStore::with_capacity`], or through [`MemoryStoreBuilder`]
//! when more than the capacity needs configuring; neither path exposes moka
//! types in its API.
//!
//! The backend enforces no time-based expiry of its own. Entries carry their
//! expiry metadata with them, and the layer above decides what an aged-out
//! entry means, so an expired entry stays retrievable here on purpose.
//!
//! Size reporting through `CacheStore::len` reads moka's internal entry
//! counter, which is eventually consistent and may briefly lag recent
//! writes. Lookups are not affected; an inserted entry is immediately
//! visible to `get`.
//!
//! # Examples
//!
//! ```
//! use std::time::{Duration, SystemTime};
//!
//! use recall_memory::MemoryStore;
//! use recall_store::{CacheEntry, CacheStore};
//!
//! # futures::executor::block_on(async {
//! let store = MemoryStore::with_capacity(1_000);
//!
//! let entry = CacheEntry::new(42, SystemTime::now(), Duration::from_secs(300));
//! store.put_if_absent(&"key".to_string(), entry).await?;
//!
//! let found = store.get(&"key".to_string()).await?;
//! assert_eq!(*found.unwrap().value(), 42);
//! # Ok::<(), recall_store::Error>(())
//! # });
//! ```
//!
//! [moka]: https://docs.rs/moka

pub mod builder;
pub mod store;

#[doc(inline)]
pub use builder::MemoryStoreBuilder;
#[doc(inline)]
pub use store::MemoryStore;
