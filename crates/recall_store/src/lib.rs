// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Storage abstractions for the `recall` call-result cache.
//!
//! Three pieces live here. [`CacheStore`] is the trait a storage backend
//! implements: a bounded key-value container with atomic conditional
//! insertion. [`CacheEntry`] is what a backend holds: a value together with
//! the timestamp it was stored at and its time-to-live. [`Error`] is how
//! store operations fail.
//!
//! The split keeps policy out of storage. A backend never judges freshness;
//! it returns expired entries like any others, and the policy layer in
//! `recall` decides what expiry means and when to remove an entry. The one
//! concurrency rule a backend must honor is in
//! [`put_if_absent`](CacheStore::put_if_absent): racing writers of one key
//! resolve to exactly one stored entry.
//!
//! # Implementing a Store
//!
//! A store over any synchronized map takes a page of code:
//!
//! ```
//! use std::collections::HashMap;
//! use std::collections::hash_map::Entry;
//! use std::sync::RwLock;
//!
//! use recall_store::{CacheEntry, CacheStore, Error, PutOutcome};
//!
//! struct TableStore<K, V> {
//!     rows: RwLock<HashMap<K, CacheEntry<V>>>,
//! }
//!
//! impl<K, V> CacheStore<K, V> for TableStore<K, V>
//! where
//!     K: Clone + Eq + std::hash::Hash + Send + Sync,
//!     V: Clone + Send + Sync,
//! {
//!     async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
//!         Ok(self.rows.read().unwrap().get(key).cloned())
//!     }
//!
//!     async fn put_if_absent(&self, key: &K, entry: CacheEntry<V>) -> Result<PutOutcome, Error> {
//!         match self.rows.write().unwrap().entry(key.clone()) {
//!             Entry::Occupied(_) => Ok(PutOutcome::KeptExisting),
//!             Entry::Vacant(vacant) => {
//!                 vacant.insert(entry);
//!                 Ok(PutOutcome::Inserted)
//!             }
//!         }
//!     }
//!
//!     async fn remove(&self, key: &K) -> Result<(), Error> {
//!         self.rows.write().unwrap().remove(key);
//!         Ok(())
//!     }
//!
//!     async fn clear(&self) -> Result<(), Error> {
//!         self.rows.write().unwrap().clear();
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Testing Support
//!
//! With the `test-util` feature enabled, the `testing` module provides
//! `MockStore`, an in-memory store that logs every operation in order and
//! can be told to fail chosen ones.

mod entry;
pub mod error;
pub(crate) mod store;
#[cfg(any(feature = "test-util", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
pub mod testing;

#[doc(inline)]
pub use entry::CacheEntry;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use store::{CacheStore, PutOutcome};
