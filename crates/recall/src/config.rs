// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Declarative cache configuration, loadable from serialized settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable limits for a call cache.
///
/// The configuration can be embedded in application settings and applied to a
/// builder with [`CallCacheBuilder::config`][crate::CallCacheBuilder::config].
/// Missing fields deserialize to their defaults.
///
/// ```
/// use recall::CacheConfig;
///
/// let config: CacheConfig = serde_json::from_str(r#"{ "ttl_seconds": 30 }"#)?;
///
/// assert_eq!(config.ttl_seconds, 30);
/// assert_eq!(config.max_entries, 10_000);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Upper bound on the number of entries the store keeps.
    pub max_entries: u64,

    /// Time-to-live for stored entries, in seconds.
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl_seconds: 60,
        }
    }
}

impl CacheConfig {
    /// Returns the time-to-live as a [`Duration`].
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}
