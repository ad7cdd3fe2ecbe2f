// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Demonstrates transparent interception of calls, the cacheability rules,
//! and the log events the cache emits.
//!
//! The subscriber is set to TRACE so every cache decision is visible on
//! stdout: hits, misses, stores, and results judged not worth storing.

use recall::{CacheConfig, CallCache};
use recall_clock::Clock;

/// Search filter forwarded to the pretend job service.
#[derive(serde::Serialize)]
struct JobFilter {
    status: &'static str,
    page: u32,
    size: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    // Limits can come from application settings
    let config = CacheConfig {
        max_entries: 1_000,
        ttl_seconds: 30,
    };
    let cache = CallCache::builder::<Vec<String>>(Clock::new())
        .config(&config)
        .memory()
        .name("jobs")
        .build();

    let open = JobFilter {
        status: "open",
        page: 0,
        size: 20,
    };

    // The first call reaches the service and stores its result
    let jobs = cache
        .intercept("find_jobs", &open, || async { find_jobs(&open).await })
        .await?;
    println!("first call:  {jobs:?}");

    // An equal call is served from the store; the service is not consulted
    let jobs = cache
        .intercept("find_jobs", &open, || async { find_jobs(&open).await })
        .await?;
    println!("second call: {jobs:?}");

    // An empty result seen for the first time is returned but not stored,
    // so the next call will ask the service again
    let closed = JobFilter {
        status: "closed",
        page: 0,
        size: 20,
    };
    let jobs = cache
        .intercept("find_jobs", &closed, || async { find_jobs(&closed).await })
        .await?;
    println!("empty call:  {jobs:?}");

    Ok(())
}

/// The pretend job service. Closed jobs never have results.
async fn find_jobs(filter: &JobFilter) -> Result<Vec<String>, std::io::Error> {
    if filter.status == "closed" {
        return Ok(Vec::new());
    }
    let first = filter.page * filter.size;
    Ok(vec![
        format!("{}_job_{}", filter.status, first),
        format!("{}_job_{}", filter.status, first + 1),
    ])
}
