// Copyright (c) Microsoft Corporation.

//! Simple Call Cache Example
//!
//! Demonstrates the basic operations of the call cache: executing with a
//! prebuilt key, peeking, invalidating, and shutting down.

use std::time::Duration;

use recall::{CallCache, CallKey};
use recall_clock::Clock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build a cache over the in-memory store with a 5-second TTL
    let cache = CallCache::builder::<String>(Clock::new())
        .max_entries(1_000)
        .memory()
        .name("users")
        .ttl(Duration::from_secs(5))
        .build();

    // Derive a key from the operation name and its ordered arguments
    let key = CallKey::for_call("load_user", &(1,))?;

    // The first call computes and stores the result
    let user = cache
        .execute(&key, || async { Ok::<_, std::io::Error>(load_user(1).await) })
        .await?;
    println!("computed: {user}");

    // An equal call is served from the store; this closure does not run
    let user = cache
        .execute(&key, || async {
            Ok::<_, std::io::Error>("someone else".to_string())
        })
        .await?;
    println!("cached:   {user}");

    // Peeking observes the store without computing
    println!("peek:     {:?}", cache.peek(&key).await?);

    // Invalidation forces the next call to compute again
    cache.invalidate(&key).await?;
    println!("after invalidate: {:?}", cache.peek(&key).await?);

    // Clear the store and release it
    cache.shutdown().await;

    Ok(())
}

async fn load_user(id: u32) -> String {
    format!("user_{id}")
}
