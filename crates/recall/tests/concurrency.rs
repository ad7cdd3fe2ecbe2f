// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Concurrency tests: many tasks contending on one key.

#![cfg(feature = "memory")]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use recall::{CallCache, CallKey, MemoryStore};
use recall_clock::Clock;
use tokio::sync::Barrier;

const TASKS: u32 = 8;

fn contested_cache() -> Arc<CallCache<u64, MemoryStore<CallKey, u64>>> {
    Arc::new(
        CallCache::builder::<u64>(Clock::new())
            .memory()
            .ttl(Duration::from_secs(60))
            .build(),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_contender_computes_and_one_result_is_kept() {
    let cache = contested_cache();
    let barrier = Arc::new(Barrier::new(TASKS as usize));
    let computed = Arc::new(AtomicU32::new(0));
    let key = CallKey::for_call("contested", &(7,)).expect("the key should build");

    let mut handles = Vec::with_capacity(TASKS as usize);
    for task in 0..TASKS {
        let cache = Arc::clone(&cache);
        let barrier = Arc::clone(&barrier);
        let computed = Arc::clone(&computed);
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            cache
                .execute(&key, || async move {
                    // Hold every task inside its computation until all of
                    // them have passed the lookup, so each one observes a
                    // miss and computes.
                    barrier.wait().await;
                    computed.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, std::io::Error>(u64::from(task))
                })
                .await
                .expect("the computation should succeed")
        }));
    }

    let mut results = Vec::with_capacity(TASKS as usize);
    for handle in handles {
        results.push(handle.await.expect("the task should not panic"));
    }

    // There is no lock around the computation: every contender computed and
    // received the result it computed itself.
    assert_eq!(computed.load(Ordering::SeqCst), TASKS);
    for (task, value) in results.iter().enumerate() {
        assert_eq!(*value, task as u64);
    }

    // The store converged on a single winner, one of the computed results.
    let stored = cache
        .peek(&key)
        .await
        .expect("the lookup should succeed")
        .expect("a result should be stored");
    assert!(results.contains(&stored));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn warmed_key_serves_every_task_without_computing() {
    let cache = contested_cache();
    let computed = Arc::new(AtomicU32::new(0));
    let key = CallKey::for_call("contested", &(7,)).expect("the key should build");

    let first = {
        let computed = Arc::clone(&computed);
        cache
            .execute(&key, || async move {
                computed.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>(1)
            })
            .await
            .expect("the computation should succeed")
    };
    assert_eq!(first, 1);

    let mut handles = Vec::with_capacity(TASKS as usize);
    for _ in 0..TASKS {
        let cache = Arc::clone(&cache);
        let computed = Arc::clone(&computed);
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            cache
                .execute(&key, || async move {
                    computed.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, std::io::Error>(2)
                })
                .await
                .expect("the lookup should succeed")
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.expect("the task should not panic"), 1);
    }

    // Only the warming call computed.
    assert_eq!(computed.load(Ordering::SeqCst), 1);
}
