// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Injectable wall-clock time.
//!
//! Code that makes decisions based on the current time is hard to test against the
//! real system clock. This crate provides a [`Clock`] handle that reads the operating
//! system time in production, and — with the `test-util` feature enabled — a
//! [`ClockControl`] that freezes time and advances it manually so expiry logic can be
//! exercised deterministically and instantly.
//!
//! # Examples
//!
//! Production code takes a [`Clock`] and never cares where the time comes from:
//!
//! ```
//! use recall_clock::Clock;
//!
//! fn timestamp(clock: &Clock) -> std::time::SystemTime {
//!     clock.system_time()
//! }
//!
//! let clock = Clock::new();
//! let _ = timestamp(&clock);
//! ```
//!
//! Tests construct the clock from a control and move time by hand:
//!
//! ```
//! # #[cfg(feature = "test-util")]
//! # {
//! use std::time::{Duration, SystemTime};
//!
//! use recall_clock::ClockControl;
//!
//! let control = ClockControl::new();
//! let clock = control.to_clock();
//!
//! assert_eq!(clock.system_time(), SystemTime::UNIX_EPOCH);
//!
//! control.advance(Duration::from_secs(61));
//! assert_eq!(
//!     clock.system_time(),
//!     SystemTime::UNIX_EPOCH + Duration::from_secs(61)
//! );
//! # }
//! ```

mod clock;
#[cfg(any(feature = "test-util", test))]
mod clock_control;

#[doc(inline)]
pub use clock::Clock;
#[cfg(any(feature = "test-util", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
#[doc(inline)]
pub use clock_control::ClockControl;
