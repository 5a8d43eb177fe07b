//! Availability refresh policy.
//!
//! [`RefreshScheduler`] keeps the [`AvailabilityCache`](crate::availability::AvailabilityCache)
//! fresh through two mechanisms that share one fetch path:
//!
//! - **Periodic**: `start()` fetches immediately, then every interval until
//!   `stop()`.
//! - **On demand**: `refresh_if_stale()` fetches only if the last successful
//!   fetch is older than the staleness threshold.
//!
//! Only one fetch runs at a time. A trigger that fires while a fetch is in
//! flight is coalesced into it.

mod scheduler;

pub use scheduler::{
    FetchOutcome, RefreshConfig, RefreshScheduler, RefreshStats, DEFAULT_FETCH_TIMEOUT,
    DEFAULT_REFRESH_INTERVAL, DEFAULT_STALENESS_THRESHOLD,
};
