//! Real-time lot availability.
//!
//! The remote feed is fetched by a [`FeedClient`], decoded into an
//! [`AvailabilitySnapshot`], and published through the
//! [`AvailabilityCache`]. Snapshots are immutable: every successful fetch
//! replaces the whole snapshot, so readers never see a mix of two fetches.
//!
//! # Architecture
//!
//! ```text
//! RefreshScheduler ──► FeedClient::fetch() ──► AvailabilitySnapshot
//!                                                     │
//!                                                     ▼
//!                                  AvailabilityCache (watch, replace-only)
//!                                                     │
//!                              ┌──────────────────────┴──────────┐
//!                              ▼                                 ▼
//!                      get(id) lookups              subscribe() observers
//! ```

mod cache;
pub mod feed;
mod model;
mod recency;

pub use cache::AvailabilityCache;
pub use feed::{DataGovFeedClient, FeedClient, FeedClientConfig, FeedError};
pub use model::{AvailabilityRecord, AvailabilitySnapshot, LotAvailability, LotType};
pub use recency::{parse_feed_timestamp, Recency, FEED_UTC_OFFSET_SECS};
