//! Remote availability feed.
//!
//! # Architecture
//!
//! ```text
//! FeedClient trait ──► DataGovFeedClient (reqwest)
//!        │
//!        └── wire::decode() ──► AvailabilitySnapshot
//! ```
//!
//! Only `items[0]` of a response is used. Lot counts arrive as strings and
//! are parsed per lot; a lot that fails to parse is dropped without
//! discarding the rest of its facility.

mod client;
mod config;
mod error;
mod wire;

pub use client::{DataGovFeedClient, FeedClient};
pub use config::{FeedClientConfig, DEFAULT_FEED_URL, DEFAULT_FETCH_TIMEOUT_SECS};
pub use error::FeedError;
pub use wire::decode;
