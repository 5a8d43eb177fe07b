//! Feed client configuration.

use std::time::Duration;

/// Public car park availability endpoint.
pub const DEFAULT_FEED_URL: &str = "https://api.data.gov.sg/v1/transport/carpark-availability";

/// Default request timeout.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`DataGovFeedClient`](super::DataGovFeedClient).
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for FeedClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}
