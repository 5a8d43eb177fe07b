//! Feed client trait and HTTP implementation.

use std::future::Future;
use std::sync::Arc;

use super::config::FeedClientConfig;
use super::error::FeedError;
use super::wire;
use crate::availability::model::AvailabilitySnapshot;

/// Fetches one complete availability snapshot from the remote feed.
pub trait FeedClient: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<AvailabilitySnapshot, FeedError>> + Send;
}

impl<C: FeedClient> FeedClient for Arc<C> {
    fn fetch(&self) -> impl Future<Output = Result<AvailabilitySnapshot, FeedError>> + Send {
        (**self).fetch()
    }
}

/// Client for the data.gov.sg car park availability endpoint.
///
/// Holds one reusable `reqwest::Client` with connection pooling and a
/// request timeout.
pub struct DataGovFeedClient {
    http: reqwest::Client,
    url: String,
}

impl DataGovFeedClient {
    pub fn new(config: FeedClientConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FeedError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FeedClient for DataGovFeedClient {
    async fn fetch(&self) -> Result<AvailabilitySnapshot, FeedError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FeedError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FeedError::Http(e.to_string()))?;

        let snapshot = wire::decode(&bytes)?;

        tracing::debug!(
            url = %self.url,
            bytes = bytes.len(),
            facilities = snapshot.len(),
            "Availability feed fetched"
        );

        Ok(snapshot)
    }
}
