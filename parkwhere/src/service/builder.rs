//! Service builder.
//!
//! Every collaborator of [`ParkWhereService`] is constructed here and handed
//! over explicitly; the service itself never reaches for global state.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use super::error::ServiceError;
use super::facade::ParkWhereService;
use crate::availability::{DataGovFeedClient, FeedClient};
use crate::catalog::{load_catalog, ProximityIndex};
use crate::config::ConfigFile;
use crate::location::ResolverConfig;
use crate::preferences::{IniPreferenceStore, MemoryPreferenceStore, PreferenceStore};
use crate::refresh::RefreshConfig;

/// Assembles a [`ParkWhereService`].
///
/// Only the catalog index and the feed client are required. Everything
/// else falls back to defaults: in-memory preferences, default resolver and
/// refresh timings, and the ambient Tokio runtime.
pub struct ServiceBuilder<C: FeedClient> {
    index: Arc<dyn ProximityIndex>,
    feed: C,
    preferences: Option<Arc<dyn PreferenceStore>>,
    resolver_config: ResolverConfig,
    refresh_config: RefreshConfig,
    runtime: Option<Handle>,
}

impl<C: FeedClient> ServiceBuilder<C> {
    pub fn new(index: Arc<dyn ProximityIndex>, feed: C) -> Self {
        Self {
            index,
            feed,
            preferences: None,
            resolver_config: ResolverConfig::default(),
            refresh_config: RefreshConfig::default(),
            runtime: None,
        }
    }

    pub fn with_preference_store(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = Some(store);
        self
    }

    pub fn with_resolver_config(mut self, config: ResolverConfig) -> Self {
        self.resolver_config = config;
        self
    }

    pub fn with_refresh_config(mut self, config: RefreshConfig) -> Self {
        self.refresh_config = config;
        self
    }

    /// Run background work on `handle` instead of the current runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Wire the service and bind the query coordinator to its inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::RuntimeError`] if no runtime handle was given
    /// and the caller is not inside a Tokio runtime.
    pub fn build(self) -> Result<ParkWhereService<C>, ServiceError> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|e| {
                ServiceError::RuntimeError(format!("no Tokio runtime available: {}", e))
            })?,
        };

        let preferences = self
            .preferences
            .unwrap_or_else(|| Arc::new(MemoryPreferenceStore::new()));

        Ok(ParkWhereService::assemble(
            self.index,
            self.feed,
            preferences,
            self.resolver_config,
            self.refresh_config,
            runtime,
        ))
    }
}

impl ServiceBuilder<DataGovFeedClient> {
    /// Builder for the production wiring described by `config`.
    ///
    /// Loads the facility catalog, creates the HTTP feed client and opens
    /// the INI preference store.
    pub fn from_config(config: &ConfigFile) -> Result<Self, ServiceError> {
        let catalog = load_catalog(&config.catalog.path)?;
        info!(
            path = %config.catalog.path.display(),
            facilities = catalog.len(),
            "Facility catalog loaded"
        );

        let feed = DataGovFeedClient::new(config.feed_client_config())?;
        let store = IniPreferenceStore::new(config.preferences.path.clone())
            .with_defaults(config.default_preferences());

        Ok(Self::new(Arc::new(catalog), feed)
            .with_preference_store(Arc::new(store))
            .with_resolver_config(config.resolver_config())
            .with_refresh_config(config.refresh_config()))
    }
}
