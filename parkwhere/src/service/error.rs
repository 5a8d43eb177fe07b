//! Service error types.

use thiserror::Error;

use crate::availability::FeedError;
use crate::catalog::CatalogError;
use crate::preferences::PreferencesError;

/// Errors that can occur while building or driving the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Facility catalog could not be loaded or queried.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Availability feed client could not be created.
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Preference change was rejected or could not be saved.
    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferencesError),

    /// No Tokio runtime was available to run background work on.
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}
