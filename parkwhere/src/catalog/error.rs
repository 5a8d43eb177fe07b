//! Error types for catalog access.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or querying the facility catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog data is not valid JSON or has the wrong shape.
    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    /// The backing store cannot serve queries right now.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}
