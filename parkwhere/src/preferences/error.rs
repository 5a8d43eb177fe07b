//! Error types for preference storage.

use thiserror::Error;

/// Errors that can occur while loading, changing or saving preferences.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// Preferences file exists but could not be read or parsed.
    #[error("Failed to read preferences: {0}")]
    ReadError(#[from] ini::Error),

    /// Preferences could not be written.
    #[error("Failed to write preferences: {0}")]
    WriteError(String),

    /// Parent directory could not be created.
    #[error("Failed to create preferences directory: {0}")]
    DirectoryError(std::io::Error),

    /// Radius must be finite and positive.
    #[error("Invalid search radius: {0}")]
    InvalidRadius(f64),
}
