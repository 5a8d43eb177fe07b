//! Configuration file handling for `~/.parkwhere/config.ini`.
//!
//! Settings structs live in `settings`, constants and defaults in
//! `defaults`, INI parsing in `parser`, and serialization in `writer`.
//! A missing file means all defaults.
//!
//! # Example
//!
//! ```
//! use parkwhere::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.search.default_radius_m, 1000.0);
//! assert_eq!(config.refresh.interval_secs, 120);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    config_directory, config_file_path, DEFAULT_CATALOG_FILE, DEFAULT_FEED_TIMEOUT_SECS,
    DEFAULT_LOG_FILE, DEFAULT_MIN_MOVEMENT_M, DEFAULT_PREFERENCES_FILE,
    DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_SEARCH_RADIUS_M, DEFAULT_STALENESS_SECS,
    MAX_SEARCH_RADIUS_M, MIN_SEARCH_RADIUS_M,
};
pub use file::ConfigFileError;
pub use settings::{
    CatalogSettings, ConfigFile, FeedSettings, LocationSettings, LoggingSettings,
    PreferencesSettings, RefreshSettings, SearchSettings,
};

pub(crate) use parser::{expand_tilde, parse_bool};
