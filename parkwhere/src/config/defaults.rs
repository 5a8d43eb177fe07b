//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::availability::feed::{DEFAULT_FEED_URL, DEFAULT_FETCH_TIMEOUT_SECS};

// =============================================================================
// Search
// =============================================================================

pub const DEFAULT_SEARCH_RADIUS_M: f64 = 1000.0;
pub const MIN_SEARCH_RADIUS_M: f64 = 100.0;
pub const MAX_SEARCH_RADIUS_M: f64 = 5000.0;

/// Clamps the search radius to its valid range and logs a warning if clamped.
pub(super) fn clamp_search_radius(value: f64) -> f64 {
    if value < MIN_SEARCH_RADIUS_M {
        tracing::warn!(
            requested = value,
            min = MIN_SEARCH_RADIUS_M,
            max = MAX_SEARCH_RADIUS_M,
            "default_radius_m below minimum, clamping to {}",
            MIN_SEARCH_RADIUS_M
        );
        MIN_SEARCH_RADIUS_M
    } else if value > MAX_SEARCH_RADIUS_M {
        tracing::warn!(
            requested = value,
            min = MIN_SEARCH_RADIUS_M,
            max = MAX_SEARCH_RADIUS_M,
            "default_radius_m above maximum, clamping to {}",
            MAX_SEARCH_RADIUS_M
        );
        MAX_SEARCH_RADIUS_M
    } else {
        value
    }
}

// =============================================================================
// Location and refresh
// =============================================================================

pub const DEFAULT_MIN_MOVEMENT_M: f64 = 10.0;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 120;
pub const DEFAULT_STALENESS_SECS: u64 = 60;
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = DEFAULT_FETCH_TIMEOUT_SECS;

// =============================================================================
// Paths
// =============================================================================

pub const DEFAULT_CATALOG_FILE: &str = "carparks.json";
pub const DEFAULT_PREFERENCES_FILE: &str = "preferences.ini";
pub const DEFAULT_LOG_FILE: &str = "parkwhere.log";

/// Get the path to the config directory (~/.parkwhere).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".parkwhere")
}

/// Get the path to the config file (~/.parkwhere/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

impl Default for ConfigFile {
    fn default() -> Self {
        let dir = config_directory();
        Self {
            search: SearchSettings {
                default_radius_m: DEFAULT_SEARCH_RADIUS_M,
            },
            location: LocationSettings {
                min_movement_m: DEFAULT_MIN_MOVEMENT_M,
            },
            refresh: RefreshSettings {
                interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
                staleness_secs: DEFAULT_STALENESS_SECS,
                fetch_timeout_secs: DEFAULT_FEED_TIMEOUT_SECS,
            },
            feed: FeedSettings {
                url: DEFAULT_FEED_URL.to_string(),
            },
            catalog: CatalogSettings {
                path: dir.join(DEFAULT_CATALOG_FILE),
            },
            preferences: PreferencesSettings {
                path: dir.join(DEFAULT_PREFERENCES_FILE),
            },
            logging: LoggingSettings {
                file: dir.join(DEFAULT_LOG_FILE),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_search_radius() {
        assert_eq!(clamp_search_radius(50.0), MIN_SEARCH_RADIUS_M);
        assert_eq!(clamp_search_radius(9000.0), MAX_SEARCH_RADIUS_M);
        assert_eq!(clamp_search_radius(750.0), 750.0);
    }

    #[test]
    fn test_default_paths_under_config_directory() {
        let config = ConfigFile::default();
        let dir = config_directory();
        assert_eq!(config.catalog.path, dir.join("carparks.json"));
        assert_eq!(config.preferences.path, dir.join("preferences.ini"));
        assert_eq!(config.logging.file, dir.join("parkwhere.log"));
        assert!(config_file_path().ends_with(".parkwhere/config.ini"));
    }
}
