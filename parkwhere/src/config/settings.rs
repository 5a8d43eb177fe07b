//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;
use std::time::Duration;

use crate::availability::FeedClientConfig;
use crate::location::ResolverConfig;
use crate::preferences::Preferences;
use crate::refresh::RefreshConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub search: SearchSettings,
    pub location: LocationSettings,
    pub refresh: RefreshSettings,
    pub feed: FeedSettings,
    pub catalog: CatalogSettings,
    pub preferences: PreferencesSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Radius used until the user picks one, in meters.
    pub default_radius_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    /// Device fixes closer than this to the previous one are ignored.
    pub min_movement_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSettings {
    pub interval_secs: u64,
    pub staleness_secs: u64,
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    /// JSON dataset of facilities.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreferencesSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl ConfigFile {
    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            interval: Duration::from_secs(self.refresh.interval_secs),
            staleness_threshold: Duration::from_secs(self.refresh.staleness_secs),
            fetch_timeout: Duration::from_secs(self.refresh.fetch_timeout_secs),
        }
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            min_movement_m: self.location.min_movement_m,
        }
    }

    pub fn feed_client_config(&self) -> FeedClientConfig {
        FeedClientConfig {
            url: self.feed.url.clone(),
            timeout: Duration::from_secs(self.refresh.fetch_timeout_secs),
        }
    }

    /// Preferences used when the preferences file does not set a value.
    pub fn default_preferences(&self) -> Preferences {
        Preferences {
            radius_meters: self.search.default_radius_m,
            ..Preferences::default()
        }
    }
}
