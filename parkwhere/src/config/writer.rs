//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::defaults::{MAX_SEARCH_RADIUS_M, MIN_SEARCH_RADIUS_M};
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[search]
; Radius used until a radius is chosen, in meters.
; Clamped to {min_radius}..{max_radius}.
default_radius_m = {radius}

[location]
; Device location updates closer than this (meters) to the previous one
; are treated as GPS jitter and ignored.
min_movement_m = {min_movement}

[refresh]
; Interval between background availability fetches while watching (seconds)
interval_secs = {interval}
; An on-demand refresh is skipped if the last successful fetch is younger
; than this (seconds)
staleness_secs = {staleness}
; Upper bound on a single feed request (seconds)
fetch_timeout_secs = {timeout}

[feed]
; Real-time car park availability endpoint
url = {url}

[catalog]
; JSON dataset of car parks (array of records keyed by car_park_no)
path = {catalog}

[preferences]
; Radius, vehicle type, bookmarks and theme
path = {preferences}

[logging]
; Log file, cleared at the start of each session
file = {log_file}
"#,
        min_radius = MIN_SEARCH_RADIUS_M,
        max_radius = MAX_SEARCH_RADIUS_M,
        radius = config.search.default_radius_m,
        min_movement = config.location.min_movement_m,
        interval = config.refresh.interval_secs,
        staleness = config.refresh.staleness_secs,
        timeout = config.refresh.fetch_timeout_secs,
        url = config.feed.url,
        catalog = path_to_string(&config.catalog.path),
        preferences = path_to_string(&config.preferences.path),
        log_file = path_to_string(&config.logging.file),
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
