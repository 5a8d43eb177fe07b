//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::defaults::clamp_search_radius;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [search] section
    if let Some(section) = ini.section(Some("search")) {
        if let Some(v) = section.get("default_radius_m") {
            let parsed: f64 = parse_value(
                "search",
                "default_radius_m",
                v,
                "must be a number of meters",
            )?;
            if !parsed.is_finite() {
                return Err(invalid("search", "default_radius_m", v, "must be finite"));
            }
            config.search.default_radius_m = clamp_search_radius(parsed);
        }
    }

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = section.get("min_movement_m") {
            let parsed: f64 = parse_value(
                "location",
                "min_movement_m",
                v,
                "must be a non-negative number of meters",
            )?;
            if !parsed.is_finite() || parsed < 0.0 {
                return Err(invalid(
                    "location",
                    "min_movement_m",
                    v,
                    "must be a non-negative number of meters",
                ));
            }
            config.location.min_movement_m = parsed;
        }
    }

    // [refresh] section
    if let Some(section) = ini.section(Some("refresh")) {
        if let Some(v) = section.get("interval_secs") {
            config.refresh.interval_secs = parse_positive_secs("refresh", "interval_secs", v)?;
        }
        if let Some(v) = section.get("staleness_secs") {
            config.refresh.staleness_secs = parse_value(
                "refresh",
                "staleness_secs",
                v,
                "must be a non-negative integer (seconds)",
            )?;
        }
        if let Some(v) = section.get("fetch_timeout_secs") {
            config.refresh.fetch_timeout_secs =
                parse_positive_secs("refresh", "fetch_timeout_secs", v)?;
        }
    }

    // [feed] section
    if let Some(section) = ini.section(Some("feed")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(invalid("feed", "url", v, "must be an http(s) URL"));
            }
            config.feed.url = v.to_string();
        }
    }

    // [catalog] section
    if let Some(v) = non_empty(ini, "catalog", "path") {
        config.catalog.path = expand_tilde(v);
    }

    // [preferences] section
    if let Some(v) = non_empty(ini, "preferences", "path") {
        config.preferences.path = expand_tilde(v);
    }

    // [logging] section
    if let Some(v) = non_empty(ini, "logging", "file") {
        config.logging.file = expand_tilde(v);
    }

    Ok(config)
}

fn non_empty<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.get_from(Some(section), key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive_secs(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    const REASON: &str = "must be a positive integer (seconds)";
    match parse_value::<u64>(section, key, value, REASON)? {
        0 => Err(invalid(section, key, value, REASON)),
        secs => Ok(secs),
    }
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(crate) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
