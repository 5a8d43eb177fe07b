//! Preference persistence.

use std::path::{Path, PathBuf};

use ini::Ini;
use parking_lot::Mutex;
use tracing::warn;

use super::error::PreferencesError;
use super::model::Preferences;
use crate::config::parse_bool;

/// Persists [`Preferences`] as a whole.
pub trait PreferenceStore: Send + Sync {
    /// Load stored preferences, or defaults if nothing is stored yet.
    fn load(&self) -> Result<Preferences, PreferencesError>;

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError>;
}

/// Non-persistent store, for tests and one-shot commands.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    stored: Mutex<Option<Preferences>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `preferences` already stored.
    pub fn with_preferences(preferences: Preferences) -> Self {
        Self {
            stored: Mutex::new(Some(preferences)),
        }
    }

    /// What was last saved.
    pub fn stored(&self) -> Option<Preferences> {
        self.stored.lock().clone()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences, PreferencesError> {
        Ok(self.stored.lock().clone().unwrap_or_default())
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        *self.stored.lock() = Some(preferences.clone());
        Ok(())
    }
}

const SECTION_SEARCH: &str = "search";
const SECTION_DISPLAY: &str = "display";
const SECTION_BOOKMARKS: &str = "bookmarks";
const SECTION_APP: &str = "app";

/// INI file store.
///
/// Unrecognised or malformed values fall back to their defaults with a
/// warning, so a hand-edited file never prevents startup.
pub struct IniPreferenceStore {
    path: PathBuf,
    defaults: Preferences,
}

impl IniPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            defaults: Preferences::default(),
        }
    }

    /// Values used for anything the file does not set.
    pub fn with_defaults(mut self, defaults: Preferences) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for IniPreferenceStore {
    fn load(&self) -> Result<Preferences, PreferencesError> {
        if !self.path.exists() {
            return Ok(self.defaults.clone());
        }
        let ini = Ini::load_from_file(&self.path)?;
        Ok(parse_preferences(&ini, self.defaults.clone()))
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(PreferencesError::DirectoryError)?;
        }
        to_ini(preferences)
            .write_to_file(&self.path)
            .map_err(|e| PreferencesError::WriteError(e.to_string()))
    }
}

fn parse_preferences(ini: &Ini, mut prefs: Preferences) -> Preferences {
    if let Some(v) = ini.get_from(Some(SECTION_SEARCH), "radius_m") {
        match v.trim().parse::<f64>() {
            Ok(r) if r.is_finite() && r > 0.0 => prefs.radius_meters = r,
            _ => warn!(value = v, "Ignoring invalid stored radius"),
        }
    }

    if let Some(section) = ini.section(Some(SECTION_DISPLAY)) {
        if let Some(v) = section.get("vehicle_type") {
            match v.parse() {
                Ok(filter) => prefs.vehicle_filter = filter,
                Err(reason) => warn!(value = v, %reason, "Ignoring stored vehicle type"),
            }
        }
        if let Some(v) = section.get("theme") {
            match v.parse() {
                Ok(theme) => prefs.theme = theme,
                Err(reason) => warn!(value = v, %reason, "Ignoring stored theme"),
            }
        }
    }

    if let Some(v) = ini.get_from(Some(SECTION_BOOKMARKS), "ids") {
        prefs.bookmarks = v
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(v) = ini.get_from(Some(SECTION_APP), "first_launch") {
        prefs.first_launch = parse_bool(v);
    }

    prefs
}

fn to_ini(prefs: &Preferences) -> Ini {
    let bookmarks = prefs
        .bookmarks
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",");

    let mut ini = Ini::new();
    ini.with_section(Some(SECTION_SEARCH))
        .set("radius_m", prefs.radius_meters.to_string());
    ini.with_section(Some(SECTION_DISPLAY))
        .set("vehicle_type", prefs.vehicle_filter.as_str())
        .set("theme", prefs.theme.as_str());
    ini.with_section(Some(SECTION_BOOKMARKS)).set("ids", bookmarks);
    ini.with_section(Some(SECTION_APP))
        .set("first_launch", prefs.first_launch.to_string());
    ini
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{ThemeMode, VehicleFilter};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = IniPreferenceStore::new(dir.path().join("prefs.ini"));
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = IniPreferenceStore::new(dir.path().join("nested").join("prefs.ini"));

        let mut prefs = Preferences::default();
        prefs.radius_meters = 750.0;
        prefs.vehicle_filter = VehicleFilter::Motorcycle;
        prefs.theme = ThemeMode::Dark;
        prefs.bookmarks.insert("ACB".into());
        prefs.bookmarks.insert("HE12".into());
        prefs.first_launch = false;

        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.ini");
        std::fs::write(
            &path,
            "[search]\nradius_m = wide\n[display]\nvehicle_type = bus\ntheme = dark\n[bookmarks]\nids = A, ,B\n",
        )
        .unwrap();

        let prefs = IniPreferenceStore::new(&path).load().unwrap();
        assert_eq!(prefs.radius_meters, 1000.0);
        assert_eq!(prefs.vehicle_filter, VehicleFilter::Both);
        assert_eq!(prefs.theme, ThemeMode::Dark);
        assert_eq!(prefs.bookmarks.len(), 2);
        assert!(prefs.first_launch);
    }

    #[test]
    fn test_custom_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.ini");
        let defaults = Preferences {
            radius_meters: 400.0,
            ..Preferences::default()
        };
        let store = IniPreferenceStore::new(&path).with_defaults(defaults.clone());
        assert_eq!(store.load().unwrap(), defaults);

        std::fs::write(&path, "[display]\ntheme = light\n").unwrap();
        let prefs = store.load().unwrap();
        assert_eq!(prefs.radius_meters, 400.0);
        assert_eq!(prefs.theme, ThemeMode::Light);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.load().unwrap(), Preferences::default());
        assert!(store.stored().is_none());

        let mut prefs = Preferences::default();
        prefs.radius_meters = 300.0;
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap().radius_meters, 300.0);
    }
}
