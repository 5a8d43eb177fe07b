//! Preference values.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Default search radius in meters.
pub const DEFAULT_RADIUS_M: f64 = 1000.0;

/// Which lot types the user cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VehicleFilter {
    #[default]
    Both,
    Car,
    Motorcycle,
}

impl VehicleFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleFilter::Both => "both",
            VehicleFilter::Car => "car",
            VehicleFilter::Motorcycle => "motorcycle",
        }
    }

    pub fn shows_car(&self) -> bool {
        matches!(self, VehicleFilter::Both | VehicleFilter::Car)
    }

    pub fn shows_motorcycle(&self) -> bool {
        matches!(self, VehicleFilter::Both | VehicleFilter::Motorcycle)
    }
}

impl FromStr for VehicleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "both" | "all" => Ok(VehicleFilter::Both),
            "car" | "cars" => Ok(VehicleFilter::Car),
            "motorcycle" | "motorcycles" | "moto" => Ok(VehicleFilter::Motorcycle),
            other => Err(format!(
                "unknown vehicle type '{}', expected both, car or motorcycle",
                other
            )),
        }
    }
}

impl fmt::Display for VehicleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(ThemeMode::System),
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!(
                "unknown theme '{}', expected system, light or dark",
                other
            )),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every persisted user preference.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub radius_meters: f64,
    pub vehicle_filter: VehicleFilter,
    /// Bookmarked facility ids.
    pub bookmarks: BTreeSet<String>,
    pub theme: ThemeMode,
    pub first_launch: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_RADIUS_M,
            vehicle_filter: VehicleFilter::Both,
            bookmarks: BTreeSet::new(),
            theme: ThemeMode::System,
            first_launch: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.radius_meters, 1000.0);
        assert_eq!(prefs.vehicle_filter, VehicleFilter::Both);
        assert!(prefs.bookmarks.is_empty());
        assert_eq!(prefs.theme, ThemeMode::System);
        assert!(prefs.first_launch);
    }

    #[test]
    fn test_vehicle_filter_parse() {
        assert_eq!("Car".parse::<VehicleFilter>().unwrap(), VehicleFilter::Car);
        assert_eq!(" motorcycle ".parse::<VehicleFilter>().unwrap(), VehicleFilter::Motorcycle);
        assert!("truck".parse::<VehicleFilter>().is_err());
        assert!(VehicleFilter::Both.shows_car() && VehicleFilter::Both.shows_motorcycle());
        assert!(!VehicleFilter::Car.shows_motorcycle());
    }

    #[test]
    fn test_theme_parse_roundtrip_names() {
        for theme in [ThemeMode::System, ThemeMode::Light, ThemeMode::Dark] {
            assert_eq!(theme.as_str().parse::<ThemeMode>().unwrap(), theme);
        }
    }
}
