//! User preferences.
//!
//! Radius, vehicle-type filter, bookmarks, theme and the first-launch flag.
//! [`PreferencesHandle`] holds the live values and publishes the radius and
//! filter as `watch` streams; a [`PreferenceStore`] persists them.

mod error;
mod handle;
mod model;
mod store;

pub use error::PreferencesError;
pub use handle::{BookmarkChange, PreferencesHandle};
pub use model::{Preferences, ThemeMode, VehicleFilter, DEFAULT_RADIUS_M};
pub use store::{IniPreferenceStore, MemoryPreferenceStore, PreferenceStore};
