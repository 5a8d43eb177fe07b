//! Live preference values.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error::PreferencesError;
use super::model::{Preferences, ThemeMode, VehicleFilter};
use super::store::PreferenceStore;

/// Outcome of [`PreferencesHandle::toggle_bookmark`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkChange {
    pub id: String,
    /// Whether the facility is bookmarked after the toggle.
    pub bookmarked: bool,
}

/// In-memory preferences backed by a [`PreferenceStore`].
///
/// Setters update the live value and notify subscribers first, then
/// persist. If persisting fails the error is logged and returned, but the
/// live value keeps the change.
pub struct PreferencesHandle {
    store: Arc<dyn PreferenceStore>,
    current: Mutex<Preferences>,
    radius_tx: watch::Sender<f64>,
    filter_tx: watch::Sender<VehicleFilter>,
    bookmarks_tx: watch::Sender<Arc<BTreeSet<String>>>,
}

impl PreferencesHandle {
    /// Load preferences from `store`.
    pub fn open(store: Arc<dyn PreferenceStore>) -> Result<Self, PreferencesError> {
        let prefs = store.load()?;
        Ok(Self::with_preferences(store, prefs))
    }

    /// Load preferences from `store`, falling back to defaults on error.
    pub fn open_or_default(store: Arc<dyn PreferenceStore>) -> Self {
        let prefs = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load preferences, using defaults");
            Preferences::default()
        });
        Self::with_preferences(store, prefs)
    }

    fn with_preferences(store: Arc<dyn PreferenceStore>, prefs: Preferences) -> Self {
        let (radius_tx, _) = watch::channel(prefs.radius_meters);
        let (filter_tx, _) = watch::channel(prefs.vehicle_filter);
        let (bookmarks_tx, _) = watch::channel(Arc::new(prefs.bookmarks.clone()));
        Self {
            store,
            current: Mutex::new(prefs),
            radius_tx,
            filter_tx,
            bookmarks_tx,
        }
    }

    /// Copy of every current value.
    pub fn snapshot(&self) -> Preferences {
        self.current.lock().clone()
    }

    pub fn radius(&self) -> f64 {
        self.current.lock().radius_meters
    }

    pub fn vehicle_filter(&self) -> VehicleFilter {
        self.current.lock().vehicle_filter
    }

    pub fn theme(&self) -> ThemeMode {
        self.current.lock().theme
    }

    pub fn bookmarks(&self) -> BTreeSet<String> {
        self.current.lock().bookmarks.clone()
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.current.lock().bookmarks.contains(id)
    }

    pub fn is_first_launch(&self) -> bool {
        self.current.lock().first_launch
    }

    /// Radius stream; the receiver observes the current value first.
    pub fn subscribe_radius(&self) -> watch::Receiver<f64> {
        let mut rx = self.radius_tx.subscribe();
        rx.mark_changed();
        rx
    }

    /// Vehicle filter stream; the receiver observes the current value first.
    pub fn subscribe_vehicle_filter(&self) -> watch::Receiver<VehicleFilter> {
        let mut rx = self.filter_tx.subscribe();
        rx.mark_changed();
        rx
    }

    /// Bookmark set stream; the receiver observes the current value first.
    pub fn subscribe_bookmarks(&self) -> watch::Receiver<Arc<BTreeSet<String>>> {
        let mut rx = self.bookmarks_tx.subscribe();
        rx.mark_changed();
        rx
    }

    /// Change the search radius in meters.
    pub fn set_radius(&self, meters: f64) -> Result<(), PreferencesError> {
        if !meters.is_finite() || meters <= 0.0 {
            return Err(PreferencesError::InvalidRadius(meters));
        }

        let mut prefs = self.current.lock();
        if prefs.radius_meters == meters {
            return Ok(());
        }
        prefs.radius_meters = meters;
        self.radius_tx.send_replace(meters);
        info!(radius_m = meters, "Search radius changed");
        self.persist(&prefs)
    }

    pub fn set_vehicle_filter(&self, filter: VehicleFilter) -> Result<(), PreferencesError> {
        let mut prefs = self.current.lock();
        if prefs.vehicle_filter == filter {
            return Ok(());
        }
        prefs.vehicle_filter = filter;
        self.filter_tx.send_replace(filter);
        debug!(filter = %filter, "Vehicle filter changed");
        self.persist(&prefs)
    }

    /// Add `id` to the bookmarks if absent, remove it if present.
    pub fn toggle_bookmark(&self, id: &str) -> Result<BookmarkChange, PreferencesError> {
        let mut prefs = self.current.lock();
        let bookmarked = if prefs.bookmarks.remove(id) {
            false
        } else {
            prefs.bookmarks.insert(id.to_string());
            true
        };
        self.bookmarks_tx
            .send_replace(Arc::new(prefs.bookmarks.clone()));
        debug!(id, bookmarked, "Bookmark toggled");

        self.persist(&prefs)?;
        Ok(BookmarkChange {
            id: id.to_string(),
            bookmarked,
        })
    }

    pub fn set_theme(&self, theme: ThemeMode) -> Result<(), PreferencesError> {
        let mut prefs = self.current.lock();
        if prefs.theme == theme {
            return Ok(());
        }
        prefs.theme = theme;
        self.persist(&prefs)
    }

    /// Clear the first-launch flag. Returns whether it was set.
    pub fn complete_first_launch(&self) -> Result<bool, PreferencesError> {
        let mut prefs = self.current.lock();
        if !prefs.first_launch {
            return Ok(false);
        }
        prefs.first_launch = false;
        self.persist(&prefs)?;
        Ok(true)
    }

    /// Saves run under the value lock so writes reach the store in order.
    fn persist(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        self.store.save(prefs).map_err(|e| {
            warn!(error = %e, "Failed to persist preferences, change kept in memory");
            e
        })
    }
}
