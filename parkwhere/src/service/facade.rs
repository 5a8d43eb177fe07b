//! ParkWhere service facade implementation.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::ServiceError;
use crate::availability::{
    AvailabilityCache, AvailabilitySnapshot, DataGovFeedClient, FeedClient,
};
use crate::catalog::{Facility, ProximityIndex};
use crate::geo::GeoPoint;
use crate::location::{ActiveLocationResolver, ResolverConfig};
use crate::preferences::{BookmarkChange, PreferenceStore, PreferencesHandle, VehicleFilter};
use crate::presentation::{join_availability, NearbyEntry};
use crate::query::{CoordinatorStats, ProximityQueryCoordinator, QueryParameters};
use crate::refresh::{FetchOutcome, RefreshConfig, RefreshScheduler, RefreshStats};
use crate::search::{NearbySearchEngine, RankedResult};

/// Nearby car park search with live availability.
///
/// Data flows one way:
///
/// ```text
/// device fixes ──┐
///                ├─► ActiveLocationResolver ──► active point ──┐
/// override ──────┘                                             ├─► coordinator ──► results
/// preferences ──────────────────────────────────► radius ──────┘
///
/// feed ──► RefreshScheduler ──► AvailabilityCache ──► snapshot
/// ```
///
/// Results and availability are joined only when a caller asks for
/// [`nearby_entries`](Self::nearby_entries).
pub struct ParkWhereService<C: FeedClient = DataGovFeedClient> {
    index: Arc<dyn ProximityIndex>,
    resolver: Arc<ActiveLocationResolver>,
    coordinator: ProximityQueryCoordinator,
    cache: Arc<AvailabilityCache>,
    scheduler: RefreshScheduler<C>,
    preferences: Arc<PreferencesHandle>,
    shutdown: CancellationToken,
    binding: Mutex<Option<JoinHandle<()>>>,
}

impl<C: FeedClient> ParkWhereService<C> {
    pub(super) fn assemble(
        index: Arc<dyn ProximityIndex>,
        feed: C,
        preference_store: Arc<dyn PreferenceStore>,
        resolver_config: ResolverConfig,
        refresh_config: RefreshConfig,
        runtime: Handle,
    ) -> Self {
        let min_movement_m = resolver_config.min_movement_m;
        let resolver = Arc::new(ActiveLocationResolver::with_config(resolver_config));
        let preferences = Arc::new(PreferencesHandle::open_or_default(preference_store));

        let engine = NearbySearchEngine::new(Arc::clone(&index));
        let coordinator = ProximityQueryCoordinator::new(engine, runtime.clone());

        let cache = Arc::new(AvailabilityCache::new());
        let scheduler =
            RefreshScheduler::with_config(feed, Arc::clone(&cache), refresh_config, runtime);

        let shutdown = CancellationToken::new();
        let binding = coordinator.bind(
            resolver.subscribe(),
            preferences.subscribe_radius(),
            shutdown.clone(),
        );

        info!(
            radius_m = preferences.radius(),
            min_movement_m,
            "ParkWhere service started"
        );

        Self {
            index,
            resolver,
            coordinator,
            cache,
            scheduler,
            preferences,
            shutdown,
            binding: Mutex::new(Some(binding)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Observable streams
    // ─────────────────────────────────────────────────────────────────────

    /// Active reference point. Absent when there is neither a device fix
    /// nor a search override.
    pub fn subscribe_active_point(&self) -> watch::Receiver<Option<GeoPoint>> {
        self.resolver.subscribe()
    }

    /// Ranked search results for the current active point and radius.
    pub fn subscribe_results(&self) -> watch::Receiver<RankedResult> {
        self.coordinator.subscribe()
    }

    /// Latest availability snapshot.
    pub fn subscribe_availability(&self) -> watch::Receiver<Arc<AvailabilitySnapshot>> {
        self.cache.subscribe()
    }

    pub fn subscribe_vehicle_filter(&self) -> watch::Receiver<VehicleFilter> {
        self.preferences.subscribe_vehicle_filter()
    }

    pub fn subscribe_bookmarks(&self) -> watch::Receiver<Arc<BTreeSet<String>>> {
        self.preferences.subscribe_bookmarks()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Location and search inputs
    // ─────────────────────────────────────────────────────────────────────

    /// Feed a device location fix. Returns whether it was accepted.
    pub fn device_location_changed(&self, location: GeoPoint) -> bool {
        self.resolver.on_device_location_changed(location)
    }

    /// Device location is no longer available.
    pub fn device_location_lost(&self) {
        self.resolver.on_device_location_lost();
    }

    /// Search around `point` instead of the device location, or revert to
    /// the device location with `None`.
    pub fn set_search_override(&self, point: Option<GeoPoint>) {
        self.resolver.set_override(point);
    }

    /// Change the search radius in meters.
    ///
    /// # Errors
    ///
    /// Rejects non-positive or non-finite radii. A persistence failure is
    /// also returned, but the new radius still takes effect.
    pub fn set_radius(&self, meters: f64) -> Result<(), ServiceError> {
        self.preferences.set_radius(meters)?;
        Ok(())
    }

    pub fn set_vehicle_filter(&self, filter: VehicleFilter) -> Result<(), ServiceError> {
        self.preferences.set_vehicle_filter(filter)?;
        Ok(())
    }

    pub fn active_point(&self) -> Option<GeoPoint> {
        self.resolver.active_point()
    }

    pub fn radius(&self) -> f64 {
        self.preferences.radius()
    }

    /// Parameters of the live query, if any.
    pub fn current_params(&self) -> Option<QueryParameters> {
        self.coordinator.current_params()
    }

    /// Most recently published result.
    pub fn current_result(&self) -> RankedResult {
        self.coordinator.current_result()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Availability refresh
    // ─────────────────────────────────────────────────────────────────────

    /// Fetch availability if the cache is older than the staleness threshold.
    pub fn refresh_if_stale(&self) -> Option<JoinHandle<FetchOutcome>> {
        self.scheduler.refresh_if_stale()
    }

    /// Fetch availability now, regardless of staleness.
    pub async fn refresh_now(&self) -> FetchOutcome {
        self.scheduler.perform_fetch().await
    }

    /// Returns `false` if periodic refresh was already running.
    pub fn start_periodic_refresh(&self) -> bool {
        self.scheduler.start()
    }

    /// Returns `false` if periodic refresh was not running.
    pub fn stop_periodic_refresh(&self) -> bool {
        self.scheduler.stop()
    }

    pub fn availability(&self) -> Arc<AvailabilitySnapshot> {
        self.cache.snapshot()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Presentation
    // ─────────────────────────────────────────────────────────────────────

    /// Current results joined with availability, bookmark state and the
    /// vehicle filter, in result order.
    pub fn nearby_entries(&self, now: DateTime<Utc>) -> Vec<NearbyEntry> {
        join_availability(
            &self.coordinator.current_result(),
            &self.cache.snapshot(),
            self.preferences.vehicle_filter(),
            &self.preferences.bookmarks(),
            now,
        )
    }

    pub fn preferences(&self) -> &Arc<PreferencesHandle> {
        &self.preferences
    }

    pub fn toggle_bookmark(&self, id: &str) -> Result<BookmarkChange, ServiceError> {
        Ok(self.preferences.toggle_bookmark(id)?)
    }

    /// Bookmarked facilities sorted by id.
    ///
    /// Ids that are no longer in the catalog are skipped. The lookup goes
    /// through the catalog index and may block.
    pub fn bookmarked_facilities(&self) -> Result<Vec<Arc<Facility>>, ServiceError> {
        let mut facilities = Vec::new();
        for id in self.preferences.bookmarks() {
            match self.index.find_by_id(&id)? {
                Some(facility) => facilities.push(facility),
                None => warn!(id = %id, "Bookmarked facility not in catalog, skipping"),
            }
        }
        Ok(facilities)
    }

    pub fn index(&self) -> &Arc<dyn ProximityIndex> {
        &self.index
    }

    // ─────────────────────────────────────────────────────────────────────
    // Diagnostics
    // ─────────────────────────────────────────────────────────────────────

    pub fn coordinator_stats(&self) -> CoordinatorStats {
        self.coordinator.stats()
    }

    pub fn refresh_stats(&self) -> RefreshStats {
        self.scheduler.stats()
    }

    /// Message of the most recent search failure.
    pub fn last_search_failure(&self) -> Option<String> {
        self.coordinator.last_failure()
    }

    pub fn last_refresh_error(&self) -> Option<String> {
        self.scheduler.last_error()
    }

    pub fn scheduler(&self) -> &RefreshScheduler<C> {
        &self.scheduler
    }

    /// Stop periodic refresh and unbind the query coordinator.
    ///
    /// Idempotent. Streams keep their last values.
    pub fn shutdown(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();
        self.scheduler.stop();
        if let Some(binding) = self.binding.lock().take() {
            binding.abort();
        }
        self.coordinator.detach();
        debug!("ParkWhere service shut down");
    }
}

impl<C: FeedClient> Drop for ParkWhereService<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
