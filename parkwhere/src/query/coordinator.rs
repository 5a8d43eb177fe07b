//! Proximity query coordinator.
//!
//! Owns the single live binding between the current [`QueryParameters`] and
//! the search that produces their [`RankedResult`].
//!
//! # State machine
//!
//! ```text
//!                 change(point, radius)
//!                          │
//!                          ▼
//!              ┌──── params == previous? ────┐
//!              │ yes                         │ no
//!              ▼                             ▼
//!          no action                 detach old binding
//!        (deduplicated)              generation += 1
//!                                            │
//!                          ┌─────────────────┴─────────────────┐
//!                          │ params absent                     │ params present
//!                          ▼                                   ▼
//!                   publish empty                 spawn search on blocking pool,
//!                                                 bind it as the live query
//!                                                              │
//!                                                              ▼
//!                                              completion: generation still current?
//!                                               yes → publish (empty on failure)
//!                                               no  → discard
//! ```
//!
//! Every state transition and every publication happens while holding the
//! coordinator's lock. That lock is the single publication context: an
//! observer never sees a result for parameters that were already replaced.
//! Search execution itself runs on tokio's blocking pool and never holds
//! the lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::params::QueryParameters;
use crate::catalog::CatalogError;
use crate::geo::GeoPoint;
use crate::search::{NearbySearchEngine, RankedResult};

/// Counters for monitoring the coordinator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorStats {
    /// Searches dispatched to the engine.
    pub searches_started: u64,
    /// Results published to subscribers, including empty ones.
    pub results_published: u64,
    /// Searches detached before they completed.
    pub superseded: u64,
    /// Searches that failed and were replaced by an empty result.
    pub failures: u64,
    /// Input changes that left the parameters unchanged.
    pub deduplicated: u64,
}

#[derive(Default)]
struct Counters {
    searches_started: AtomicU64,
    results_published: AtomicU64,
    superseded: AtomicU64,
    failures: AtomicU64,
    deduplicated: AtomicU64,
}

struct CoordinatorState {
    point: Option<GeoPoint>,
    radius_meters: Option<f64>,
    params: Option<QueryParameters>,
    /// Incremented on every parameter change; a search may only publish if
    /// the generation it was started under is still current.
    generation: u64,
    binding: Option<JoinHandle<()>>,
    last_failure: Option<String>,
}

struct Inner {
    engine: NearbySearchEngine,
    runtime: Handle,
    state: Mutex<CoordinatorState>,
    results_tx: watch::Sender<RankedResult>,
    counters: Counters,
}

/// Turns (active point, radius) changes into a deduplicated result stream.
///
/// Cloning yields another handle to the same coordinator.
#[derive(Clone)]
pub struct ProximityQueryCoordinator {
    inner: Arc<Inner>,
}

impl ProximityQueryCoordinator {
    /// Create a coordinator that runs searches on `runtime`.
    pub fn new(engine: NearbySearchEngine, runtime: Handle) -> Self {
        let (results_tx, _) = watch::channel(RankedResult::empty());
        Self {
            inner: Arc::new(Inner {
                engine,
                runtime,
                state: Mutex::new(CoordinatorState {
                    point: None,
                    radius_meters: None,
                    params: None,
                    generation: 0,
                    binding: None,
                    last_failure: None,
                }),
                results_tx,
                counters: Counters::default(),
            }),
        }
    }

    /// Apply a new active point (or its absence).
    pub fn set_active_point(&self, point: Option<GeoPoint>) {
        let mut state = self.inner.state.lock();
        state.point = point;
        self.inner.reevaluate(&mut state);
    }

    /// Apply a new search radius in meters.
    pub fn set_radius(&self, radius_meters: f64) {
        let mut state = self.inner.state.lock();
        state.radius_meters = Some(radius_meters);
        self.inner.reevaluate(&mut state);
    }

    /// Parameters of the live query, if any.
    pub fn current_params(&self) -> Option<QueryParameters> {
        self.inner.state.lock().params
    }

    /// Most recently published result.
    pub fn current_result(&self) -> RankedResult {
        self.inner.results_tx.borrow().clone()
    }

    /// Subscribe to published results.
    ///
    /// The receiver observes the current result on its first `changed()`
    /// call. Dropping it unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<RankedResult> {
        let mut rx = self.inner.results_tx.subscribe();
        rx.mark_changed();
        rx
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CoordinatorStats {
        let c = &self.inner.counters;
        CoordinatorStats {
            searches_started: c.searches_started.load(Ordering::Relaxed),
            results_published: c.results_published.load(Ordering::Relaxed),
            superseded: c.superseded.load(Ordering::Relaxed),
            failures: c.failures.load(Ordering::Relaxed),
            deduplicated: c.deduplicated.load(Ordering::Relaxed),
        }
    }

    /// Message of the most recent search failure.
    pub fn last_failure(&self) -> Option<String> {
        self.inner.state.lock().last_failure.clone()
    }

    /// Detach the live binding without publishing anything.
    ///
    /// Any search still running will have its result discarded.
    pub fn detach(&self) {
        let mut state = self.inner.state.lock();
        state.generation += 1;
        if let Some(handle) = state.binding.take() {
            handle.abort();
        }
    }

    /// Drive the coordinator from an active-point stream and a radius stream.
    ///
    /// The current value of each stream is applied first. The task ends when
    /// `shutdown` is cancelled or either sender is dropped, detaching the live
    /// binding on the way out.
    pub fn bind(
        &self,
        mut active_rx: watch::Receiver<Option<GeoPoint>>,
        mut radius_rx: watch::Receiver<f64>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let coordinator = self.clone();
        self.inner.runtime.spawn(async move {
            coordinator.set_radius(*radius_rx.borrow_and_update());
            coordinator.set_active_point(*active_rx.borrow_and_update());
            debug!("Query coordinator bound to inputs");

            loop {
                tokio::select! {
                    biased;

                    _ = shutdown.cancelled() => break,

                    changed = active_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let point = *active_rx.borrow_and_update();
                        coordinator.set_active_point(point);
                    }

                    changed = radius_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let radius = *radius_rx.borrow_and_update();
                        coordinator.set_radius(radius);
                    }
                }
            }

            coordinator.detach();
            debug!("Query coordinator unbound");
        })
    }
}

impl Inner {
    /// Recompute parameters after an input change.
    fn reevaluate(self: &Arc<Self>, state: &mut CoordinatorState) {
        let candidate = QueryParameters::from_parts(state.point, state.radius_meters);

        if candidate == state.params {
            self.counters.deduplicated.fetch_add(1, Ordering::Relaxed);
            trace!("Query parameters unchanged, skipping search");
            return;
        }

        if let Some(handle) = state.binding.take() {
            if !handle.is_finished() {
                handle.abort();
                self.counters.superseded.fetch_add(1, Ordering::Relaxed);
                debug!(generation = state.generation, "Superseded in-flight search");
            }
        }

        state.generation += 1;
        state.params = candidate;

        let Some(params) = candidate else {
            debug!("No active query, publishing empty result");
            self.publish(RankedResult::empty());
            return;
        };

        self.counters.searches_started.fetch_add(1, Ordering::Relaxed);
        debug!(
            generation = state.generation,
            params = %params,
            "Starting nearby search"
        );

        let generation = state.generation;
        let engine = self.engine.clone();
        let inner = Arc::clone(self);
        state.binding = Some(self.runtime.spawn(async move {
            let outcome = tokio::task::spawn_blocking(move || {
                engine.search(params.center, params.radius_meters)
            })
            .await;
            inner.complete(generation, params, outcome);
        }));
    }

    /// Publish a finished search if it is still the live one.
    fn complete(
        &self,
        generation: u64,
        params: QueryParameters,
        outcome: Result<Result<RankedResult, CatalogError>, JoinError>,
    ) {
        let mut state = self.state.lock();
        if state.generation != generation {
            trace!(
                generation,
                current = state.generation,
                "Discarding result of superseded search"
            );
            return;
        }
        state.binding = None;

        let failure = match outcome {
            Ok(Ok(result)) => {
                debug!(params = %params, results = result.len(), "Nearby search published");
                self.publish(result);
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(e) => format!("search task failed: {}", e),
        };

        self.counters.failures.fetch_add(1, Ordering::Relaxed);
        warn!(params = %params, error = %failure, "Nearby search failed, publishing empty result");
        state.last_failure = Some(failure);
        self.publish(RankedResult::empty());
    }

    /// Callers must hold the state lock.
    fn publish(&self, result: RankedResult) {
        self.results_tx.send_replace(result);
        self.counters.results_published.fetch_add(1, Ordering::Relaxed);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.state.get_mut().binding.take() {
            handle.abort();
        }
        debug!("Query coordinator dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Facility, InMemoryCatalog, ProximityIndex};
    use crate::geo::{destination_point, BoundingBox};
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::time::Duration;

    const A: GeoPoint = GeoPoint::new(1.3000, 103.8000);
    const B: GeoPoint = GeoPoint::new(1.3500, 103.8500);

    // ─────────────────────────────────────────────────────────────────────────
    // Test indexes
    // ─────────────────────────────────────────────────────────────────────────

    fn catalog_near(points: &[(&str, GeoPoint)]) -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        catalog.populate(points.iter().map(|(id, p)| {
            let at = destination_point(*p, 100.0, 0.0);
            Facility::new(*id, *id, at.latitude, at.longitude)
        }));
        catalog
    }

    /// Counts range queries and delegates to a catalog.
    struct CountingIndex {
        catalog: InMemoryCatalog,
        calls: AtomicUsize,
    }

    impl ProximityIndex for CountingIndex {
        fn find_by_id(&self, id: &str) -> Result<Option<Arc<Facility>>, CatalogError> {
            self.catalog.find_by_id(id)
        }

        fn find_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Arc<Facility>>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.catalog.find_in_bounding_box(bbox)
        }
    }

    /// Blocks the first range query until released.
    struct GatedIndex {
        catalog: InMemoryCatalog,
        gate: parking_lot::Mutex<Option<std::sync::mpsc::Receiver<()>>>,
        started: AtomicUsize,
        finished: AtomicUsize,
    }

    impl ProximityIndex for GatedIndex {
        fn find_by_id(&self, id: &str) -> Result<Option<Arc<Facility>>, CatalogError> {
            self.catalog.find_by_id(id)
        }

        fn find_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Arc<Facility>>, CatalogError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.lock().take();
            if let Some(gate) = gate {
                let _ = gate.recv();
            }
            let hits = self.catalog.find_in_bounding_box(bbox);
            self.finished.fetch_add(1, Ordering::SeqCst);
            hits
        }
    }

    /// Fails while `failing` is set.
    struct FlakyIndex {
        catalog: InMemoryCatalog,
        failing: AtomicBool,
    }

    impl ProximityIndex for FlakyIndex {
        fn find_by_id(&self, id: &str) -> Result<Option<Arc<Facility>>, CatalogError> {
            self.catalog.find_by_id(id)
        }

        fn find_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Arc<Facility>>, CatalogError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(CatalogError::Unavailable("store offline".into()));
            }
            self.catalog.find_in_bounding_box(bbox)
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("condition not reached within 5s");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dedup and publication
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_same_params_twice_runs_one_search() {
        let index = Arc::new(CountingIndex {
            catalog: catalog_near(&[("FA", A)]),
            calls: AtomicUsize::new(0),
        });
        let coordinator = ProximityQueryCoordinator::new(
            NearbySearchEngine::new(index.clone()),
            Handle::current(),
        );

        coordinator.set_radius(500.0);
        coordinator.set_active_point(Some(A));
        coordinator.set_active_point(Some(A));
        coordinator.set_radius(500.0);

        wait_until(|| coordinator.stats().results_published == 1).await;
        assert_eq!(index.calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.current_result().ids(), vec!["FA"]);

        let stats = coordinator.stats();
        assert_eq!(stats.searches_started, 1);
        assert!(stats.deduplicated >= 2);
    }

    #[tokio::test]
    async fn test_absent_point_publishes_empty_immediately() {
        let coordinator = ProximityQueryCoordinator::new(
            NearbySearchEngine::new(Arc::new(catalog_near(&[("FA", A)]))),
            Handle::current(),
        );
        coordinator.set_radius(500.0);
        coordinator.set_active_point(Some(A));
        wait_until(|| !coordinator.current_result().is_empty()).await;

        coordinator.set_active_point(None);
        assert!(coordinator.current_result().is_empty());
        assert_eq!(coordinator.current_params(), None);
    }

    #[tokio::test]
    async fn test_radius_change_requeries() {
        let coordinator = ProximityQueryCoordinator::new(
            NearbySearchEngine::new(Arc::new(catalog_near(&[("FA", A)]))),
            Handle::current(),
        );
        coordinator.set_active_point(Some(A));
        coordinator.set_radius(50.0);
        wait_until(|| coordinator.stats().results_published == 1).await;
        assert!(coordinator.current_result().is_empty());

        coordinator.set_radius(150.0);
        wait_until(|| coordinator.stats().results_published == 2).await;
        assert_eq!(coordinator.current_result().ids(), vec!["FA"]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rebinding
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_newer_params_win_over_slow_search() {
        let (release, gate) = std::sync::mpsc::channel();
        let index = Arc::new(GatedIndex {
            catalog: catalog_near(&[("FA", A), ("FB", B)]),
            gate: parking_lot::Mutex::new(Some(gate)),
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        });
        let coordinator = ProximityQueryCoordinator::new(
            NearbySearchEngine::new(index.clone()),
            Handle::current(),
        );

        coordinator.set_radius(500.0);
        coordinator.set_active_point(Some(A));
        wait_until(|| index.started.load(Ordering::SeqCst) == 1).await;

        coordinator.set_active_point(Some(B));
        wait_until(|| coordinator.stats().results_published == 1).await;
        assert_eq!(coordinator.current_result().ids(), vec!["FB"]);

        // Let the stale search finish; its result must never appear
        release.send(()).unwrap();
        wait_until(|| index.finished.load(Ordering::SeqCst) == 2).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(coordinator.current_result().ids(), vec!["FB"]);
        let stats = coordinator.stats();
        assert_eq!(stats.searches_started, 2);
        assert_eq!(stats.superseded, 1);
        assert_eq!(stats.results_published, 1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Failure handling
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_failure_publishes_empty_and_recovers() {
        let index = Arc::new(FlakyIndex {
            catalog: catalog_near(&[("FA", A), ("FB", B)]),
            failing: AtomicBool::new(false),
        });
        let coordinator = ProximityQueryCoordinator::new(
            NearbySearchEngine::new(index.clone()),
            Handle::current(),
        );

        coordinator.set_radius(500.0);
        coordinator.set_active_point(Some(A));
        wait_until(|| coordinator.stats().results_published == 1).await;
        assert_eq!(coordinator.current_result().ids(), vec!["FA"]);

        index.failing.store(true, Ordering::SeqCst);
        coordinator.set_active_point(Some(B));
        wait_until(|| coordinator.stats().results_published == 2).await;
        assert!(coordinator.current_result().is_empty());
        assert_eq!(coordinator.stats().failures, 1);
        assert!(coordinator
            .last_failure()
            .is_some_and(|msg| msg.contains("store offline")));

        index.failing.store(false, Ordering::SeqCst);
        coordinator.set_active_point(Some(A));
        wait_until(|| coordinator.stats().results_published == 3).await;
        assert_eq!(coordinator.current_result().ids(), vec!["FA"]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stream binding
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_bind_follows_input_streams() {
        let coordinator = ProximityQueryCoordinator::new(
            NearbySearchEngine::new(Arc::new(catalog_near(&[("FA", A), ("FB", B)]))),
            Handle::current(),
        );
        let (point_tx, point_rx) = watch::channel(None);
        let (radius_tx, radius_rx) = watch::channel(500.0);
        let shutdown = CancellationToken::new();
        let task = coordinator.bind(point_rx, radius_rx, shutdown.clone());

        let mut results = coordinator.subscribe();
        point_tx.send_replace(Some(A));
        wait_until(|| coordinator.current_result().ids() == vec!["FA"]).await;

        point_tx.send_replace(Some(B));
        wait_until(|| coordinator.current_result().ids() == vec!["FB"]).await;

        radius_tx.send_replace(10.0);
        wait_until(|| coordinator.current_result().is_empty()).await;
        assert!(results.has_changed().unwrap());

        shutdown.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_subscriber_receives_current_value() {
        let coordinator = ProximityQueryCoordinator::new(
            NearbySearchEngine::new(Arc::new(InMemoryCatalog::new())),
            Handle::current(),
        );
        let mut rx = coordinator.subscribe();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }
}
