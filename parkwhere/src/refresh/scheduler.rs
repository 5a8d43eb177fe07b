//! Refresh scheduler daemon.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::availability::{AvailabilityCache, FeedClient, FeedError};

/// Default interval between periodic fetches (2 minutes).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Default minimum age of the last successful fetch before an on-demand
/// refresh proceeds (1 minute).
pub const DEFAULT_STALENESS_THRESHOLD: Duration = Duration::from_secs(60);

/// Default upper bound on a single fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`RefreshScheduler`].
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub interval: Duration,
    pub staleness_threshold: Duration,
    pub fetch_timeout: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            staleness_threshold: DEFAULT_STALENESS_THRESHOLD,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Counters for monitoring the scheduler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStats {
    /// Fetches that reached the feed client.
    pub fetches_started: u64,
    pub fetches_succeeded: u64,
    pub fetches_failed: u64,
    /// Triggers skipped because a fetch was already in flight.
    pub coalesced: u64,
}

/// Result of one fetch attempt.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Cache replaced with a snapshot of `records` facilities.
    Updated { records: usize },
    /// Fetch failed; the previous snapshot is still cached.
    Failed(FeedError),
    /// Another fetch was already in flight.
    Coalesced,
}

#[derive(Default)]
struct Counters {
    fetches_started: AtomicU64,
    fetches_succeeded: AtomicU64,
    fetches_failed: AtomicU64,
    coalesced: AtomicU64,
}

struct Shared<C> {
    client: C,
    cache: Arc<AvailabilityCache>,
    config: RefreshConfig,
    in_flight: AtomicBool,
    last_success: Mutex<Option<Instant>>,
    last_error: Mutex<Option<String>>,
    counters: Counters,
}

/// Clears the in-flight flag when a fetch ends, including on cancellation.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// In-flight claim taken before the fetch task is spawned. Dropping the
/// task, even unpolled, releases it.
struct ClaimedFetch<C>(Arc<Shared<C>>);

impl<C> Drop for ClaimedFetch<C> {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}

impl<C: FeedClient> Shared<C> {
    /// Set the in-flight flag. On failure the trigger is counted as coalesced.
    fn try_claim(&self) -> bool {
        let claimed = self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !claimed {
            self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
            trace!("Fetch already in flight, coalescing");
        }
        claimed
    }

    async fn perform_fetch(&self) -> FetchOutcome {
        if !self.try_claim() {
            return FetchOutcome::Coalesced;
        }
        let _guard = InFlightGuard(&self.in_flight);
        self.fetch_claimed().await
    }

    /// Caller must hold the in-flight claim.
    async fn fetch_claimed(&self) -> FetchOutcome {
        self.counters.fetches_started.fetch_add(1, Ordering::Relaxed);
        let result = match tokio::time::timeout(self.config.fetch_timeout, self.client.fetch()).await
        {
            Ok(result) => result,
            Err(_) => Err(FeedError::Timeout(self.config.fetch_timeout)),
        };

        match result {
            Ok(snapshot) => {
                let records = snapshot.len();
                self.cache.replace(snapshot);
                *self.last_success.lock() = Some(Instant::now());
                self.counters.fetches_succeeded.fetch_add(1, Ordering::Relaxed);
                debug!(records, "Availability refreshed");
                FetchOutcome::Updated { records }
            }
            Err(e) => {
                self.counters.fetches_failed.fetch_add(1, Ordering::Relaxed);
                *self.last_error.lock() = Some(e.to_string());
                warn!(error = %e, "Availability fetch failed, keeping previous snapshot");
                FetchOutcome::Failed(e)
            }
        }
    }

    fn is_stale(&self) -> bool {
        match *self.last_success.lock() {
            Some(at) => at.elapsed() > self.config.staleness_threshold,
            None => true,
        }
    }
}

/// Periodic and on-demand refresh of the availability cache.
pub struct RefreshScheduler<C: FeedClient> {
    shared: Arc<Shared<C>>,
    periodic: Mutex<Option<CancellationToken>>,
    runtime: Handle,
}

impl<C: FeedClient> RefreshScheduler<C> {
    /// Create a scheduler with default timings.
    pub fn new(client: C, cache: Arc<AvailabilityCache>, runtime: Handle) -> Self {
        Self::with_config(client, cache, RefreshConfig::default(), runtime)
    }

    pub fn with_config(
        client: C,
        cache: Arc<AvailabilityCache>,
        config: RefreshConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                client,
                cache,
                config,
                in_flight: AtomicBool::new(false),
                last_success: Mutex::new(None),
                last_error: Mutex::new(None),
                counters: Counters::default(),
            }),
            periodic: Mutex::new(None),
            runtime,
        }
    }

    /// Enter periodic mode: fetch now, then every interval.
    ///
    /// Returns `false` if periodic mode was already active.
    pub fn start(&self) -> bool {
        let mut periodic = self.periodic.lock();
        if periodic.is_some() {
            trace!("Periodic refresh already active");
            return false;
        }

        let token = CancellationToken::new();
        *periodic = Some(token.clone());

        let shared = Arc::clone(&self.shared);
        info!(
            interval_secs = shared.config.interval.as_secs(),
            "Periodic availability refresh started"
        );
        self.runtime.spawn(run_periodic(shared, token));
        true
    }

    /// Leave periodic mode.
    ///
    /// Pending periodic fetches are cancelled; a fetch already in flight
    /// completes and still updates the cache. Returns `false` if periodic
    /// mode was not active.
    pub fn stop(&self) -> bool {
        match self.periodic.lock().take() {
            Some(token) => {
                token.cancel();
                info!("Periodic availability refresh stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.periodic.lock().is_some()
    }

    /// Fetch once if the last successful fetch is older than the staleness
    /// threshold (or there has been none).
    ///
    /// Returns the handle of the spawned fetch, or `None` if the cache is
    /// fresh enough. While another fetch is in flight the handle resolves to
    /// [`FetchOutcome::Coalesced`].
    pub fn refresh_if_stale(&self) -> Option<JoinHandle<FetchOutcome>> {
        if !self.shared.is_stale() {
            debug!(
                since_last_success_secs = ?self.since_last_success().map(|d| d.as_secs()),
                "Availability fresh, skipping on-demand refresh"
            );
            return None;
        }

        // Claimed here rather than in the task, so a second call made before
        // the task runs sees the fetch as in flight
        if !self.shared.try_claim() {
            return Some(self.runtime.spawn(async { FetchOutcome::Coalesced }));
        }

        let claim = ClaimedFetch(Arc::clone(&self.shared));
        if !claim.0.is_stale() {
            // A fetch finished between the two checks
            return None;
        }
        Some(self.runtime.spawn(async move { claim.0.fetch_claimed().await }))
    }

    /// Fetch once now, regardless of staleness.
    pub async fn perform_fetch(&self) -> FetchOutcome {
        self.shared.perform_fetch().await
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> RefreshStats {
        let c = &self.shared.counters;
        RefreshStats {
            fetches_started: c.fetches_started.load(Ordering::Relaxed),
            fetches_succeeded: c.fetches_succeeded.load(Ordering::Relaxed),
            fetches_failed: c.fetches_failed.load(Ordering::Relaxed),
            coalesced: c.coalesced.load(Ordering::Relaxed),
        }
    }

    /// Message of the most recent failed fetch.
    pub fn last_error(&self) -> Option<String> {
        self.shared.last_error.lock().clone()
    }

    /// Time elapsed since the last successful fetch.
    pub fn since_last_success(&self) -> Option<Duration> {
        self.shared.last_success.lock().map(|at| at.elapsed())
    }

    pub fn cache(&self) -> &Arc<AvailabilityCache> {
        &self.shared.cache
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.shared.config
    }
}

impl<C: FeedClient> Drop for RefreshScheduler<C> {
    fn drop(&mut self) {
        if let Some(token) = self.periodic.get_mut().take() {
            token.cancel();
        }
    }
}

async fn run_periodic<C: FeedClient>(shared: Arc<Shared<C>>, token: CancellationToken) {
    let mut interval = tokio::time::interval(shared.config.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // The first tick completes immediately
        tokio::select! {
            biased;

            _ = token.cancelled() => break,

            _ = interval.tick() => {}
        }

        // Not raced against the token: stopping lets an in-flight fetch finish
        shared.perform_fetch().await;
    }

    debug!("Periodic refresh loop exited");
}
