//! Active location resolver.
//!
//! # State
//!
//! | device | override | active point |
//! |--------|----------|--------------|
//! | any    | `Some(s)`| `s`          |
//! | `Some(d)` | `None` | `d`         |
//! | `None` | `None`   | absent       |
//!
//! Every update is applied and published under one lock, so the most
//! recently applied update decides the active point regardless of which
//! input it came from.

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::geo::GeoPoint;

/// Default minimum device movement before a new device fix is accepted.
pub const DEFAULT_MIN_MOVEMENT_M: f64 = 10.0;

/// Configuration for [`ActiveLocationResolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Device fixes no farther than this from the last accepted fix are
    /// treated as GPS jitter and dropped.
    pub min_movement_m: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_movement_m: DEFAULT_MIN_MOVEMENT_M,
        }
    }
}

#[derive(Debug, Default)]
struct ResolverState {
    device: Option<GeoPoint>,
    search_override: Option<GeoPoint>,
}

impl ResolverState {
    fn active(&self) -> Option<GeoPoint> {
        self.search_override.or(self.device)
    }
}

/// Resolves the active reference point from device and override inputs.
pub struct ActiveLocationResolver {
    state: Mutex<ResolverState>,
    active_tx: watch::Sender<Option<GeoPoint>>,
    config: ResolverConfig,
}

impl ActiveLocationResolver {
    /// Create a resolver with no device location and no override.
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        let (active_tx, _) = watch::channel(None);
        Self {
            state: Mutex::new(ResolverState::default()),
            active_tx,
            config,
        }
    }

    /// Apply a device location fix.
    ///
    /// Returns `false` if the fix was dropped as jitter. An accepted fix only
    /// changes the active point while no override is set.
    pub fn on_device_location_changed(&self, location: GeoPoint) -> bool {
        let mut state = self.state.lock();

        if let Some(previous) = state.device {
            let moved = previous.distance_to(&location);
            if moved <= self.config.min_movement_m {
                trace!(
                    moved_m = moved,
                    min_movement_m = self.config.min_movement_m,
                    "Device fix within jitter threshold, ignored"
                );
                return false;
            }
        }

        state.device = Some(location);
        if state.search_override.is_some() {
            debug!(location = %location, "Device location stored, override active");
        }
        self.publish(&state);
        true
    }

    /// Forget the device location (fix lost or permission revoked).
    pub fn on_device_location_lost(&self) {
        let mut state = self.state.lock();
        if state.device.take().is_some() {
            debug!("Device location lost");
        }
        self.publish(&state);
    }

    /// Set or clear the searched-location override.
    ///
    /// `Some` takes effect immediately. `None` reverts to the latest device
    /// location, or to no active point if there is none.
    pub fn set_override(&self, location: Option<GeoPoint>) {
        let mut state = self.state.lock();
        state.search_override = location;
        match location {
            Some(point) => debug!(location = %point, "Search override set"),
            None => debug!(
                reverted_to = ?state.device.map(|p| p.to_string()),
                "Search override cleared"
            ),
        }
        self.publish(&state);
    }

    /// Current active point.
    pub fn active_point(&self) -> Option<GeoPoint> {
        self.state.lock().active()
    }

    /// Latest accepted device location.
    pub fn device_location(&self) -> Option<GeoPoint> {
        self.state.lock().device
    }

    /// Current override, if any.
    pub fn search_override(&self) -> Option<GeoPoint> {
        self.state.lock().search_override
    }

    /// Subscribe to the active point.
    ///
    /// The receiver observes the current value on its first `changed()`
    /// call, then every subsequent change. Dropping it unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Option<GeoPoint>> {
        let mut rx = self.active_tx.subscribe();
        rx.mark_changed();
        rx
    }

    /// Publish the active point if it differs from the last published one.
    fn publish(&self, state: &ResolverState) {
        let next = state.active();
        self.active_tx.send_if_modified(|current| {
            let unchanged = match (current.as_ref(), next.as_ref()) {
                (Some(a), Some(b)) => a.approx_eq(b),
                (None, None) => true,
                _ => false,
            };
            if unchanged {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

impl Default for ActiveLocationResolver {
    fn default() -> Self {
        Self::new()
    }
}
