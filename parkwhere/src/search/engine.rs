//! Two-phase proximity search.

use std::sync::Arc;

use tracing::trace;

use super::result::{RankedFacility, RankedResult};
use crate::catalog::{CatalogError, ProximityIndex};
use crate::geo::{bounding_box, GeoPoint};

/// Exact circular-radius search over a [`ProximityIndex`].
///
/// `search` may block on index I/O. Async callers should run it on a
/// blocking-capable worker (see [`ProximityQueryCoordinator`]).
///
/// [`ProximityQueryCoordinator`]: crate::query::ProximityQueryCoordinator
#[derive(Clone)]
pub struct NearbySearchEngine {
    index: Arc<dyn ProximityIndex>,
}

impl NearbySearchEngine {
    pub fn new(index: Arc<dyn ProximityIndex>) -> Self {
        Self { index }
    }

    /// The index this engine queries.
    pub fn index(&self) -> &Arc<dyn ProximityIndex> {
        &self.index
    }

    /// Facilities within `radius_meters` of `center`, nearest first.
    ///
    /// A facility exactly `radius_meters` away is included. A negative or
    /// non-finite radius matches nothing. Index errors are returned to the
    /// caller; an index with no candidates yields an empty result.
    pub fn search(&self, center: GeoPoint, radius_meters: f64) -> Result<RankedResult, CatalogError> {
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Ok(RankedResult::empty());
        }

        let bbox = bounding_box(center, radius_meters);
        let candidates = self.index.find_in_bounding_box(&bbox)?;
        let candidate_count = candidates.len();

        let retained: Vec<RankedFacility> = candidates
            .into_iter()
            .filter_map(|facility| {
                let distance_meters = center.distance_to(&facility.location());
                (distance_meters <= radius_meters).then_some(RankedFacility {
                    facility,
                    distance_meters,
                })
            })
            .collect();

        trace!(
            center = %center,
            radius_meters,
            candidates = candidate_count,
            retained = retained.len(),
            "Nearby search complete"
        );

        Ok(RankedResult::from_unsorted(retained))
    }
}

impl std::fmt::Debug for NearbySearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearbySearchEngine").finish_non_exhaustive()
    }
}
