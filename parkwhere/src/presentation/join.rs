//! Result and availability join.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::view::AvailabilityView;
use crate::availability::AvailabilitySnapshot;
use crate::catalog::Facility;
use crate::preferences::VehicleFilter;
use crate::search::RankedResult;

/// One row of the nearby list.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyEntry {
    pub facility: Arc<Facility>,
    pub distance_meters: f64,
    pub bookmarked: bool,
    pub availability: AvailabilityView,
}

/// Attach availability and bookmark state to every ranked facility.
///
/// Order is preserved. Facilities missing from the snapshot get a
/// [`NoData`](super::AvailabilityNotice::NoData) view.
pub fn join_availability(
    result: &RankedResult,
    snapshot: &AvailabilitySnapshot,
    filter: VehicleFilter,
    bookmarks: &BTreeSet<String>,
    now: DateTime<Utc>,
) -> Vec<NearbyEntry> {
    result
        .iter()
        .map(|ranked| NearbyEntry {
            facility: Arc::clone(&ranked.facility),
            distance_meters: ranked.distance_meters,
            bookmarked: bookmarks.contains(&ranked.facility.id),
            availability: AvailabilityView::build(snapshot.get(&ranked.facility.id), filter, now),
        })
        .collect()
}
