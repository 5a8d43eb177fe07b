//! Nearby search.
//!
//! [`NearbySearchEngine`] runs the two-phase filter: a bounding-box range
//! query against the [`ProximityIndex`](crate::catalog::ProximityIndex),
//! then an exact haversine check and a deterministic sort.

mod engine;
mod result;

pub use engine::NearbySearchEngine;
pub use result::{RankedFacility, RankedResult};
