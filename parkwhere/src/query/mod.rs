//! Query coordination.
//!
//! Turns the active point and the search radius into a single,
//! deduplicated stream of [`RankedResult`](crate::search::RankedResult)s.

mod coordinator;
mod params;

pub use coordinator::{CoordinatorStats, ProximityQueryCoordinator};
pub use params::QueryParameters;
