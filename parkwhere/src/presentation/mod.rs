//! Presentation boundary.
//!
//! Joins a [`RankedResult`](crate::search::RankedResult) with the current
//! [`AvailabilitySnapshot`](crate::availability::AvailabilitySnapshot) by
//! facility id. The search engine itself never sees availability data.

mod join;
mod view;

pub use join::{join_availability, NearbyEntry};
pub use view::{format_distance, AvailabilityNotice, AvailabilityView};
