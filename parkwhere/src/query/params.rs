//! Query parameters.

use std::fmt;

use crate::geo::GeoPoint;

/// Center and radius of one nearby search.
///
/// Two parameter sets are equal when their centers match within
/// [`COORD_EPSILON`](crate::geo::COORD_EPSILON) and their radii are
/// identical. The coordinator relies on this equality to skip redundant
/// searches.
#[derive(Debug, Clone, Copy)]
pub struct QueryParameters {
    pub center: GeoPoint,
    pub radius_meters: f64,
}

impl QueryParameters {
    pub const fn new(center: GeoPoint, radius_meters: f64) -> Self {
        Self {
            center,
            radius_meters,
        }
    }

    /// Combine optional components; absent if either is absent.
    pub fn from_parts(center: Option<GeoPoint>, radius_meters: Option<f64>) -> Option<Self> {
        Some(Self::new(center?, radius_meters?))
    }
}

impl PartialEq for QueryParameters {
    fn eq(&self, other: &Self) -> bool {
        self.center.approx_eq(&other.center) && self.radius_meters == other.radius_meters
    }
}

impl fmt::Display for QueryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} r={}m", self.center, self.radius_meters)
    }
}
