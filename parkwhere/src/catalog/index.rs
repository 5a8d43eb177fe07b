//! Query interface over the facility catalog.

use std::sync::Arc;

use super::error::CatalogError;
use super::facility::Facility;
use crate::geo::BoundingBox;

/// Read-only catalog query interface.
///
/// Implementations may perform blocking I/O, so callers on an async runtime
/// should invoke these methods from a blocking-capable worker.
pub trait ProximityIndex: Send + Sync {
    /// Look up a single facility by id.
    fn find_by_id(&self, id: &str) -> Result<Option<Arc<Facility>>, CatalogError>;

    /// All facilities whose location lies inside the rectangle.
    ///
    /// The result is unordered. Because the rectangle is a superset of a
    /// circular search area, it may contain facilities outside that circle.
    fn find_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Arc<Facility>>, CatalogError>;
}

impl<T: ProximityIndex + ?Sized> ProximityIndex for Arc<T> {
    fn find_by_id(&self, id: &str) -> Result<Option<Arc<Facility>>, CatalogError> {
        (**self).find_by_id(id)
    }

    fn find_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Arc<Facility>>, CatalogError> {
        (**self).find_in_bounding_box(bbox)
    }
}
