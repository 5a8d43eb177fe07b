//! In-memory catalog bucketed by grid cell.
//!
//! # Thread Safety
//!
//! - Store-level access protected by `RwLock` (rare writes on populate)
//! - Id and cell maps are `DashMap`s (concurrent reads, per-shard write locks)
//!
//! `populate()` builds the new maps outside the lock and swaps them in, so
//! readers see either the old catalog or the new one, never a mix.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use super::error::CatalogError;
use super::facility::Facility;
use super::grid::{index_for, GridCell, DEFAULT_CELL_SIZE_DEG};
use super::index::ProximityIndex;
use crate::geo::BoundingBox;

struct CatalogStore {
    by_id: DashMap<String, Arc<Facility>>,
    cells: DashMap<GridCell, Vec<Arc<Facility>>>,
}

impl CatalogStore {
    fn empty() -> Self {
        Self {
            by_id: DashMap::new(),
            cells: DashMap::new(),
        }
    }
}

/// Facility catalog held entirely in memory.
pub struct InMemoryCatalog {
    store: RwLock<Arc<CatalogStore>>,
    cell_size_deg: f64,
}

impl InMemoryCatalog {
    /// Create an empty catalog with the default cell size.
    pub fn new() -> Self {
        Self::with_cell_size(DEFAULT_CELL_SIZE_DEG)
    }

    /// Create an empty catalog with a custom cell size in degrees.
    ///
    /// Non-positive sizes fall back to [`DEFAULT_CELL_SIZE_DEG`].
    pub fn with_cell_size(cell_size_deg: f64) -> Self {
        let cell_size_deg = if cell_size_deg.is_finite() && cell_size_deg > 0.0 {
            cell_size_deg
        } else {
            DEFAULT_CELL_SIZE_DEG
        };
        Self {
            store: RwLock::new(Arc::new(CatalogStore::empty())),
            cell_size_deg,
        }
    }

    /// Cell edge length in degrees.
    pub fn cell_size_deg(&self) -> f64 {
        self.cell_size_deg
    }

    /// Atomically replace the whole catalog.
    ///
    /// When two records share an id, the later one wins.
    pub fn populate(&self, facilities: impl IntoIterator<Item = Facility>) {
        let new_store = CatalogStore::empty();
        for facility in facilities {
            Self::insert_into(&new_store, Arc::new(facility), self.cell_size_deg);
        }

        let count = new_store.by_id.len();
        *self.store.write() = Arc::new(new_store);
        tracing::debug!(facilities = count, "Catalog populated");
    }

    /// Insert or replace a single facility.
    pub fn insert(&self, facility: Facility) {
        let store = self.current();
        Self::insert_into(&store, Arc::new(facility), self.cell_size_deg);
    }

    /// Number of facilities.
    pub fn len(&self) -> usize {
        self.current().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every facility, sorted by id.
    pub fn find_all(&self) -> Vec<Arc<Facility>> {
        let mut all: Vec<_> = self
            .current()
            .by_id
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    fn current(&self) -> Arc<CatalogStore> {
        Arc::clone(&self.store.read())
    }

    fn insert_into(store: &CatalogStore, facility: Arc<Facility>, cell_size_deg: f64) {
        if let Some(previous) = store.by_id.insert(facility.id.clone(), Arc::clone(&facility)) {
            let old_cell =
                GridCell::containing(previous.latitude, previous.longitude, cell_size_deg);
            if let Some(mut bucket) = store.cells.get_mut(&old_cell) {
                bucket.retain(|f| f.id != previous.id);
            }
        }

        let cell = GridCell::containing(facility.latitude, facility.longitude, cell_size_deg);
        store.cells.entry(cell).or_default().push(facility);
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProximityIndex for InMemoryCatalog {
    fn find_by_id(&self, id: &str) -> Result<Option<Arc<Facility>>, CatalogError> {
        Ok(self
            .current()
            .by_id
            .get(id)
            .map(|entry| Arc::clone(entry.value())))
    }

    fn find_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Arc<Facility>>, CatalogError> {
        let store = self.current();
        let size = self.cell_size_deg;

        let lat_lo = index_for(bbox.min_lat, size);
        let lat_hi = index_for(bbox.max_lat, size);
        let lon_ranges: Vec<(i32, i32)> = bbox
            .lon_ranges()
            .into_iter()
            .map(|(lo, hi)| (index_for(lo, size), index_for(hi, size)))
            .collect();

        let cells_to_visit: i64 = lon_ranges
            .iter()
            .map(|(lo, hi)| (*hi as i64 - *lo as i64 + 1) * (lat_hi as i64 - lat_lo as i64 + 1))
            .sum();

        let mut hits = Vec::new();
        let mut collect = |bucket: &Vec<Arc<Facility>>| {
            hits.extend(
                bucket
                    .iter()
                    .filter(|f| bbox.contains(&f.location()))
                    .cloned(),
            );
        };

        // Large rectangles touch more cells than exist; scan the populated ones instead
        if cells_to_visit > store.cells.len() as i64 {
            for entry in store.cells.iter() {
                collect(entry.value());
            }
        } else {
            for lat in lat_lo..=lat_hi {
                for (lon_lo, lon_hi) in &lon_ranges {
                    for lon in *lon_lo..=*lon_hi {
                        if let Some(bucket) = store.cells.get(&GridCell::new(lat, lon)) {
                            collect(bucket.value());
                        }
                    }
                }
            }
        }

        tracing::trace!(
            bbox = %bbox,
            cells_to_visit,
            hits = hits.len(),
            "Catalog range query"
        );
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{bounding_box, GeoPoint};

    fn ids(mut facilities: Vec<Arc<Facility>>) -> Vec<String> {
        facilities.sort_by(|a, b| a.id.cmp(&b.id));
        facilities.iter().map(|f| f.id.clone()).collect()
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.find_by_id("A").unwrap().is_none());
        let bbox = BoundingBox::new(-90.0, 90.0, -180.0, 180.0);
        assert!(catalog.find_in_bounding_box(&bbox).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_id() {
        let catalog = InMemoryCatalog::new();
        catalog.populate(vec![
            Facility::new("A", "Alpha", 1.30, 103.80),
            Facility::new("B", "Bravo", 1.31, 103.81),
        ]);

        let found = catalog.find_by_id("B").unwrap().unwrap();
        assert_eq!(found.address, "Bravo");
        assert!(catalog.find_by_id("Z").unwrap().is_none());
    }

    #[test]
    fn test_range_query_spans_multiple_cells() {
        let catalog = InMemoryCatalog::new();
        catalog.populate(vec![
            Facility::new("IN1", "", 1.2995, 103.7995),
            Facility::new("IN2", "", 1.3005, 103.8005),
            Facility::new("OUT", "", 1.3200, 103.8000),
        ]);

        let bbox = BoundingBox::new(1.299, 1.301, 103.799, 103.801);
        let hits = catalog.find_in_bounding_box(&bbox).unwrap();
        assert_eq!(ids(hits), vec!["IN1", "IN2"]);
    }

    #[test]
    fn test_range_query_edges_inclusive() {
        let catalog = InMemoryCatalog::new();
        catalog.populate(vec![Facility::new("EDGE", "", 1.30, 103.80)]);

        let bbox = BoundingBox::new(1.30, 1.31, 103.80, 103.81);
        assert_eq!(catalog.find_in_bounding_box(&bbox).unwrap().len(), 1);
    }

    #[test]
    fn test_range_query_across_antimeridian() {
        let catalog = InMemoryCatalog::new();
        catalog.populate(vec![
            Facility::new("EAST", "", 0.0, 179.998),
            Facility::new("WEST", "", 0.0, -179.998),
            Facility::new("FAR", "", 0.0, 0.0),
        ]);

        let bbox = bounding_box(GeoPoint::new(0.0, 179.999), 1000.0);
        let hits = catalog.find_in_bounding_box(&bbox).unwrap();
        assert_eq!(ids(hits), vec!["EAST", "WEST"]);
    }

    #[test]
    fn test_huge_box_scans_populated_cells() {
        let catalog = InMemoryCatalog::new();
        catalog.populate(vec![
            Facility::new("SG", "", 1.3, 103.8),
            Facility::new("AU", "", -33.87, 151.21),
        ]);

        let bbox = BoundingBox::new(-90.0, 90.0, -180.0, 180.0);
        let hits = catalog.find_in_bounding_box(&bbox).unwrap();
        assert_eq!(ids(hits), vec!["AU", "SG"]);
    }

    #[test]
    fn test_populate_replaces_previous_contents() {
        let catalog = InMemoryCatalog::new();
        catalog.populate(vec![Facility::new("OLD", "", 1.3, 103.8)]);
        catalog.populate(vec![Facility::new("NEW", "", 1.3, 103.8)]);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.find_by_id("OLD").unwrap().is_none());
        assert!(catalog.find_by_id("NEW").unwrap().is_some());
    }

    #[test]
    fn test_duplicate_id_later_wins_and_moves_cell() {
        let catalog = InMemoryCatalog::new();
        catalog.populate(vec![
            Facility::new("A", "first", 1.30, 103.80),
            Facility::new("A", "second", 1.40, 103.90),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find_by_id("A").unwrap().unwrap().address, "second");

        let old_area = bounding_box(GeoPoint::new(1.30, 103.80), 100.0);
        assert!(catalog.find_in_bounding_box(&old_area).unwrap().is_empty());
    }

    #[test]
    fn test_insert_single_facility() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(Facility::new("A", "", 1.3, 103.8));
        catalog.insert(Facility::new("B", "", 1.3, 103.8));
        assert_eq!(catalog.len(), 2);

        let all = catalog.find_all();
        assert_eq!(all[0].id, "A");
        assert_eq!(all[1].id, "B");
    }

    #[test]
    fn test_invalid_cell_size_falls_back() {
        let catalog = InMemoryCatalog::with_cell_size(0.0);
        assert_eq!(catalog.cell_size_deg(), DEFAULT_CELL_SIZE_DEG);
    }
}
