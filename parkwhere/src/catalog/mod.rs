//! Static facility catalog.
//!
//! The catalog is the read-only set of car parks that nearby searches run
//! against. Consumers only see the [`ProximityIndex`] trait: point lookup by
//! id and a rectangular range query. [`InMemoryCatalog`] is the bundled
//! implementation, bucketing facilities into fixed-size [`GridCell`]s so a
//! range query only visits the cells the rectangle overlaps.
//!
//! # Usage
//!
//! ```
//! use parkwhere::catalog::{Facility, InMemoryCatalog, ProximityIndex};
//! use parkwhere::geo::{bounding_box, GeoPoint};
//!
//! let catalog = InMemoryCatalog::new();
//! catalog.populate(vec![Facility::new("ACB", "BLK 270/271 ALBERT CENTRE", 1.3012, 103.8544)]);
//!
//! let bbox = bounding_box(GeoPoint::new(1.3012, 103.8544), 200.0);
//! let hits = catalog.find_in_bounding_box(&bbox).unwrap();
//! assert_eq!(hits.len(), 1);
//! ```

mod error;
mod facility;
mod grid;
mod index;
mod loader;
mod memory;

pub use error::CatalogError;
pub use facility::Facility;
pub use grid::{GridCell, DEFAULT_CELL_SIZE_DEG};
pub use index::ProximityIndex;
pub use loader::{load_catalog, parse_catalog};
pub use memory::InMemoryCatalog;
