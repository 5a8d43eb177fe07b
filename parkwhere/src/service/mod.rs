//! High-level service facade for ParkWhere.
//!
//! This module wires the catalog, location resolver, query coordinator,
//! availability cache, refresh scheduler and preferences into one
//! [`ParkWhereService`] that a front end drives through a handful of
//! imperative calls and observes through `watch` streams.
//!
//! # Example
//!
//! ```ignore
//! use parkwhere::config::ConfigFile;
//! use parkwhere::geo::GeoPoint;
//! use parkwhere::service::ServiceBuilder;
//!
//! let config = ConfigFile::load()?;
//! let service = ServiceBuilder::from_config(&config)?.build()?;
//!
//! service.set_search_override(Some(GeoPoint::new(1.3000, 103.8000)));
//! service.start_periodic_refresh();
//!
//! let mut results = service.subscribe_results();
//! results.changed().await?;
//! for entry in service.nearby_entries(chrono::Utc::now()) {
//!     println!("{} {}", entry.facility.id, entry.availability);
//! }
//! ```

mod builder;
mod error;
mod facade;

pub use builder::ServiceBuilder;
pub use error::ServiceError;
pub use facade::ParkWhereService;
