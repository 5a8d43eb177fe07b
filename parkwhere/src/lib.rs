//! ParkWhere - nearby car park search with live availability
//!
//! This library finds car parks around a reference point, keeps the result
//! list current as the point or search radius changes, and joins it with a
//! periodically refreshed lot-availability feed.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use parkwhere::config::ConfigFile;
//! use parkwhere::geo::GeoPoint;
//! use parkwhere::service::ServiceBuilder;
//!
//! let service = ServiceBuilder::from_config(&ConfigFile::load()?)?.build()?;
//! service.device_location_changed(GeoPoint::new(1.3000, 103.8000));
//! service.refresh_if_stale();
//! ```

pub mod availability;
pub mod catalog;
pub mod config;
pub mod geo;
pub mod location;
pub mod logging;
pub mod preferences;
pub mod presentation;
pub mod query;
pub mod refresh;
pub mod search;
pub mod service;

/// Version of the ParkWhere library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
