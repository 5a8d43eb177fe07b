//! JSON catalog loader.
//!
//! The bundled dataset is a JSON array of facility records. Records with
//! coordinates outside the valid range are skipped with a warning so one bad
//! row does not prevent the rest of the catalog from loading.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::error::CatalogError;
use super::facility::Facility;
use super::memory::InMemoryCatalog;
use crate::geo::GeoPoint;

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<InMemoryCatalog, CatalogError> {
    let bytes = fs::read(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = parse_catalog(&bytes)?;
    info!(
        path = %path.display(),
        facilities = catalog.len(),
        "Facility catalog loaded"
    );
    Ok(catalog)
}

/// Parse catalog JSON already held in memory.
pub fn parse_catalog(bytes: &[u8]) -> Result<InMemoryCatalog, CatalogError> {
    let records: Vec<Facility> =
        serde_json::from_slice(bytes).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let mut seen = std::collections::HashSet::with_capacity(records.len());
    let mut accepted = Vec::with_capacity(records.len());

    for record in records {
        if GeoPoint::try_new(record.latitude, record.longitude).is_err() {
            warn!(
                id = %record.id,
                latitude = record.latitude,
                longitude = record.longitude,
                "Skipping facility with invalid coordinates"
            );
            continue;
        }
        if !seen.insert(record.id.clone()) {
            warn!(id = %record.id, "Duplicate facility id, later record wins");
        }
        accepted.push(record);
    }

    let catalog = InMemoryCatalog::new();
    catalog.populate(accepted);
    Ok(catalog)
}
