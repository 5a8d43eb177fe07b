//! Grid cell coordinate type.
//!
//! A [`GridCell`] identifies a fixed-size latitude/longitude square used to
//! bucket facilities. The cell is the floor of each coordinate divided by
//! the cell size, so neighbouring cells share edges and every point belongs
//! to exactly one cell.

use std::fmt;

/// Default cell edge length in degrees (~1.1 km at the equator).
pub const DEFAULT_CELL_SIZE_DEG: f64 = 0.01;

/// A grid cell coordinate.
///
/// # Examples
///
/// ```
/// use parkwhere::catalog::GridCell;
///
/// let cell = GridCell::containing(1.3012, 103.8544, 0.01);
/// assert_eq!(cell, GridCell::new(130, 10385));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Row index (south edge = `lat * cell_size`).
    pub lat: i32,
    /// Column index (west edge = `lon * cell_size`).
    pub lon: i32,
}

impl GridCell {
    pub fn new(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }

    /// The cell containing a coordinate for the given cell size.
    pub fn containing(lat: f64, lon: f64, cell_size_deg: f64) -> Self {
        Self {
            lat: index_for(lat, cell_size_deg),
            lon: index_for(lon, cell_size_deg),
        }
    }
}

/// Row or column index of a coordinate.
#[inline]
pub(super) fn index_for(value: f64, cell_size_deg: f64) -> i32 {
    (value / cell_size_deg).floor() as i32
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}:{:+}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containing_positive() {
        let cell = GridCell::containing(1.3012, 103.8544, 0.01);
        assert_eq!(cell.lat, 130);
        assert_eq!(cell.lon, 10385);
    }

    #[test]
    fn test_containing_negative_floors_downward() {
        let cell = GridCell::containing(-33.865, -151.2093, 0.1);
        assert_eq!(cell.lat, -339);
        assert_eq!(cell.lon, -1513);
    }

    #[test]
    fn test_containing_one_degree_cells() {
        let cell = GridCell::containing(43.67, 7.23, 1.0);
        assert_eq!(cell, GridCell::new(43, 7));
    }

    #[test]
    fn test_display() {
        assert_eq!(GridCell::new(130, -5).to_string(), "+130:-5");
    }

    #[test]
    fn test_hash_consistency() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(GridCell::new(1, 2));
        set.insert(GridCell::new(1, 2));
        set.insert(GridCell::new(2, 1));
        assert_eq!(set.len(), 2);
    }
}
