//! Geographic type definitions

use std::fmt;

use thiserror::Error;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Tolerance (degrees) under which two coordinates are treated as the same place.
///
/// 1e-9° is roughly 0.1 mm on the ground, well below GPS resolution.
pub const COORD_EPSILON: f64 = 1e-9;

/// Errors for invalid geographic input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
    #[error("Invalid radius: {0} (must be a finite, non-negative number of meters)")]
    InvalidRadius(f64),
}

/// A point on the Earth's surface in decimal degrees.
///
/// Carries no ownership and is always copied by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point without validation.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a point, rejecting out-of-range or non-finite coordinates.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// True if both coordinates are within [`COORD_EPSILON`] of `other`.
    pub fn approx_eq(&self, other: &GeoPoint) -> bool {
        (self.latitude - other.latitude).abs() <= COORD_EPSILON
            && (self.longitude - other.longitude).abs() <= COORD_EPSILON
    }

    /// Great-circle distance to `other` in meters.
    #[inline]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        super::haversine_distance_meters(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Axis-aligned latitude/longitude rectangle.
///
/// When `min_lon > max_lon` the box wraps across the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// True if the longitude range wraps across ±180°.
    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }

    /// Check whether a point lies inside the box (edges inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        if point.latitude < self.min_lat || point.latitude > self.max_lat {
            return false;
        }
        if self.crosses_antimeridian() {
            point.longitude >= self.min_lon || point.longitude <= self.max_lon
        } else {
            point.longitude >= self.min_lon && point.longitude <= self.max_lon
        }
    }

    /// Split into at most two non-wrapping longitude ranges `(min_lon, max_lon)`.
    pub fn lon_ranges(&self) -> Vec<(f64, f64)> {
        if self.crosses_antimeridian() {
            vec![(self.min_lon, MAX_LON), (MIN_LON, self.max_lon)]
        } else {
            vec![(self.min_lon, self.max_lon)]
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}..{:.6}, {:.6}..{:.6}]",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }
}
