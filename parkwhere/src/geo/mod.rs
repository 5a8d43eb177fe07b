//! Geographic math
//!
//! Pure functions for great-circle distance and for the rectangular
//! pre-filter used by nearby searches. All angles are decimal degrees and
//! all distances are meters.

mod types;

pub use types::{
    BoundingBox, GeoError, GeoPoint, COORD_EPSILON, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

/// Mean Earth radius used by every distance calculation, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates using the haversine formula.
#[inline]
pub fn haversine_distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Point reached by travelling `distance_m` from `origin` along an initial
/// great-circle bearing (degrees clockwise from north).
///
/// The returned longitude is normalized to [-180, 180).
pub fn destination_point(origin: GeoPoint, distance_m: f64, bearing_deg: f64) -> GeoPoint {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.latitude.to_radians();
    let lambda1 = origin.longitude.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    GeoPoint::new(phi2.to_degrees(), normalize_longitude(lambda2.to_degrees()))
}

/// Rectangle whose four edge midpoints lie exactly `radius_m` from `center`
/// along the cardinal bearings.
///
/// The corners lie farther than `radius_m` from the center, so the box is only
/// a pre-filter: callers must still apply an exact distance check. If the
/// circle reaches a pole the longitude range spans the whole globe.
pub fn bounding_box(center: GeoPoint, radius_m: f64) -> BoundingBox {
    // Due north/south the great circle is a meridian, so the latitude offset is exact.
    let delta_deg = (radius_m / EARTH_RADIUS_M).to_degrees();
    let max_lat = center.latitude + delta_deg;
    let min_lat = center.latitude - delta_deg;

    if max_lat >= MAX_LAT || min_lat <= MIN_LAT {
        return BoundingBox::new(
            min_lat.max(MIN_LAT),
            max_lat.min(MAX_LAT),
            MIN_LON,
            MAX_LON,
        );
    }

    // Longitude offset of the point reached along the 90° bearing; the 270°
    // point mirrors it. Applied to the center longitude directly so a zero
    // radius yields the center exactly.
    let delta = radius_m / EARTH_RADIUS_M;
    let phi1 = center.latitude.to_radians();
    let sin_phi2 = phi1.sin() * delta.cos();
    let delta_lon = (delta.sin() * phi1.cos())
        .atan2(delta.cos() - phi1.sin() * sin_phi2)
        .to_degrees();

    BoundingBox::new(
        min_lat,
        max_lat,
        normalize_longitude(center.longitude - delta_lon),
        normalize_longitude(center.longitude + delta_lon),
    )
}

/// Wrap a longitude into [-180, 180).
#[inline]
pub fn normalize_longitude(lon: f64) -> f64 {
    if (MIN_LON..MAX_LON).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= MAX_LON {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests;
