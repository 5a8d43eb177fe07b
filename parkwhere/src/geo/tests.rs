//! Tests for geographic math

use super::*;

/// Length of one degree of latitude on the reference sphere.
const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

#[test]
fn test_distance_to_self_is_zero() {
    assert_eq!(haversine_distance_meters(1.3, 103.8, 1.3, 103.8), 0.0);
    assert_eq!(haversine_distance_meters(-33.9, 151.2, -33.9, 151.2), 0.0);
}

#[test]
fn test_distance_is_symmetric() {
    let pairs = [
        ((1.3000, 103.8000), (1.3521, 103.8198)),
        ((51.5074, -0.1278), (48.8566, 2.3522)),
        ((-33.8688, 151.2093), (35.6762, 139.6503)),
        ((0.0, 179.9), (0.0, -179.9)),
    ];

    for ((lat1, lon1), (lat2, lon2)) in pairs {
        let ab = haversine_distance_meters(lat1, lon1, lat2, lon2);
        let ba = haversine_distance_meters(lat2, lon2, lat1, lon1);
        assert!(
            (ab - ba).abs() < 1e-6,
            "distance should be symmetric: {} vs {}",
            ab,
            ba
        );
    }
}

#[test]
fn test_one_degree_of_latitude() {
    let d = haversine_distance_meters(0.0, 0.0, 1.0, 0.0);
    assert!((d - METERS_PER_DEGREE).abs() < 1e-6);
    assert!((d - 111_194.93).abs() < 0.01);
}

#[test]
fn test_distance_across_antimeridian() {
    // 0.2° of longitude at the equator, not 359.8°
    let d = haversine_distance_meters(0.0, 179.9, 0.0, -179.9);
    assert!((d - 0.2 * METERS_PER_DEGREE).abs() < 1e-3);
}

#[test]
fn test_london_to_paris() {
    let d = haversine_distance_meters(51.5074, -0.1278, 48.8566, 2.3522);
    assert!((d - 343_556.0).abs() < 500.0, "got {}", d);
}

#[test]
fn test_geo_point_distance_to_matches_free_function() {
    let a = GeoPoint::new(1.3, 103.8);
    let b = GeoPoint::new(1.31, 103.81);
    assert_eq!(
        a.distance_to(&b),
        haversine_distance_meters(1.3, 103.8, 1.31, 103.81)
    );
}

#[test]
fn test_try_new_rejects_out_of_range() {
    assert!(GeoPoint::try_new(1.3, 103.8).is_ok());
    assert_eq!(
        GeoPoint::try_new(91.0, 0.0),
        Err(GeoError::InvalidLatitude(91.0))
    );
    assert_eq!(
        GeoPoint::try_new(0.0, -180.5),
        Err(GeoError::InvalidLongitude(-180.5))
    );
    assert!(GeoPoint::try_new(f64::NAN, 0.0).is_err());
}

#[test]
fn test_approx_eq_tolerance() {
    let a = GeoPoint::new(1.3, 103.8);
    assert!(a.approx_eq(&GeoPoint::new(1.3 + 1e-10, 103.8 - 1e-10)));
    assert!(!a.approx_eq(&GeoPoint::new(1.3 + 1e-6, 103.8)));
}

#[test]
fn test_destination_point_north_moves_latitude_only() {
    let origin = GeoPoint::new(1.3, 103.8);
    let dest = destination_point(origin, 1000.0, 0.0);
    assert!((dest.longitude - 103.8).abs() < 1e-12);
    assert!((dest.latitude - (1.3 + 1000.0 / METERS_PER_DEGREE)).abs() < 1e-9);
}

#[test]
fn test_destination_point_distance_matches() {
    let origin = GeoPoint::new(45.0, 7.0);
    for bearing in [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0] {
        let dest = destination_point(origin, 2500.0, bearing);
        let d = origin.distance_to(&dest);
        assert!(
            (d - 2500.0).abs() < 1e-3,
            "bearing {} gave distance {}",
            bearing,
            d
        );
    }
}

#[test]
fn test_bounding_box_edge_midpoints_at_radius() {
    let center = GeoPoint::new(1.3, 103.8);
    let radius = 500.0;
    let bbox = bounding_box(center, radius);

    let north = GeoPoint::new(bbox.max_lat, center.longitude);
    let south = GeoPoint::new(bbox.min_lat, center.longitude);
    assert!((center.distance_to(&north) - radius).abs() < 1e-3);
    assert!((center.distance_to(&south) - radius).abs() < 1e-3);

    // East/west edges are reached along the 90°/270° great circles
    let east = destination_point(center, radius, 90.0);
    let west = destination_point(center, radius, 270.0);
    assert!((east.longitude - bbox.max_lon).abs() < 1e-9);
    assert!((west.longitude - bbox.min_lon).abs() < 1e-9);
}

#[test]
fn test_bounding_box_corners_beyond_radius() {
    let center = GeoPoint::new(1.3, 103.8);
    let radius = 500.0;
    let bbox = bounding_box(center, radius);

    let corners = [
        GeoPoint::new(bbox.min_lat, bbox.min_lon),
        GeoPoint::new(bbox.min_lat, bbox.max_lon),
        GeoPoint::new(bbox.max_lat, bbox.min_lon),
        GeoPoint::new(bbox.max_lat, bbox.max_lon),
    ];
    for corner in corners {
        assert!(center.distance_to(&corner) > radius);
        assert!(bbox.contains(&corner));
    }
}

#[test]
fn test_bounding_box_contains_center() {
    let center = GeoPoint::new(-33.8688, 151.2093);
    let bbox = bounding_box(center, 1000.0);
    assert!(bbox.contains(&center));
    assert!(!bbox.crosses_antimeridian());
}

#[test]
fn test_bounding_box_zero_radius_is_a_point() {
    let center = GeoPoint::new(1.3, 103.8);
    let bbox = bounding_box(center, 0.0);
    assert_eq!(bbox.min_lat, 1.3);
    assert_eq!(bbox.max_lat, 1.3);
    assert!(bbox.contains(&center));
}

#[test]
fn test_bounding_box_wraps_antimeridian() {
    let center = GeoPoint::new(0.0, 179.999);
    let bbox = bounding_box(center, 1000.0);

    assert!(bbox.crosses_antimeridian());
    assert!(bbox.contains(&GeoPoint::new(0.0, -179.999)));
    assert!(bbox.contains(&GeoPoint::new(0.0, 179.995)));
    assert!(!bbox.contains(&GeoPoint::new(0.0, 0.0)));
    assert_eq!(bbox.lon_ranges().len(), 2);
}

#[test]
fn test_bounding_box_near_pole_spans_all_longitudes() {
    let center = GeoPoint::new(89.999, 10.0);
    let bbox = bounding_box(center, 1000.0);
    assert_eq!(bbox.max_lat, MAX_LAT);
    assert_eq!(bbox.min_lon, MIN_LON);
    assert_eq!(bbox.max_lon, MAX_LON);
}

#[test]
fn test_normalize_longitude() {
    assert_eq!(normalize_longitude(0.0), 0.0);
    assert!((normalize_longitude(190.0) - (-170.0)).abs() < 1e-9);
    assert!((normalize_longitude(-190.0) - 170.0).abs() < 1e-9);
    assert_eq!(normalize_longitude(180.0), -180.0);
}
