use crate::models::{BoundingBox, GeoPoint};

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const MILES_PER_KM: f64 = 0.621371;
const KM_PER_MILE: f64 = 1.60934;

/// Calculate the Haversine distance between two points in kilometers
///
/// No range validation is done on the inputs.
#[inline]
pub fn haversine_distance(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance from `reference` to `coordinate`, or `None` when either is unknown
#[inline]
pub fn distance_to(reference: Option<GeoPoint>, coordinate: Option<GeoPoint>) -> Option<f64> {
    match (reference, coordinate) {
        (Some(from), Some(to)) => Some(haversine_distance(from, to)),
        _ => None,
    }
}

#[inline]
pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

#[inline]
pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

/// Calculate a bounding box around a center point
///
/// Rectangular pre-filter ahead of the haversine check. It must contain the
/// whole circle of `radius_km`, so the longitude half-width is the spherical
/// `asin(sin δ / cos φ)` rather than a flat-earth estimate.
/// Boxes that reach a pole or cross the antimeridian cover every longitude.
pub fn calculate_bounding_box(center: GeoPoint, radius_km: f64) -> BoundingBox {
    let angular = radius_km / EARTH_RADIUS_KM;
    let lat_delta = angular.to_degrees();

    let min_lat = center.lat - lat_delta;
    let max_lat = center.lat + lat_delta;

    let sin_angular = angular.sin();
    let cos_lat = center.lat.to_radians().cos().abs();

    let lon_delta = if min_lat <= -90.0 || max_lat >= 90.0 || sin_angular >= cos_lat {
        None
    } else {
        Some((sin_angular / cos_lat).asin().to_degrees())
    };

    let (min_lon, max_lon) = match lon_delta {
        Some(delta) if center.lng - delta >= -180.0 && center.lng + delta <= 180.0 => {
            (center.lng - delta, center.lng + delta)
        }
        _ => (-180.0, 180.0),
    };

    BoundingBox {
        min_lat: min_lat.max(-90.0),
        max_lat: max_lat.min(90.0),
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: GeoPoint, bbox: &BoundingBox) -> bool {
    point.lat >= bbox.min_lat
        && point.lat <= bbox.max_lat
        && point.lng >= bbox.min_lon
        && point.lng <= bbox.max_lon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london = GeoPoint::new(51.5074, -0.1278);
        let paris = GeoPoint::new(48.8566, 2.3522);

        let distance = haversine_distance(london, paris);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_haversine_symmetric_and_zero() {
        let la = GeoPoint::new(34.0522, -118.2437);
        let santa_monica = GeoPoint::new(34.0195, -118.4912);

        assert_eq!(haversine_distance(la, la), 0.0);
        assert!((haversine_distance(la, santa_monica) - haversine_distance(santa_monica, la)).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_requires_both_points() {
        let point = GeoPoint::new(34.0, -118.2);

        assert_eq!(distance_to(Some(point), Some(point)), Some(0.0));
        assert_eq!(distance_to(None, Some(point)), None);
        assert_eq!(distance_to(Some(point), None), None);
    }

    #[test]
    fn test_mile_conversions() {
        assert!((km_to_miles(10.0) - 6.21371).abs() < 1e-9);
        assert!((miles_to_km(10.0) - 16.0934).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = calculate_bounding_box(GeoPoint::new(34.0522, -118.2437), 10.0);

        assert!(bbox.min_lat < 34.0522);
        assert!(bbox.max_lat > 34.0522);
        assert!(bbox.min_lon < -118.2437);
        assert!(bbox.max_lon > -118.2437);

        // 20km over a 6371km radius = ~0.18 degrees
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.18).abs() < 0.02, "Lat span should be ~0.18 degrees");
    }

    #[test]
    fn test_bounding_box_near_antimeridian() {
        let bbox = calculate_bounding_box(GeoPoint::new(0.0, 179.95), 50.0);

        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
        assert!(is_within_bounding_box(GeoPoint::new(0.0, -179.95), &bbox));
    }

    #[test]
    fn test_bounding_box_contains_circle_at_high_latitude() {
        let center = GeoPoint::new(80.0, 0.0);
        let radius_km = miles_to_km(300.0);
        let edge = GeoPoint::new(80.98, 25.5);

        assert!(haversine_distance(center, edge) < radius_km);
        assert!(is_within_bounding_box(edge, &calculate_bounding_box(center, radius_km)));
    }

    #[test]
    fn test_bounding_box_reaching_pole_covers_all_longitudes() {
        let bbox = calculate_bounding_box(GeoPoint::new(89.9, 10.0), 50.0);

        assert_eq!(bbox.max_lat, 90.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
        assert!(is_within_bounding_box(GeoPoint::new(89.8, -170.0), &bbox));
    }

    #[test]
    fn test_point_within_bbox() {
        let bbox = calculate_bounding_box(GeoPoint::new(34.0522, -118.2437), 10.0);

        assert!(is_within_bounding_box(GeoPoint::new(34.0522, -118.2437), &bbox));
        assert!(is_within_bounding_box(GeoPoint::new(34.05, -118.25), &bbox));
        assert!(!is_within_bounding_box(GeoPoint::new(40.7128, -74.0060), &bbox));
    }
}
