//! Spherical-earth math for distances, bearings and projections.
//!
//! Storage is always decimal degrees; radians only appear inside the
//! trigonometric primitives below.

use crate::models::Coordinate;

/// Mean earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Great-circle distance in nautical miles using the Haversine formula.
///
/// Symmetric in its arguments and zero for identical points.
pub fn distance_nm(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial great-circle bearing from `from` to `to`, in degrees `[0, 360)`.
pub fn bearing_deg(from: Coordinate, to: Coordinate) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_lambda = (to.lng - from.lng).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_bearing(x.atan2(y).to_degrees())
}

/// Project a point `distance_nm` along a great circle starting at `bearing_deg`.
pub fn destination_point(origin: Coordinate, distance_nm: f64, bearing_deg: f64) -> Coordinate {
    if distance_nm.abs() <= f64::EPSILON {
        return origin;
    }

    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lng.to_radians();
    let bearing_rad = bearing_deg.to_radians();
    let angular_distance = distance_nm / EARTH_RADIUS_NM;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    Coordinate::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Wrap any angle in degrees into `[0, 360)`.
pub fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Linear interpolation in degree space, `t` in `[0, 1]`.
///
/// Matches how the coastline rules are drawn (straight lines on a plate
/// carrée chart), so segment sampling stays consistent with them. The
/// longitude step takes the short way round, so a segment crossing the
/// 180° meridian is sampled across it rather than through lng 0.
pub fn interpolate(a: Coordinate, b: Coordinate, t: f64) -> Coordinate {
    let mut delta_lng = b.lng - a.lng;
    if delta_lng > 180.0 {
        delta_lng -= 360.0;
    } else if delta_lng <= -180.0 {
        delta_lng += 360.0;
    }
    let mut lng = a.lng + t * delta_lng;
    if lng > 180.0 {
        lng -= 360.0;
    } else if lng < -180.0 {
        lng += 360.0;
    }
    Coordinate::new(a.lat + t * (b.lat - a.lat), lng)
}

/// Check that a coordinate is finite and inside the valid lat/lng ranges.
pub fn is_valid_coordinate(point: Coordinate) -> bool {
    point.lat.is_finite()
        && point.lng.is_finite()
        && point.lat.abs() <= 90.0
        && point.lng.abs() <= 180.0
}
