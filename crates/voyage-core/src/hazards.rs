//! Hazard zone detection and single-waypoint avoidance.
//!
//! Each intersecting zone gets exactly one avoidance waypoint placed abeam of
//! its centre at a buffered radius, on the side of the track away from the
//! zone. This handles isolated, roughly circular hazards; elongated or heavily
//! overlapping fields can still be under-avoided.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::geodesy::{
    bearing_deg, destination_point, distance_nm, interpolate, is_valid_coordinate,
    normalize_bearing,
};
use crate::models::{AvoidancePolicy, Coordinate, HazardZone};
use crate::rules::OptimizerRules;

/// Default number of interpolated points checked per segment.
pub const DEFAULT_CHECK_POINTS: usize = 10;

/// Side of the track a zone lies on, looking along the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One planned avoidance.
#[derive(Debug, Clone)]
pub struct Avoidance<'a> {
    pub zone: &'a HazardZone,
    pub waypoint: Coordinate,
    /// Where the zone sat relative to the track
    pub zone_side: Side,
    /// Distance from the zone centre to the waypoint
    pub clearance_nm: f64,
    /// Bearing from the zone centre to the waypoint
    pub offset_bearing_deg: f64,
}

/// Reject zones with unusable geometry or an empty validity window.
pub fn validate_zone(zone: &HazardZone) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidHazardZone {
        id: zone.id.clone(),
        reason: reason.to_string(),
    };
    if !is_valid_coordinate(zone.center) {
        return Err(invalid("center is not a valid coordinate"));
    }
    if !zone.radius_nm.is_finite() || zone.radius_nm <= 0.0 {
        return Err(invalid("radius must be a positive number of nautical miles"));
    }
    if zone.valid_to <= zone.valid_from {
        return Err(invalid("validTo must be after validFrom"));
    }
    Ok(())
}

/// Zones in force at `at`.
pub fn active_zones(zones: &[HazardZone], at: DateTime<Utc>) -> Vec<&HazardZone> {
    zones.iter().filter(|zone| zone.is_active_at(at)).collect()
}

pub fn point_in_zone(point: Coordinate, zone: &HazardZone) -> bool {
    distance_nm(point, zone.center) <= zone.radius_nm
}

/// Check both endpoints and `check_points` interpolated points for
/// membership in the zone's circle.
pub fn does_segment_intersect_zone(
    from: Coordinate,
    to: Coordinate,
    zone: &HazardZone,
    check_points: usize,
) -> bool {
    let steps = check_points.max(1);
    (0..=steps).any(|i| {
        let t = i as f64 / steps as f64;
        point_in_zone(interpolate(from, to, t), zone)
    })
}

/// Which side of the `from -> to` track the zone centre lies on. A zone dead
/// ahead or astern counts as left.
pub fn zone_side(from: Coordinate, to: Coordinate, zone: &HazardZone) -> Side {
    let track = bearing_deg(from, to);
    let to_zone = bearing_deg(from, zone.center);
    let diff = normalize_bearing(to_zone - track);
    if diff > 0.0 && diff < 180.0 {
        Side::Right
    } else {
        Side::Left
    }
}

/// Place the avoidance point for `zone`: its centre offset by the buffered
/// radius, perpendicular to the track, on the side away from the zone.
pub fn avoidance_waypoint<'a>(
    from: Coordinate,
    to: Coordinate,
    zone: &'a HazardZone,
    buffer_factor: f64,
) -> Avoidance<'a> {
    let track = bearing_deg(from, to);
    let side = zone_side(from, to, zone);
    let offset_bearing = match side.opposite() {
        Side::Right => normalize_bearing(track + 90.0),
        Side::Left => normalize_bearing(track - 90.0),
    };
    let clearance_nm = zone.radius_nm * buffer_factor;
    Avoidance {
        zone,
        waypoint: destination_point(zone.center, clearance_nm, offset_bearing),
        zone_side: side,
        clearance_nm,
        offset_bearing_deg: offset_bearing,
    }
}

/// Walk the zones nearest-first from `from`, inserting one avoidance point
/// per zone that the remaining track to `to` would cross. Optional zones are
/// never avoided.
pub fn plan_avoidance<'a>(
    from: Coordinate,
    to: Coordinate,
    zones: &[&'a HazardZone],
    rules: &OptimizerRules,
) -> Vec<Avoidance<'a>> {
    let mut ordered: Vec<&HazardZone> = zones
        .iter()
        .copied()
        .filter(|zone| zone.avoidance != AvoidancePolicy::Optional)
        .collect();
    ordered.sort_by(|a, b| {
        distance_nm(from, a.center)
            .total_cmp(&distance_nm(from, b.center))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut current = from;
    let mut planned = Vec::new();
    for zone in ordered {
        if !does_segment_intersect_zone(current, to, zone, rules.hazard_check_points) {
            continue;
        }
        let avoidance = avoidance_waypoint(current, to, zone, rules.hazard_buffer_factor);
        tracing::debug!(
            zone = %zone.id,
            side = ?avoidance.zone_side,
            clearance_nm = avoidance.clearance_nm,
            "avoiding hazard zone"
        );
        current = avoidance.waypoint;
        planned.push(avoidance);
    }
    planned
}

/// Compass-point name for a bearing, used in reasoning text.
pub fn compass_point(bearing: f64) -> &'static str {
    const POINTS: [&str; 8] = [
        "north",
        "north-east",
        "east",
        "south-east",
        "south",
        "south-west",
        "west",
        "north-west",
    ];
    let index = ((normalize_bearing(bearing) + 22.5) / 45.0).floor() as usize % 8;
    POINTS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HazardKind, HazardSeverity};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap()
    }

    fn zone(id: &str, center: Coordinate, radius_nm: f64) -> HazardZone {
        HazardZone {
            id: id.to_string(),
            kind: HazardKind::Storm,
            severity: HazardSeverity::Severe,
            center,
            radius_nm,
            wind_speed_knots: Some(55.0),
            wave_height_m: None,
            valid_from: now() - Duration::hours(1),
            valid_to: now() + Duration::hours(12),
            avoidance: AvoidancePolicy::Mandatory,
        }
    }

    const FROM: Coordinate = Coordinate::new(26.0, 52.0);
    const TO: Coordinate = Coordinate::new(26.0, 54.0);

    #[test]
    fn validity_window_is_half_open() {
        let z = zone("z", Coordinate::new(26.0, 53.0), 20.0);
        assert!(z.is_active_at(z.valid_from));
        assert!(!z.is_active_at(z.valid_to));
        let zones = vec![z.clone()];
        assert_eq!(active_zones(&zones, now()).len(), 1);
        assert!(active_zones(&zones, now() + Duration::days(1)).is_empty());
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        let mut z = zone("z", Coordinate::new(26.0, 53.0), 20.0);
        assert!(validate_zone(&z).is_ok());
        z.radius_nm = 0.0;
        assert!(validate_zone(&z).is_err());
        z.radius_nm = 20.0;
        z.center = Coordinate::new(95.0, 53.0);
        assert!(validate_zone(&z).is_err());
        z.center = Coordinate::new(26.0, 53.0);
        z.valid_to = z.valid_from;
        assert!(validate_zone(&z).is_err());
    }

    #[test]
    fn segment_through_zone_intersects() {
        let z = zone("z", Coordinate::new(26.0, 53.0), 20.0);
        assert!(does_segment_intersect_zone(FROM, TO, &z, DEFAULT_CHECK_POINTS));
    }

    #[test]
    fn distant_zone_does_not_intersect() {
        let z = zone("z", Coordinate::new(25.2, 53.0), 15.0);
        assert!(!does_segment_intersect_zone(FROM, TO, &z, DEFAULT_CHECK_POINTS));
    }

    #[test]
    fn side_detection() {
        // heading east: north is left, south is right
        let north = zone("n", Coordinate::new(26.3, 53.0), 10.0);
        let south = zone("s", Coordinate::new(25.7, 53.0), 10.0);
        assert_eq!(zone_side(FROM, TO, &north), Side::Left);
        assert_eq!(zone_side(FROM, TO, &south), Side::Right);
    }

    #[test]
    fn avoidance_point_is_opposite_the_zone() {
        let south = zone("s", Coordinate::new(25.9, 53.0), 20.0);
        let avoidance = avoidance_waypoint(FROM, TO, &south, 1.25);
        assert_eq!(avoidance.zone_side, Side::Right);
        assert!(avoidance.waypoint.lat > south.center.lat);
        let clearance = distance_nm(south.center, avoidance.waypoint);
        assert!((clearance - 25.0).abs() < 1e-6, "got {clearance}");
        assert!(!point_in_zone(avoidance.waypoint, &south));
    }

    #[test]
    fn plan_skips_optional_and_clear_zones() {
        let mut optional = zone("opt", Coordinate::new(26.0, 53.0), 20.0);
        optional.avoidance = AvoidancePolicy::Optional;
        let clear = zone("clear", Coordinate::new(25.2, 53.0), 15.0);
        let zones = vec![&optional, &clear];
        assert!(plan_avoidance(FROM, TO, &zones, &OptimizerRules::default()).is_empty());
    }

    #[test]
    fn plan_orders_zones_nearest_first() {
        let far = zone("far", Coordinate::new(26.0, 53.6), 10.0);
        let near = zone("near", Coordinate::new(26.0, 52.5), 10.0);
        let zones = vec![&far, &near];
        let planned = plan_avoidance(FROM, TO, &zones, &OptimizerRules::default());
        let ids: Vec<_> = planned.iter().map(|a| a.zone.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
    }

    #[test]
    fn compass_points() {
        assert_eq!(compass_point(0.0), "north");
        assert_eq!(compass_point(359.0), "north");
        assert_eq!(compass_point(95.0), "east");
        assert_eq!(compass_point(225.0), "south-west");
    }

    #[test]
    fn segment_across_the_date_line_hits_zone_on_it() {
        let from = Coordinate::new(0.0, 179.0);
        let to = Coordinate::new(0.0, -179.0);
        let z = zone("dateline", Coordinate::new(0.0, 180.0), 50.0);
        assert!(does_segment_intersect_zone(from, to, &z, DEFAULT_CHECK_POINTS));
        assert!(does_segment_intersect_zone(to, from, &z, DEFAULT_CHECK_POINTS));

        let far = zone("greenwich", Coordinate::new(0.0, 0.0), 50.0);
        assert!(!does_segment_intersect_zone(from, to, &far, DEFAULT_CHECK_POINTS));

        let zones = vec![&z];
        let planned = plan_avoidance(from, to, &zones, &OptimizerRules::default());
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].zone_side, Side::Left);
        assert!((distance_nm(planned[0].waypoint, z.center) - 62.5).abs() < 1e-6);
        assert!(planned[0].waypoint.lat < 0.0);
    }
}
