//! Coastal corridor synthesis.
//!
//! When a voyage would cross land, or leaves one named basin for another,
//! the router substitutes a chain of offshore `coastal_waypoint`s. Known
//! straits and peninsulas come from the [`PASSAGES`] table; anything else
//! gets a generated offshore arc. Neither is guaranteed to be land-free, so
//! every chain is re-checked after construction and failing legs are noted.

use crate::basins::{basin_of, Basin};
use crate::geodesy::{bearing_deg, destination_point, distance_nm, interpolate};
use crate::landmass::{does_segment_cross_land, is_over_land};
use crate::models::{Coordinate, Waypoint, WaypointKind};
use crate::rules::OptimizerRules;

const UNVERIFIED_LEG_NOTE: &str =
    "leg into this point still crosses modeled land; verify against charts before sailing";

/// A named, pre-validated transit point.
#[derive(Debug, Clone, Copy)]
pub struct TransitPoint {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl TransitPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Transit points linking two basins, ordered from `from` to `to`.
#[derive(Debug, Clone, Copy)]
pub struct Passage {
    pub name: &'static str,
    pub from: Basin,
    pub to: Basin,
    pub points: &'static [TransitPoint],
}

pub static PASSAGES: &[Passage] = &[
    Passage {
        name: "Strait of Hormuz",
        from: Basin::ArabianGulf,
        to: Basin::GulfOfOman,
        points: &[
            TransitPoint {
                name: "Ras Al Khaimah offing",
                lat: 26.05,
                lng: 55.75,
            },
            TransitPoint {
                name: "Hormuz inbound lane west",
                lat: 26.55,
                lng: 56.05,
            },
            TransitPoint {
                name: "Strait of Hormuz",
                lat: 26.55,
                lng: 56.45,
            },
            TransitPoint {
                name: "Hormuz outbound lane east",
                lat: 26.2,
                lng: 56.65,
            },
            TransitPoint {
                name: "Off Dibba",
                lat: 25.6,
                lng: 56.6,
            },
        ],
    },
    Passage {
        name: "Ras al Hadd",
        from: Basin::GulfOfOman,
        to: Basin::ArabianSea,
        points: &[
            TransitPoint {
                name: "Ras al Hadd approach",
                lat: 23.2,
                lng: 59.5,
            },
            TransitPoint {
                name: "Off Ras al Hadd",
                lat: 22.4,
                lng: 60.0,
            },
        ],
    },
    Passage {
        name: "Qatar peninsula",
        from: Basin::GulfOfBahrain,
        to: Basin::ArabianGulf,
        points: &[
            TransitPoint {
                name: "Bahrain north channel",
                lat: 26.3,
                lng: 50.7,
            },
            TransitPoint {
                name: "Ras Laffan offing",
                lat: 26.4,
                lng: 51.25,
            },
            TransitPoint {
                name: "Qatar north-east offing",
                lat: 26.0,
                lng: 51.8,
            },
        ],
    },
];

/// How a corridor was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum CorridorSource {
    /// No corridor needed
    Direct,
    /// Transit points from the passage table
    TransitTable {
        from: Basin,
        to: Basin,
        passages: Vec<&'static str>,
    },
    /// Generated offshore arc
    OffshoreArc { deflection_deg: f64 },
}

#[derive(Debug, Clone)]
pub struct Corridor {
    pub waypoints: Vec<Waypoint>,
    pub source: CorridorSource,
    /// Legs of `origin -> waypoints -> destination` still crossing land
    pub unverified_legs: usize,
    /// Note for the destination when the final leg is one of them
    pub destination_note: Option<String>,
}

impl Corridor {
    fn direct() -> Self {
        Self {
            waypoints: Vec::new(),
            source: CorridorSource::Direct,
            unverified_legs: 0,
            destination_note: None,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.unverified_legs == 0
    }
}

/// True if the two points sit in different basins or the straight line
/// between them crosses land.
pub fn needs_corridor(origin: Coordinate, destination: Coordinate, land_samples: usize) -> bool {
    match (basin_of(origin), basin_of(destination)) {
        (Some(a), Some(b)) if a != b => true,
        _ => does_segment_cross_land(origin, destination, land_samples),
    }
}

/// Build the corridor between `origin` and `destination`.
///
/// Never fails: when no land-free chain can be found the best attempt is
/// returned with notes on the legs that could not be verified.
pub fn build_corridor(
    origin: Coordinate,
    destination: Coordinate,
    rules: &OptimizerRules,
) -> Corridor {
    if !needs_corridor(origin, destination, rules.land_samples) {
        return Corridor::direct();
    }

    let table = match (basin_of(origin), basin_of(destination)) {
        (Some(a), Some(b)) if a != b => transit_chain(a, b).map(|found| (a, b, found)),
        _ => None,
    };

    let (points, source) = match table {
        Some((from, to, (passages, chain))) => {
            let chain = trim_transit_chain(origin, destination, chain);
            let points: Vec<(Coordinate, Option<String>)> = chain
                .iter()
                .map(|tp| (tp.coordinate(), Some(tp.name.to_string())))
                .collect();
            (
                points,
                CorridorSource::TransitTable {
                    from,
                    to,
                    passages,
                },
            )
        }
        None => {
            let (deflection_deg, arc) = offshore_arc(origin, destination, rules);
            let points = arc
                .into_iter()
                .enumerate()
                .map(|(i, point)| (point, Some(format!("Offshore waypoint {}", i + 1))))
                .collect();
            (points, CorridorSource::OffshoreArc { deflection_deg })
        }
    };

    let mut corridor = Corridor {
        waypoints: points
            .into_iter()
            .map(|(point, name)| Waypoint::new(WaypointKind::CoastalWaypoint, point, name))
            .collect(),
        source,
        unverified_legs: 0,
        destination_note: None,
    };
    verify_corridor(origin, destination, &mut corridor, rules.land_samples);

    tracing::debug!(
        source = ?corridor.source,
        waypoints = corridor.waypoints.len(),
        "built coastal corridor"
    );
    corridor
}

/// Look up the transit chain between two basins: a direct passage (either
/// direction), or two passages joined through an intermediate basin.
fn transit_chain(from: Basin, to: Basin) -> Option<(Vec<&'static str>, Vec<TransitPoint>)> {
    if let Some((name, points)) = passage_between(from, to) {
        return Some((vec![name], points));
    }

    let mut via: Vec<Basin> = PASSAGES
        .iter()
        .flat_map(|passage| [passage.from, passage.to])
        .filter(|basin| *basin != from && *basin != to)
        .collect();
    via.sort();
    via.dedup();

    via.into_iter().find_map(|mid| {
        let (first_name, mut points) = passage_between(from, mid)?;
        let (second_name, rest) = passage_between(mid, to)?;
        points.extend(rest);
        Some((vec![first_name, second_name], points))
    })
}

fn passage_between(from: Basin, to: Basin) -> Option<(&'static str, Vec<TransitPoint>)> {
    PASSAGES.iter().find_map(|passage| {
        if passage.from == from && passage.to == to {
            Some((passage.name, passage.points.to_vec()))
        } else if passage.from == to && passage.to == from {
            Some((passage.name, passage.points.iter().rev().copied().collect()))
        } else {
            None
        }
    })
}

/// Keep only the transit points that lie between origin and destination:
/// a leading point is dropped when the origin is already closer to the next
/// point than it is, and symmetrically at the destination end.
fn trim_transit_chain(
    origin: Coordinate,
    destination: Coordinate,
    mut chain: Vec<TransitPoint>,
) -> Vec<TransitPoint> {
    while chain.len() >= 2 {
        let first = chain[0].coordinate();
        let second = chain[1].coordinate();
        if distance_nm(origin, second) < distance_nm(first, second) {
            chain.remove(0);
        } else {
            break;
        }
    }
    while chain.len() >= 2 {
        let n = chain.len();
        let last = chain[n - 1].coordinate();
        let before = chain[n - 2].coordinate();
        if distance_nm(destination, before) < distance_nm(last, before) {
            chain.pop();
        } else {
            break;
        }
    }
    chain
}

/// Generate 2-3 offshore points deflected toward open water. Each configured
/// deflection is tried in turn; the first land-free chain wins, otherwise the
/// attempt with the fewest land-crossing legs is kept.
fn offshore_arc(
    origin: Coordinate,
    destination: Coordinate,
    rules: &OptimizerRules,
) -> (f64, Vec<Coordinate>) {
    let base = bearing_deg(origin, destination);
    let back = bearing_deg(destination, origin);
    let offset = (distance_nm(origin, destination) * rules.corridor_offset_fraction)
        .clamp(rules.corridor_offset_min_nm, rules.corridor_offset_max_nm);

    let midpoint = interpolate(origin, destination, 0.5);
    let bands: Vec<f64> = [basin_of(origin), basin_of(destination)]
        .into_iter()
        .flatten()
        .map(|basin| basin.open_water_lat())
        .collect();
    let target_lat = if bands.is_empty() {
        midpoint.lat
    } else {
        bands.iter().sum::<f64>() / bands.len() as f64
    };

    // Deflect to whichever side of the track faces the open-water band.
    let heads_north = target_lat >= midpoint.lat;
    let right_is_north = (base + 90.0).to_radians().cos() >= 0.0;
    let side = if right_is_north == heads_north { 1.0 } else { -1.0 };

    let mut best: Option<(usize, f64, Vec<Coordinate>)> = None;
    for &delta in &rules.corridor_bearing_deltas_deg {
        let first = destination_point(origin, offset, base + side * delta);
        let last = destination_point(destination, offset, back - side * delta);
        let mut middle = interpolate(first, last, 0.5);
        middle.lat += (target_lat - middle.lat) * rules.open_water_bias;

        let points: Vec<Coordinate> = [first, middle, last]
            .into_iter()
            .filter(|point| !is_over_land(*point))
            .collect();
        let crossings = count_land_crossings(origin, destination, &points, rules.land_samples);

        let better = best
            .as_ref()
            .map(|(fewest, _, _)| crossings < *fewest)
            .unwrap_or(true);
        if better {
            best = Some((crossings, delta, points));
        }
        if crossings == 0 {
            break;
        }
    }

    best.map(|(_, delta, points)| (delta, points))
        .unwrap_or((0.0, Vec::new()))
}

fn count_land_crossings(
    origin: Coordinate,
    destination: Coordinate,
    points: &[Coordinate],
    land_samples: usize,
) -> usize {
    let mut chain = Vec::with_capacity(points.len() + 2);
    chain.push(origin);
    chain.extend_from_slice(points);
    chain.push(destination);
    chain
        .windows(2)
        .filter(|leg| does_segment_cross_land(leg[0], leg[1], land_samples))
        .count()
}

/// Re-check every leg and annotate the ones that still cross land.
fn verify_corridor(
    origin: Coordinate,
    destination: Coordinate,
    corridor: &mut Corridor,
    land_samples: usize,
) {
    let mut previous = origin;
    for waypoint in corridor.waypoints.iter_mut() {
        let here = waypoint.coordinate();
        if does_segment_cross_land(previous, here, land_samples) {
            waypoint.add_note(UNVERIFIED_LEG_NOTE);
            corridor.unverified_legs += 1;
        }
        previous = here;
    }
    if does_segment_cross_land(previous, destination, land_samples) {
        corridor.destination_note = Some(UNVERIFIED_LEG_NOTE.to_string());
        corridor.unverified_legs += 1;
    }

    if corridor.unverified_legs > 0 {
        tracing::warn!(
            unverified_legs = corridor.unverified_legs,
            source = ?corridor.source,
            "coastal corridor still crosses modeled land; returning best effort"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmass::DEFAULT_LAND_SAMPLES;

    fn dubai() -> Coordinate {
        Coordinate::new(25.27, 55.27)
    }

    fn fujairah() -> Coordinate {
        Coordinate::new(25.17, 56.40)
    }

    fn chain(origin: Coordinate, corridor: &Corridor, destination: Coordinate) -> Vec<Coordinate> {
        let mut points = vec![origin];
        points.extend(corridor.waypoints.iter().map(Waypoint::coordinate));
        points.push(destination);
        points
    }

    #[test]
    fn passage_points_are_water() {
        for passage in PASSAGES {
            for point in passage.points {
                assert!(!is_over_land(point.coordinate()), "{}", point.name);
            }
        }
    }

    #[test]
    fn same_basin_open_water_needs_no_corridor() {
        let a = Coordinate::new(26.0, 52.0);
        let b = Coordinate::new(26.0, 54.0);
        assert!(!needs_corridor(a, b, DEFAULT_LAND_SAMPLES));
        let corridor = build_corridor(a, b, &OptimizerRules::default());
        assert!(corridor.waypoints.is_empty());
        assert_eq!(corridor.source, CorridorSource::Direct);
    }

    #[test]
    fn different_basins_need_corridor() {
        assert!(needs_corridor(dubai(), fujairah(), DEFAULT_LAND_SAMPLES));
    }

    #[test]
    fn hormuz_transit_is_land_free() {
        let corridor = build_corridor(dubai(), fujairah(), &OptimizerRules::default());
        assert_eq!(
            corridor.source,
            CorridorSource::TransitTable {
                from: Basin::ArabianGulf,
                to: Basin::GulfOfOman,
                passages: vec!["Strait of Hormuz"]
            }
        );
        assert_eq!(corridor.waypoints.len(), 5);
        assert!(corridor.is_verified());
        assert!(corridor
            .waypoints
            .iter()
            .all(|wp| wp.kind == WaypointKind::CoastalWaypoint));
        for leg in chain(dubai(), &corridor, fujairah()).windows(2) {
            assert!(!does_segment_cross_land(leg[0], leg[1], DEFAULT_LAND_SAMPLES));
        }
    }

    #[test]
    fn reverse_transit_reverses_points() {
        let corridor = build_corridor(fujairah(), dubai(), &OptimizerRules::default());
        let names: Vec<_> = corridor
            .waypoints
            .iter()
            .filter_map(|wp| wp.name.clone())
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("Off Dibba"));
        assert_eq!(names.last().map(String::as_str), Some("Ras Al Khaimah offing"));
    }

    #[test]
    fn two_passages_join_through_intermediate_basin() {
        let sur_offing = Coordinate::new(22.4, 60.5);
        let corridor = build_corridor(dubai(), sur_offing, &OptimizerRules::default());
        assert_eq!(
            corridor.source,
            CorridorSource::TransitTable {
                from: Basin::ArabianGulf,
                to: Basin::ArabianSea,
                passages: vec!["Strait of Hormuz", "Ras al Hadd"]
            }
        );
        assert!(corridor.is_verified());
    }

    #[test]
    fn trim_drops_points_behind_origin() {
        // Khasab is already past the first Hormuz point
        let khasab = Coordinate::new(26.20, 56.25);
        let corridor = build_corridor(khasab, fujairah(), &OptimizerRules::default());
        let names: Vec<_> = corridor
            .waypoints
            .iter()
            .filter_map(|wp| wp.name.clone())
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("Hormuz inbound lane west"));
    }

    #[test]
    fn unverified_leg_is_noted_not_dropped() {
        // Khasab harbour to the western lane clips the Musandam tip
        let khasab = Coordinate::new(26.20, 56.25);
        let corridor = build_corridor(khasab, fujairah(), &OptimizerRules::default());
        assert!(!corridor.is_verified());
        assert!(corridor.waypoints[0]
            .notes
            .as_deref()
            .unwrap_or_default()
            .contains("crosses modeled land"));
    }

    #[test]
    fn same_basin_land_crossing_falls_back_to_offshore_arc() {
        // Ras Tanura to Doha cuts across the Qatar peninsula
        let ras_tanura = Coordinate::new(26.7, 50.2);
        let doha = Coordinate::new(25.29, 51.55);
        let corridor = build_corridor(ras_tanura, doha, &OptimizerRules::default());
        assert!(matches!(corridor.source, CorridorSource::OffshoreArc { .. }));
        assert!((2..=3).contains(&corridor.waypoints.len()));
        assert!(corridor.is_verified());
        for leg in chain(ras_tanura, &corridor, doha).windows(2) {
            assert!(!does_segment_cross_land(leg[0], leg[1], DEFAULT_LAND_SAMPLES));
        }
    }
}
