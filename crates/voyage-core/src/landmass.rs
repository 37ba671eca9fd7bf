//! Landmass classification for the Arabian Gulf, Strait of Hormuz and
//! Gulf of Oman.
//!
//! This is an APPROXIMATION, not a vector coastline. Each [`CoastRule`] owns a
//! disjoint lat/lng box and draws a piecewise-linear "coastal latitude" across
//! its longitude band; a point inside the box is land when it sits on the
//! rule's landward side of that line, unless it falls in one of the rule's
//! carve-outs (port basins, harbours) that the line would misclassify.
//!
//! Anything outside every box is treated as open water. Covering a new region
//! means adding a new rule to [`COAST_RULES`].

use crate::geodesy::interpolate;
use crate::models::Coordinate;

/// Default number of interior samples used by [`does_segment_cross_land`].
pub const DEFAULT_LAND_SAMPLES: usize = 20;

/// Which side of the coastal latitude is land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landward {
    /// Land lies south of the coast (southern shore of a basin)
    South,
    /// Land lies north of the coast (northern shore of a basin)
    North,
}

/// A rectangular area that is water even though the coast line says land.
#[derive(Debug, Clone, Copy)]
pub struct Carveout {
    pub name: &'static str,
    pub lat: (f64, f64),
    pub lng: (f64, f64),
}

impl Carveout {
    fn contains(&self, point: Coordinate) -> bool {
        point.lat >= self.lat.0
            && point.lat <= self.lat.1
            && point.lng >= self.lng.0
            && point.lng <= self.lng.1
    }
}

/// One banded coastline rule.
#[derive(Debug, Clone, Copy)]
pub struct CoastRule {
    pub name: &'static str,
    /// Longitude band, `[min, max)`
    pub lng: (f64, f64),
    /// Latitude band, `[min, max)`
    pub lat: (f64, f64),
    pub landward: Landward,
    /// `(lng, lat)` knots in ascending longitude
    pub coast: &'static [(f64, f64)],
    pub carveouts: &'static [Carveout],
}

impl CoastRule {
    pub fn covers(&self, point: Coordinate) -> bool {
        point.lng >= self.lng.0
            && point.lng < self.lng.1
            && point.lat >= self.lat.0
            && point.lat < self.lat.1
    }

    /// Coastal latitude at `lng`, held flat beyond the first/last knot.
    pub fn coastal_lat(&self, lng: f64) -> f64 {
        let Some(&(first_lng, first_lat)) = self.coast.first() else {
            return self.lat.0;
        };
        if lng <= first_lng {
            return first_lat;
        }
        for pair in self.coast.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if lng <= x1 {
                let span = x1 - x0;
                if span <= f64::EPSILON {
                    return y1;
                }
                return y0 + (lng - x0) / span * (y1 - y0);
            }
        }
        self.coast.last().map(|&(_, lat)| lat).unwrap_or(first_lat)
    }

    /// Land test for a point already known to be inside this rule's box.
    fn classifies_land(&self, point: Coordinate) -> bool {
        if self.carveouts.iter().any(|c| c.contains(point)) {
            return false;
        }
        let coast_lat = self.coastal_lat(point.lng);
        match self.landward {
            Landward::South => point.lat < coast_lat,
            Landward::North => point.lat > coast_lat,
        }
    }
}

/// Coastline rules. Boxes are disjoint, so at most one rule applies.
pub static COAST_RULES: &[CoastRule] = &[
    CoastRule {
        name: "arabian_peninsula_gulf_coast",
        lng: (50.0, 56.05),
        lat: (22.0, 26.45),
        landward: Landward::South,
        coast: &[
            (50.0, 26.45),
            (50.2, 26.2),
            (50.4, 25.4),
            (50.75, 24.9),
            (50.85, 25.6),
            (51.0, 26.0),
            (51.25, 26.15),
            (51.5, 25.7),
            (51.6, 25.2),
            (51.65, 24.6),
            (52.0, 24.15),
            (52.6, 24.15),
            (53.5, 24.1),
            (54.3, 24.35),
            (54.8, 24.85),
            (55.2, 25.15),
            (55.5, 25.45),
            (55.95, 25.8),
            (56.05, 25.95),
        ],
        carveouts: &[
            Carveout {
                name: "jebel_ali_port_basin",
                lat: (24.98, 25.06),
                lng: (55.0, 55.12),
            },
            Carveout {
                name: "doha_port",
                lat: (25.27, 25.33),
                lng: (51.53, 51.58),
            },
        ],
    },
    CoastRule {
        name: "musandam_peninsula",
        lng: (56.05, 56.36),
        lat: (22.0, 26.45),
        landward: Landward::South,
        coast: &[
            (56.05, 25.95),
            (56.15, 26.25),
            (56.25, 26.4),
            (56.32, 26.3),
            (56.36, 25.0),
        ],
        carveouts: &[Carveout {
            name: "khasab_harbour",
            lat: (26.18, 26.22),
            lng: (56.23, 56.27),
        }],
    },
    CoastRule {
        name: "oman_batinah_coast",
        lng: (56.36, 59.8),
        lat: (22.0, 24.95),
        landward: Landward::South,
        coast: &[
            (56.36, 24.95),
            (56.5, 24.7),
            (56.75, 24.35),
            (57.5, 23.75),
            (58.2, 23.65),
            (58.6, 23.6),
            (59.0, 23.1),
            (59.5, 22.7),
            (59.8, 22.4),
        ],
        carveouts: &[],
    },
    CoastRule {
        name: "iran_gulf_coast",
        lng: (50.0, 57.3),
        lat: (26.45, 30.5),
        landward: Landward::North,
        coast: &[
            (50.0, 29.9),
            (50.8, 28.9),
            (51.5, 27.95),
            (52.1, 27.75),
            (52.6, 27.4),
            (53.5, 26.95),
            (54.3, 26.7),
            (54.9, 26.5),
            (55.5, 26.65),
            (56.0, 26.8),
            (56.3, 26.95),
            (56.6, 27.0),
            (57.0, 26.8),
            (57.3, 26.45),
        ],
        carveouts: &[],
    },
    CoastRule {
        name: "makran_coast",
        lng: (57.3, 61.5),
        lat: (24.95, 26.45),
        landward: Landward::North,
        coast: &[
            (57.3, 26.4),
            (57.77, 25.65),
            (58.5, 25.6),
            (59.5, 25.4),
            (60.6, 25.3),
            (61.5, 25.1),
        ],
        carveouts: &[],
    },
];

/// The rule whose box contains `point`, if any.
pub fn rule_for(point: Coordinate) -> Option<&'static CoastRule> {
    COAST_RULES.iter().find(|rule| rule.covers(point))
}

/// Whether `point` lies over a modeled landmass.
pub fn is_over_land(point: Coordinate) -> bool {
    rule_for(point)
        .map(|rule| rule.classifies_land(point))
        .unwrap_or(false)
}

/// Sample `samples` evenly spaced interior points between `a` and `b` and
/// report whether any of them is over land.
///
/// Endpoints are not sampled so a port sitting right on a coast line does
/// not poison every leg touching it. A landmass thinner than the sample
/// spacing can be missed; raise `samples` rather than trusting a coarse walk.
pub fn does_segment_cross_land(a: Coordinate, b: Coordinate, samples: usize) -> bool {
    let samples = samples.max(1);
    (1..=samples).any(|i| {
        let t = i as f64 / (samples + 1) as f64;
        is_over_land(interpolate(a, b, t))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_boxes_are_disjoint() {
        for (i, a) in COAST_RULES.iter().enumerate() {
            for b in COAST_RULES.iter().skip(i + 1) {
                let lng_overlap = a.lng.0 < b.lng.1 && b.lng.0 < a.lng.1;
                let lat_overlap = a.lat.0 < b.lat.1 && b.lat.0 < a.lat.1;
                assert!(
                    !(lng_overlap && lat_overlap),
                    "{} overlaps {}",
                    a.name,
                    b.name
                );
            }
        }
    }

    #[test]
    fn coast_knots_ascend_in_longitude() {
        for rule in COAST_RULES {
            for pair in rule.coast.windows(2) {
                assert!(pair[0].0 < pair[1].0, "{} knots out of order", rule.name);
            }
        }
    }

    #[test]
    fn open_gulf_is_water() {
        assert!(!is_over_land(Coordinate::new(26.0, 53.0)));
        assert!(!is_over_land(Coordinate::new(25.5, 54.0)));
        assert!(!is_over_land(Coordinate::new(24.8, 57.5)));
    }

    #[test]
    fn inland_points_are_land() {
        // UAE interior
        assert!(is_over_land(Coordinate::new(24.0, 55.0)));
        // Qatar
        assert!(is_over_land(Coordinate::new(25.3, 51.2)));
        // Musandam
        assert!(is_over_land(Coordinate::new(26.0, 56.2)));
        // Iran
        assert!(is_over_land(Coordinate::new(28.0, 54.0)));
        // Oman interior
        assert!(is_over_land(Coordinate::new(23.0, 57.5)));
    }

    #[test]
    fn carveouts_override_coast_line() {
        // Jebel Ali port basin sits landward of the simplified coast
        assert!(!is_over_land(Coordinate::new(25.01, 55.06)));
        // just south of the basin is land again
        assert!(is_over_land(Coordinate::new(24.95, 55.06)));
        assert!(!is_over_land(Coordinate::new(25.29, 51.55)));
    }

    #[test]
    fn ports_are_water() {
        for (lat, lng) in [(25.27, 55.27), (24.52, 54.38), (25.17, 56.40), (23.63, 58.57)] {
            assert!(!is_over_land(Coordinate::new(lat, lng)), "{lat},{lng}");
        }
    }

    #[test]
    fn outside_modeled_regions_is_water() {
        assert!(!is_over_land(Coordinate::new(0.0, 0.0)));
        assert!(!is_over_land(Coordinate::new(40.0, -70.0)));
    }

    #[test]
    fn segment_across_musandam_crosses_land() {
        let dubai = Coordinate::new(25.27, 55.27);
        let fujairah = Coordinate::new(25.17, 56.40);
        assert!(does_segment_cross_land(dubai, fujairah, DEFAULT_LAND_SAMPLES));
    }

    #[test]
    fn segment_across_the_date_line_is_sampled_the_short_way() {
        // a plain lerp between these would put its midpoint on (24.0, 55.0)
        let a = Coordinate::new(24.0, 146.0);
        let b = Coordinate::new(24.0, -36.0);
        assert!(is_over_land(Coordinate::new(24.0, 55.0)));
        assert!(!does_segment_cross_land(a, b, 1));
        assert!(!does_segment_cross_land(a, b, DEFAULT_LAND_SAMPLES));
    }

    #[test]
    fn segment_in_open_water_is_clear() {
        let a = Coordinate::new(26.0, 52.0);
        let b = Coordinate::new(26.0, 54.0);
        assert!(!does_segment_cross_land(a, b, DEFAULT_LAND_SAMPLES));
    }

    #[test]
    fn coastal_lat_interpolates_and_clamps() {
        let rule = rule_for(Coordinate::new(25.0, 55.0)).expect("rule");
        assert_eq!(rule.name, "arabian_peninsula_gulf_coast");
        assert!((rule.coastal_lat(55.0) - 25.0).abs() < 1e-9);
        assert_eq!(rule.coastal_lat(10.0), 26.45);
        assert_eq!(rule.coastal_lat(80.0), 25.95);
    }
}
