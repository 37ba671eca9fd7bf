//! Route assembly: merges origin, corridor, avoidance points and destination
//! into one measured route.

use chrono::{DateTime, Utc};

use crate::coastal::Corridor;
use crate::geodesy::distance_nm;
use crate::hazards::{compass_point, plan_avoidance, Avoidance};
use crate::landmass::is_over_land;
use crate::models::{
    Coordinate, HazardZone, NamedPoint, Route, RouteKind, Vessel, VesselRef, Waypoint,
    WaypointKind,
};
use crate::rules::OptimizerRules;

/// Consumption by vessel type, liters per nautical mile.
pub static FUEL_RATES: &[(&str, f64)] = &[
    ("tanker", 180.0),
    ("container_ship", 220.0),
    ("bulk_carrier", 150.0),
    ("lng_carrier", 200.0),
    ("ro_ro", 160.0),
    ("general_cargo", 110.0),
    ("offshore_supply", 45.0),
    ("tug", 30.0),
    ("crew_boat", 25.0),
    ("patrol_vessel", 35.0),
    ("dhow", 8.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelRateSource {
    /// Supplied on the vessel descriptor
    Vessel,
    /// Looked up in [`FUEL_RATES`]
    Table,
    /// Unknown type, fell back to the configured default
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelRate {
    pub liters_per_nm: f64,
    pub source: FuelRateSource,
}

/// Resolve the consumption rate for `vessel`. Type names are matched
/// case-insensitively with spaces and dashes treated as underscores.
pub fn fuel_rate_for(vessel: &Vessel, rules: &OptimizerRules) -> FuelRate {
    if let Some(rate) = vessel.fuel_consumption_rate_l_per_nm {
        return FuelRate {
            liters_per_nm: rate,
            source: FuelRateSource::Vessel,
        };
    }
    let key: String = vessel
        .vessel_type
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect();
    FUEL_RATES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, rate)| FuelRate {
            liters_per_nm: rate,
            source: FuelRateSource::Table,
        })
        .unwrap_or(FuelRate {
            liters_per_nm: rules.default_fuel_rate_l_per_nm,
            source: FuelRateSource::Default,
        })
}

/// An avoidance waypoint and where it ended up in the assembled route.
#[derive(Debug, Clone)]
pub struct PlacedAvoidance<'z> {
    pub avoidance: Avoidance<'z>,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct AssembledRoute<'z> {
    pub route: Route,
    pub avoidances: Vec<PlacedAvoidance<'z>>,
}

/// Per-request assembly context. Built once, used for both the direct and
/// the hazard-routed run so the two share speed, rate and timestamp.
#[derive(Debug, Clone)]
pub struct RouteAssembler<'a> {
    pub rules: &'a OptimizerRules,
    pub vessel: &'a Vessel,
    pub speed_knots: f64,
    pub fuel_rate: FuelRate,
    pub evaluated_at: DateTime<Utc>,
}

impl<'a> RouteAssembler<'a> {
    /// Assemble `[origin] + corridor + avoidance + [destination]`.
    ///
    /// With `zones` set to `None` no avoidance runs and the route is
    /// `direct`; otherwise avoidance runs on every leg of the corridor chain
    /// and the route is `weather_routed`. A zone is avoided at most once.
    pub fn assemble<'z>(
        &self,
        origin: &NamedPoint,
        destination: &NamedPoint,
        corridor: &Corridor,
        zones: Option<&[&'z HazardZone]>,
    ) -> AssembledRoute<'z> {
        let mut chain: Vec<(Waypoint, Option<Avoidance<'z>>)> =
            Vec::with_capacity(corridor.waypoints.len() + 2);

        let origin_name = origin.name.clone().or_else(|| Some("Origin".to_string()));
        chain.push((
            Waypoint::new(WaypointKind::Origin, origin.coordinate(), origin_name),
            None,
        ));
        for waypoint in &corridor.waypoints {
            chain.push((waypoint.clone(), None));
        }
        let destination_name = destination
            .name
            .clone()
            .or_else(|| Some("Destination".to_string()));
        let mut last = Waypoint::new(
            WaypointKind::Destination,
            destination.coordinate(),
            destination_name,
        );
        if let Some(note) = &corridor.destination_note {
            last.add_note(note);
        }
        chain.push((last, None));

        if let Some(zones) = zones {
            chain = self.insert_avoidance(chain, zones);
        }

        let route_kind = if zones.is_some() {
            RouteKind::WeatherRouted
        } else {
            RouteKind::Direct
        };

        let mut waypoints = Vec::with_capacity(chain.len());
        let mut avoidances = Vec::new();
        for (index, (mut waypoint, avoidance)) in chain.into_iter().enumerate() {
            waypoint.id = format!("wp-{index}");
            if let Some(avoidance) = avoidance {
                avoidances.push(PlacedAvoidance { avoidance, index });
            }
            waypoints.push(waypoint);
        }
        let total_distance_nm = measure(&mut waypoints);

        let estimated_fuel_liters = total_distance_nm * self.fuel_rate.liters_per_nm;
        let route = Route {
            id: format!(
                "{}-{}-{}",
                self.vessel.id,
                match route_kind {
                    RouteKind::Direct => "direct",
                    RouteKind::WeatherRouted => "weather",
                    RouteKind::Custom => "custom",
                },
                self.evaluated_at.timestamp_millis()
            ),
            vessel: VesselRef::from(self.vessel),
            origin: origin.clone(),
            destination: destination.clone(),
            waypoints,
            total_distance_nm,
            estimated_duration_hours: total_distance_nm / self.speed_knots,
            estimated_fuel_liters,
            estimated_cost_usd: estimated_fuel_liters * self.rules.fuel_price_usd_per_liter,
            created_at: self.evaluated_at,
            route_kind,
        };

        tracing::debug!(
            route_id = %route.id,
            waypoints = route.waypoints.len(),
            distance_nm = route.total_distance_nm,
            "assembled route"
        );
        AssembledRoute { route, avoidances }
    }

    fn insert_avoidance<'z>(
        &self,
        chain: Vec<(Waypoint, Option<Avoidance<'z>>)>,
        zones: &[&'z HazardZone],
    ) -> Vec<(Waypoint, Option<Avoidance<'z>>)> {
        let mut remaining: Vec<&'z HazardZone> = zones.to_vec();
        let mut out = Vec::with_capacity(chain.len() + zones.len());
        let mut iter = chain.into_iter().peekable();

        while let Some((waypoint, avoidance)) = iter.next() {
            let from = waypoint.coordinate();
            let next = iter.peek().map(|(next, _)| next.coordinate());
            out.push((waypoint, avoidance));

            let Some(to) = next else { break };
            if remaining.is_empty() {
                continue;
            }
            for planned in plan_avoidance(from, to, &remaining, self.rules) {
                remaining.retain(|zone| !std::ptr::eq(*zone, planned.zone));
                out.push((avoidance_waypoint(&planned), Some(planned)));
            }
        }
        out
    }
}

fn avoidance_waypoint(planned: &Avoidance<'_>) -> Waypoint {
    let zone = planned.zone;
    let mut waypoint = Waypoint::new(
        WaypointKind::WeatherAvoidance,
        planned.waypoint,
        Some(format!("Avoid {}", zone.id)),
    )
    .with_notes(format!(
        "passes {:.1} nm {} of {} {} zone centre",
        planned.clearance_nm,
        compass_point(planned.offset_bearing_deg),
        zone.severity.label(),
        zone.kind.label()
    ));
    if is_over_land(planned.waypoint) {
        tracing::warn!(
            zone = %zone.id,
            lat = planned.waypoint.lat,
            lng = planned.waypoint.lng,
            "avoidance waypoint falls over modeled land"
        );
        waypoint.add_note("avoidance point lies over modeled land; adjust manually");
    }
    waypoint
}

/// Fill in per-leg and cumulative distance and return the total.
fn measure(waypoints: &mut [Waypoint]) -> f64 {
    let mut cumulative = 0.0;
    let mut previous: Option<Coordinate> = None;
    for waypoint in waypoints.iter_mut() {
        let here = waypoint.coordinate();
        let leg = previous.map(|p| distance_nm(p, here)).unwrap_or(0.0);
        cumulative += leg;
        waypoint.distance_from_previous = Some(leg);
        waypoint.cumulative_distance = Some(cumulative);
        previous = Some(here);
    }
    cumulative
}
