//! Route comparison and recommendation.
//!
//! Builds a direct route (corridor only) and a hazard-routed route (corridor
//! plus avoidance), measures the difference, and decides which one to sail.

use chrono::{DateTime, Utc};

use crate::assembler::{fuel_rate_for, AssembledRoute, FuelRate, FuelRateSource, RouteAssembler};
use crate::coastal::{build_corridor, Corridor, CorridorSource};
use crate::error::ValidationError;
use crate::geodesy::{distance_nm, is_valid_coordinate};
use crate::hazards::{active_zones, compass_point, validate_zone};
use crate::models::{
    HazardSeverity, HazardZone, NamedPoint, Optimization, OptimizationRequest, OptimizationResult,
    OptimizationSummary, Priority, Recommendation, Route, SafetyImprovement, Vessel,
    WeatherCoverage,
};
use crate::rules::OptimizerRules;

/// Stateless optimizer. Safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct RouteOptimizer {
    rules: OptimizerRules,
}

impl RouteOptimizer {
    pub fn new(rules: OptimizerRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &OptimizerRules {
        &self.rules
    }

    /// Optimize using only the zones carried in the request. Omitted zones
    /// mean clear weather with coverage `not_requested`.
    ///
    /// `now` is used as the evaluation instant unless the request carries a
    /// `departureTime`.
    pub fn optimize(
        &self,
        request: &OptimizationRequest,
        now: DateTime<Utc>,
    ) -> Result<OptimizationResult, ValidationError> {
        match &request.hazard_zones {
            Some(zones) => self.optimize_with_zones(request, zones, WeatherCoverage::Supplied, now),
            None => self.optimize_with_zones(request, &[], WeatherCoverage::NotRequested, now),
        }
    }

    /// Optimize against an explicit zone set, e.g. one derived from a live
    /// weather lookup. `coverage` describes where the zones came from.
    pub fn optimize_with_zones(
        &self,
        request: &OptimizationRequest,
        zones: &[HazardZone],
        coverage: WeatherCoverage,
        now: DateTime<Utc>,
    ) -> Result<OptimizationResult, ValidationError> {
        validate_request(request)?;
        for zone in zones {
            validate_zone(zone)?;
        }

        let evaluated_at = request.departure_time.unwrap_or(now);
        let priority = request.priority();
        let vessel = &request.vessel;
        let speed_knots = select_speed(vessel, priority);
        let fuel_rate = fuel_rate_for(vessel, &self.rules);

        let active = active_zones(zones, evaluated_at);
        let corridor = build_corridor(
            request.origin.coordinate(),
            request.destination.coordinate(),
            &self.rules,
        );

        let assembler = RouteAssembler {
            rules: &self.rules,
            vessel,
            speed_knots,
            fuel_rate,
            evaluated_at,
        };
        let direct = assembler
            .assemble(&request.origin, &request.destination, &corridor, None)
            .route;

        let routed: Option<AssembledRoute<'_>> = if active.is_empty() {
            None
        } else {
            let assembled = assembler.assemble(
                &request.origin,
                &request.destination,
                &corridor,
                Some(active.as_slice()),
            );
            (!assembled.avoidances.is_empty()).then_some(assembled)
        };

        let (optimized, avoided_zones, optimizations) = match &routed {
            Some(assembled) => (
                assembled.route.clone(),
                assembled
                    .avoidances
                    .iter()
                    .map(|placed| placed.avoidance.zone.clone())
                    .collect::<Vec<_>>(),
                optimization_records(assembled, speed_knots, fuel_rate),
            ),
            None => (direct.clone(), Vec::new(), Vec::new()),
        };

        let safety_improvement = classify_safety(&avoided_zones);
        let summary = OptimizationSummary {
            distance_delta_nm: direct.total_distance_nm - optimized.total_distance_nm,
            time_delta_hours: direct.estimated_duration_hours - optimized.estimated_duration_hours,
            fuel_delta_liters: direct.estimated_fuel_liters - optimized.estimated_fuel_liters,
            cost_delta_usd: direct.estimated_cost_usd - optimized.estimated_cost_usd,
            zones_avoided: avoided_zones.len(),
            safety_improvement,
        };

        let (recommendation, reason) = recommend(&summary, priority, &corridor, &self.rules);
        let confidence = self.confidence(&summary, active.len(), coverage, &corridor);
        let justification = justification(&JustificationInput {
            reason,
            summary: &summary,
            avoided_zones: &avoided_zones,
            ignored_zones: zones.len() - active.len(),
            evaluated_at,
            vessel,
            fuel_rate,
            coverage,
            corridor: &corridor,
        });

        tracing::info!(
            vessel = %vessel.id,
            zones_active = active.len(),
            zones_avoided = summary.zones_avoided,
            recommendation = ?recommendation,
            confidence,
            "route optimization complete"
        );

        Ok(OptimizationResult {
            direct_route: direct,
            optimized_route: optimized,
            avoided_zones,
            optimizations,
            summary,
            recommendation,
            justification,
            confidence,
            weather_coverage: coverage,
        })
    }

    fn confidence(
        &self,
        summary: &OptimizationSummary,
        active_zones: usize,
        coverage: WeatherCoverage,
        corridor: &Corridor,
    ) -> u8 {
        let rules = &self.rules;
        let mut confidence = if active_zones == 0 {
            rules.confidence_clear
        } else if summary.zones_avoided == 0 {
            rules.confidence_no_intersection
        } else if summary.safety_improvement == SafetyImprovement::Significant {
            rules.confidence_significant
        } else {
            rules.confidence_base
        };
        if coverage.is_degraded() {
            confidence = confidence.saturating_sub(rules.degraded_weather_penalty);
        }
        if !corridor.is_verified() {
            confidence = confidence.saturating_sub(rules.unverified_corridor_penalty);
        }
        confidence.min(100)
    }
}

/// Reject requests with unusable coordinates, speeds or fuel rates.
pub fn validate_request(request: &OptimizationRequest) -> Result<(), ValidationError> {
    validate_point("origin", &request.origin)?;
    validate_point("destination", &request.destination)?;

    let vessel = &request.vessel;
    validate_speed("speedKnots", Some(vessel.speed_knots))?;
    validate_speed("maxSpeedKnots", vessel.max_speed_knots)?;
    validate_speed("economicSpeedKnots", vessel.economic_speed_knots)?;
    if let Some(rate) = vessel.fuel_consumption_rate_l_per_nm {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ValidationError::InvalidFuelRate(rate));
        }
    }
    Ok(())
}

fn validate_point(field: &str, point: &NamedPoint) -> Result<(), ValidationError> {
    if is_valid_coordinate(point.coordinate()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCoordinate {
            field: field.to_string(),
            lat: point.lat,
            lng: point.lng,
        })
    }
}

fn validate_speed(field: &'static str, speed: Option<f64>) -> Result<(), ValidationError> {
    match speed {
        Some(value) if !value.is_finite() || value <= 0.0 => {
            Err(ValidationError::InvalidSpeed { field, value })
        }
        _ => Ok(()),
    }
}

/// Speed used for duration estimates under the given priority.
pub fn select_speed(vessel: &Vessel, priority: Priority) -> f64 {
    match priority {
        Priority::Time => vessel.max_speed_knots.unwrap_or(vessel.speed_knots),
        Priority::Fuel => vessel.economic_speed_knots.unwrap_or(vessel.speed_knots),
        Priority::Safety | Priority::Balanced => vessel.speed_knots,
    }
}

pub fn classify_safety(avoided: &[HazardZone]) -> SafetyImprovement {
    if avoided.iter().any(|z| z.severity == HazardSeverity::Severe) {
        SafetyImprovement::Significant
    } else if avoided.iter().any(|z| z.severity == HazardSeverity::Moderate) {
        SafetyImprovement::Moderate
    } else if !avoided.is_empty() {
        SafetyImprovement::Minor
    } else {
        SafetyImprovement::None
    }
}

/// Ordered rule table; the first matching rule decides.
pub fn recommend(
    summary: &OptimizationSummary,
    priority: Priority,
    corridor: &Corridor,
    rules: &OptimizerRules,
) -> (Recommendation, &'static str) {
    if summary.zones_avoided == 0 {
        let reason = match corridor.source {
            CorridorSource::Direct => "No hazards on route.",
            _ => "Standard corridor, no hazards.",
        };
        return (Recommendation::UseOriginal, reason);
    }
    if summary.safety_improvement == SafetyImprovement::Significant {
        return (
            Recommendation::UseOptimized,
            "Optimized route avoids severe hazards.",
        );
    }
    if priority == Priority::Safety {
        return (
            Recommendation::UseOptimized,
            "Safety is prioritized, so the hazard-routed path is preferred.",
        );
    }
    let extra_distance_nm = -summary.distance_delta_nm;
    if priority == Priority::Time && extra_distance_nm > 0.0 {
        return (
            Recommendation::ReviewRequired,
            "Time is prioritized but avoiding hazards lengthens the voyage; operator review required.",
        );
    }
    if summary.distance_delta_nm.abs() < rules.negligible_detour_nm {
        return (
            Recommendation::UseOptimized,
            "Detour is negligible for the safety gained.",
        );
    }
    (
        Recommendation::ReviewRequired,
        "Detour is significant relative to the hazards avoided; operator review required.",
    )
}

fn optimization_records(
    assembled: &AssembledRoute<'_>,
    speed_knots: f64,
    fuel_rate: FuelRate,
) -> Vec<Optimization> {
    let waypoints = &assembled.route.waypoints;
    assembled
        .avoidances
        .iter()
        .filter_map(|placed| {
            let prev = waypoints.get(placed.index.checked_sub(1)?)?.coordinate();
            let here = waypoints.get(placed.index)?;
            let next = waypoints.get(placed.index + 1)?.coordinate();
            let added_distance_nm = distance_nm(prev, here.coordinate())
                + distance_nm(here.coordinate(), next)
                - distance_nm(prev, next);
            let added_time_hours = added_distance_nm / speed_knots;
            let zone = placed.avoidance.zone;

            let mut reasoning = format!(
                "{} {} zone {} ({:.0} nm radius) intersected the track",
                capitalize(zone.severity.label()),
                zone.kind.label(),
                zone.id,
                zone.radius_nm
            );
            if let Some(wind) = zone.wind_speed_knots {
                reasoning.push_str(&format!(", wind {wind:.0} kn"));
            }
            if let Some(waves) = zone.wave_height_m {
                reasoning.push_str(&format!(", waves {waves:.1} m"));
            }
            reasoning.push_str(&format!(
                "; rerouted {:.1} nm {} of its centre, adding {:.1} nm and {:.2} h.",
                placed.avoidance.clearance_nm,
                compass_point(placed.avoidance.offset_bearing_deg),
                added_distance_nm,
                added_time_hours
            ));

            Some(Optimization {
                zone_id: zone.id.clone(),
                waypoint_id: here.id.clone(),
                added_distance_nm,
                added_time_hours,
                added_fuel_liters: added_distance_nm * fuel_rate.liters_per_nm,
                reasoning,
            })
        })
        .collect()
}

struct JustificationInput<'a> {
    reason: &'static str,
    summary: &'a OptimizationSummary,
    avoided_zones: &'a [HazardZone],
    ignored_zones: usize,
    evaluated_at: DateTime<Utc>,
    vessel: &'a Vessel,
    fuel_rate: FuelRate,
    coverage: WeatherCoverage,
    corridor: &'a Corridor,
}

fn justification(input: &JustificationInput<'_>) -> String {
    let mut parts = vec![input.reason.to_string()];

    if !input.avoided_zones.is_empty() {
        let ids: Vec<&str> = input.avoided_zones.iter().map(|z| z.id.as_str()).collect();
        parts.push(format!(
            "Avoided {} hazard zone(s) ({}), changing distance by {:.1} nm and time by {:.2} h.",
            input.avoided_zones.len(),
            ids.join(", "),
            -input.summary.distance_delta_nm,
            -input.summary.time_delta_hours
        ));
    }
    if input.ignored_zones > 0 {
        parts.push(format!(
            "{} supplied zone(s) not in force at {} were ignored.",
            input.ignored_zones,
            input.evaluated_at.to_rfc3339()
        ));
    }

    match &input.corridor.source {
        CorridorSource::Direct => {}
        CorridorSource::TransitTable { from, to, passages } => {
            parts.push(format!(
                "Routed from the {} to the {} via {}.",
                from.name(),
                to.name(),
                passages.join(" and ")
            ));
        }
        CorridorSource::OffshoreArc { .. } => {
            parts.push("Routed via a generated offshore arc to stay clear of land.".to_string());
        }
    }
    if !input.corridor.is_verified() {
        parts.push(format!(
            "{} corridor leg(s) could not be verified land-free; check charts before sailing.",
            input.corridor.unverified_legs
        ));
    }

    match input.coverage {
        WeatherCoverage::Supplied => {}
        WeatherCoverage::NotRequested => parts.push(
            "No hazard zones supplied and no live lookup performed; clear weather assumed."
                .to_string(),
        ),
        WeatherCoverage::Live => {
            parts.push("Hazards derived from live weather samples along the route.".to_string())
        }
        WeatherCoverage::Partial => parts.push(
            "Live weather coverage was partial; some route samples returned no data.".to_string(),
        ),
        WeatherCoverage::Unavailable => parts.push(
            "Live weather data unavailable; clear weather assumed and confidence lowered."
                .to_string(),
        ),
    }

    if input.fuel_rate.source == FuelRateSource::Default {
        parts.push(format!(
            "Vessel type '{}' has no fuel-rate entry; default {:.0} L/nm assumed.",
            input.vessel.vessel_type, input.fuel_rate.liters_per_nm
        ));
    }

    parts.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The route the recommendation points at: the direct route for
/// `use_original`, otherwise the optimized one.
pub fn preferred_route(result: &OptimizationResult) -> &Route {
    match result.recommendation {
        Recommendation::UseOriginal => &result.direct_route,
        Recommendation::UseOptimized | Recommendation::ReviewRequired => &result.optimized_route,
    }
}
