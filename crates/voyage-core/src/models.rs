//! Core data models for voyage optimization.
//!
//! Field names follow the JSON wire contract (camelCase), enums serialize
//! as snake_case tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Origin or destination as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NamedPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    Origin,
    Destination,
    WeatherAvoidance,
    CoastalWaypoint,
    Waypoint,
}

/// A named, typed point along a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub kind: WaypointKind,
    /// Nautical miles from the previous waypoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_previous: Option<f64>,
    /// Nautical miles from the origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Waypoint {
    /// Create an unmeasured waypoint. Distances are filled in by the assembler.
    pub fn new(kind: WaypointKind, position: Coordinate, name: Option<String>) -> Self {
        Self {
            id: String::new(),
            name,
            lat: position.lat,
            lng: position.lng,
            kind,
            distance_from_previous: None,
            cumulative_distance: None,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Append a note, keeping any that are already present.
    pub fn add_note(&mut self, note: &str) {
        self.notes = Some(match self.notes.take() {
            Some(existing) => format!("{existing}; {note}"),
            None => note.to_string(),
        });
    }
}

// ========== HAZARD MODELS ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Storm,
    HighWind,
    Fog,
    HighSeas,
    Sandstorm,
}

impl HazardKind {
    pub fn label(&self) -> &'static str {
        match self {
            HazardKind::Storm => "storm",
            HazardKind::HighWind => "high wind",
            HazardKind::Fog => "fog",
            HazardKind::HighSeas => "high seas",
            HazardKind::Sandstorm => "sandstorm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardSeverity {
    Severe,
    Moderate,
    Advisory,
}

impl HazardSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            HazardSeverity::Severe => "severe",
            HazardSeverity::Moderate => "moderate",
            HazardSeverity::Advisory => "advisory",
        }
    }
}

/// How strongly a zone should be routed around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvoidancePolicy {
    Mandatory,
    Recommended,
    /// Never actively avoided
    Optional,
}

/// A circular region of elevated risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardZone {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: HazardKind,
    pub severity: HazardSeverity,
    pub center: Coordinate,
    pub radius_nm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_knots: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_height_m: Option<f64>,
    /// Inclusive start of validity
    pub valid_from: DateTime<Utc>,
    /// Exclusive end of validity
    pub valid_to: DateTime<Utc>,
    pub avoidance: AvoidancePolicy,
}

impl HazardZone {
    /// Whether the zone is in force at `at` (`[valid_from, valid_to)`).
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && at < self.valid_to
    }
}

// ========== VESSEL / REQUEST MODELS ==========

/// Vessel descriptor supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vessel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub vessel_type: String,
    pub speed_knots: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed_knots: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economic_speed_knots: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_consumption_rate_l_per_nm: Option<f64>,
}

/// Vessel reference carried on a computed route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub vessel_type: String,
}

impl From<&Vessel> for VesselRef {
    fn from(vessel: &Vessel) -> Self {
        Self {
            id: vessel.id.clone(),
            name: vessel.name.clone(),
            vessel_type: vessel.vessel_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Time,
    Fuel,
    Safety,
    #[default]
    Balanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub prioritize: Priority,
}

/// A single optimization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    pub vessel: Vessel,
    pub origin: NamedPoint,
    pub destination: NamedPoint,
    /// Omitted means "use live weather lookup, or none"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard_zones: Option<Vec<HazardZone>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
    /// Instant hazard validity is evaluated at; defaults to the caller's clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<Utc>>,
}

impl OptimizationRequest {
    pub fn priority(&self) -> Priority {
        self.preferences.map(|p| p.prioritize).unwrap_or_default()
    }
}

// ========== ROUTE / RESULT MODELS ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Direct,
    WeatherRouted,
    Custom,
}

/// An assembled route. Built once by the assembler and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub vessel: VesselRef,
    pub origin: NamedPoint,
    pub destination: NamedPoint,
    pub waypoints: Vec<Waypoint>,
    pub total_distance_nm: f64,
    pub estimated_duration_hours: f64,
    pub estimated_fuel_liters: f64,
    #[serde(rename = "estimatedCostUSD")]
    pub estimated_cost_usd: f64,
    pub created_at: DateTime<Utc>,
    pub route_kind: RouteKind,
}

/// One avoided hazard and what avoiding it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    pub zone_id: String,
    pub waypoint_id: String,
    pub added_distance_nm: f64,
    pub added_time_hours: f64,
    pub added_fuel_liters: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyImprovement {
    Significant,
    Moderate,
    Minor,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    UseOptimized,
    UseOriginal,
    ReviewRequired,
}

/// Where the hazard set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCoverage {
    /// Zones were part of the request
    Supplied,
    /// No zones supplied and no lookup performed; clear weather assumed
    NotRequested,
    /// Every live sample answered
    Live,
    /// Some live samples failed or timed out
    Partial,
    /// Live lookup failed entirely
    Unavailable,
}

impl WeatherCoverage {
    pub fn is_degraded(&self) -> bool {
        matches!(self, WeatherCoverage::Partial | WeatherCoverage::Unavailable)
    }
}

/// Aggregate deltas, measured as direct minus optimized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSummary {
    pub distance_delta_nm: f64,
    pub time_delta_hours: f64,
    pub fuel_delta_liters: f64,
    #[serde(rename = "costDeltaUSD")]
    pub cost_delta_usd: f64,
    pub zones_avoided: usize,
    pub safety_improvement: SafetyImprovement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub direct_route: Route,
    pub optimized_route: Route,
    pub avoided_zones: Vec<HazardZone>,
    pub optimizations: Vec<Optimization>,
    pub summary: OptimizationSummary,
    pub recommendation: Recommendation,
    pub justification: String,
    /// 0-100
    pub confidence: u8,
    pub weather_coverage: WeatherCoverage,
}
