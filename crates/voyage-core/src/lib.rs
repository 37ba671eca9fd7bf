pub mod assembler;
pub mod basins;
pub mod coastal;
pub mod error;
pub mod geodesy;
pub mod hazards;
pub mod landmass;
pub mod models;
pub mod optimizer;
pub mod rules;

pub use assembler::{fuel_rate_for, FuelRate, FuelRateSource, RouteAssembler, FUEL_RATES};
pub use basins::{basin_of, Basin};
pub use coastal::{build_corridor, needs_corridor, Corridor, CorridorSource, PASSAGES};
pub use error::ValidationError;
pub use geodesy::{bearing_deg, destination_point, distance_nm, EARTH_RADIUS_NM};
pub use hazards::{active_zones, does_segment_intersect_zone, point_in_zone, validate_zone};
pub use landmass::{does_segment_cross_land, is_over_land, DEFAULT_LAND_SAMPLES};
pub use models::{
    AvoidancePolicy, Coordinate, HazardKind, HazardSeverity, HazardZone, NamedPoint,
    Optimization, OptimizationRequest, OptimizationResult, OptimizationSummary, Preferences,
    Priority, Recommendation, Route, RouteKind, SafetyImprovement, Vessel, VesselRef, Waypoint,
    WaypointKind, WeatherCoverage,
};
pub use optimizer::{classify_safety, preferred_route, recommend, validate_request, RouteOptimizer};
pub use rules::OptimizerRules;
