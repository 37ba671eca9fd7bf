//! Tunable thresholds for route optimization.

use serde::{Deserialize, Serialize};

/// Configuration for corridor synthesis, hazard avoidance and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerRules {
    /// Avoidance waypoints sit this multiple of the zone radius from its centre
    pub hazard_buffer_factor: f64,
    /// Interpolated points checked per segment for zone membership
    pub hazard_check_points: usize,
    /// Interior samples per segment for land-crossing checks
    pub land_samples: usize,
    pub fuel_price_usd_per_liter: f64,
    /// Used when the vessel type is not in the rate table
    pub default_fuel_rate_l_per_nm: f64,
    /// Detours shorter than this are accepted without review
    pub negligible_detour_nm: f64,
    /// Generated corridor points are offset by this fraction of the leg
    pub corridor_offset_fraction: f64,
    pub corridor_offset_min_nm: f64,
    pub corridor_offset_max_nm: f64,
    /// Deflection angles tried in order when generating an offshore arc
    pub corridor_bearing_deltas_deg: Vec<f64>,
    /// How far (0-1) the arc midpoint is pulled toward open water
    pub open_water_bias: f64,
    pub confidence_base: u8,
    /// No active hazard zones at all
    pub confidence_clear: u8,
    /// Zones existed but none touched the route
    pub confidence_no_intersection: u8,
    pub confidence_significant: u8,
    pub degraded_weather_penalty: u8,
    pub unverified_corridor_penalty: u8,
}

impl Default for OptimizerRules {
    fn default() -> Self {
        Self {
            hazard_buffer_factor: 1.25,
            hazard_check_points: 10,
            land_samples: 20,
            fuel_price_usd_per_liter: 0.85,
            default_fuel_rate_l_per_nm: 60.0,
            negligible_detour_nm: 10.0,
            corridor_offset_fraction: 0.3,
            corridor_offset_min_nm: 10.0,
            corridor_offset_max_nm: 60.0,
            corridor_bearing_deltas_deg: vec![30.0, 50.0, 70.0],
            open_water_bias: 0.5,
            confidence_base: 80,
            confidence_clear: 95,
            confidence_no_intersection: 90,
            confidence_significant: 85,
            degraded_weather_penalty: 15,
            unverified_corridor_penalty: 10,
        }
    }
}
