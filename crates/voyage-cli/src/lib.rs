//! Voyage CLI - command line tools for the voyage planner.
//!
//! - plan_voyage: run one optimization locally or against a server

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::path::Path;

use voyage_core::{
    HazardZone, NamedPoint, OptimizationRequest, OptimizationResult, Preferences, Priority,
    Vessel,
};

/// Voyage described on the command line instead of a request file.
#[derive(Debug, Clone, PartialEq)]
pub struct VoyageSpec {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub from_name: Option<String>,
    pub to_name: Option<String>,
    pub vessel_id: String,
    pub vessel_name: String,
    pub vessel_type: String,
    pub speed_knots: f64,
    pub priority: Priority,
}

impl VoyageSpec {
    pub fn into_request(self, hazard_zones: Option<Vec<HazardZone>>) -> OptimizationRequest {
        OptimizationRequest {
            vessel: Vessel {
                id: self.vessel_id,
                name: self.vessel_name,
                vessel_type: self.vessel_type,
                speed_knots: self.speed_knots,
                max_speed_knots: None,
                economic_speed_knots: None,
                fuel_consumption_rate_l_per_nm: None,
            },
            origin: NamedPoint {
                lat: self.from.0,
                lng: self.from.1,
                name: self.from_name,
            },
            destination: NamedPoint {
                lat: self.to.0,
                lng: self.to.1,
                name: self.to_name,
            },
            hazard_zones,
            preferences: Some(Preferences {
                prioritize: self.priority,
            }),
            departure_time: None,
        }
    }
}

/// `--priority` values, validated and listed in `--help` by clap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    /// Fastest passage, uses the vessel's max speed when known
    Time,
    /// Cheapest passage, uses the economic speed when known
    Fuel,
    /// Prefer the hazard-routed path whenever anything is avoided
    Safety,
    Balanced,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Time => Priority::Time,
            PriorityArg::Fuel => Priority::Fuel,
            PriorityArg::Safety => Priority::Safety,
            PriorityArg::Balanced => Priority::Balanced,
        }
    }
}

pub fn load_request(path: &Path) -> Result<OptimizationRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading request file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing request file {}", path.display()))
}

pub fn load_zones(path: &Path) -> Result<Vec<HazardZone>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading hazard zone file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing hazard zone file {}", path.display()))
}

/// POST the request to a running voyage server.
pub fn optimize_remote(base_url: &str, request: &OptimizationRequest) -> Result<OptimizationResult> {
    let url = format!("{}/v1/routes/optimize", base_url.trim_end_matches('/'));
    let response = reqwest::blocking::Client::new()
        .post(&url)
        .json(request)
        .send()
        .with_context(|| format!("sending request to {url}"))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        bail!("server returned {status}: {body}");
    }
    response.json().context("decoding optimization result")
}

/// One-line human summary printed to stderr next to the JSON result.
pub fn summary_line(result: &OptimizationResult) -> String {
    let route = voyage_core::preferred_route(result);
    format!(
        "{:?}: {:.1} nm, {:.1} h, {:.0} L, ${:.0} ({} zone(s) avoided, confidence {})",
        result.recommendation,
        route.total_distance_nm,
        route.estimated_duration_hours,
        route.estimated_fuel_liters,
        route.estimated_cost_usd,
        result.summary.zones_avoided,
        result.confidence
    )
}
