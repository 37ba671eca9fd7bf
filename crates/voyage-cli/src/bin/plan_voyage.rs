//! CLI tool to plan one voyage and print the comparison as JSON.
//!
//! Runs the optimizer in-process unless `--server` is given.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use voyage_cli::{load_request, load_zones, optimize_remote, summary_line, PriorityArg, VoyageSpec};
use voyage_core::RouteOptimizer;

/// Plan a hazard-aware voyage (direct vs weather-routed comparison)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON request file; overrides the voyage flags below
    #[arg(long)]
    request: Option<PathBuf>,

    /// Origin latitude
    #[arg(long, allow_hyphen_values = true)]
    from_lat: Option<f64>,

    /// Origin longitude
    #[arg(long, allow_hyphen_values = true)]
    from_lng: Option<f64>,

    /// Destination latitude
    #[arg(long, allow_hyphen_values = true)]
    to_lat: Option<f64>,

    /// Destination longitude
    #[arg(long, allow_hyphen_values = true)]
    to_lng: Option<f64>,

    #[arg(long)]
    from_name: Option<String>,

    #[arg(long)]
    to_name: Option<String>,

    /// Vessel type, e.g. tanker, container_ship, dhow
    #[arg(long, default_value = "general_cargo")]
    vessel_type: String,

    /// Service speed in knots
    #[arg(long, default_value_t = 12.0)]
    speed: f64,

    #[arg(long, default_value = "cli-vessel")]
    vessel_id: String,

    /// What the recommendation should favour
    #[arg(long, value_enum, ignore_case = true, default_value_t = PriorityArg::Balanced)]
    priority: PriorityArg,

    /// JSON file with a list of hazard zones
    #[arg(long)]
    zones: Option<PathBuf>,

    /// Voyage server URL; optimize remotely instead of in-process
    #[arg(long)]
    server: Option<String>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let zones = match &args.zones {
        Some(path) => Some(load_zones(path)?),
        None => None,
    };

    let mut request = match &args.request {
        Some(path) => load_request(path)?,
        None => {
            let (Some(from_lat), Some(from_lng), Some(to_lat), Some(to_lng)) =
                (args.from_lat, args.from_lng, args.to_lat, args.to_lng)
            else {
                bail!("either --request or all of --from-lat/--from-lng/--to-lat/--to-lng is needed");
            };
            VoyageSpec {
                from: (from_lat, from_lng),
                to: (to_lat, to_lng),
                from_name: args.from_name.clone(),
                to_name: args.to_name.clone(),
                vessel_id: args.vessel_id.clone(),
                vessel_name: args.vessel_id.clone(),
                vessel_type: args.vessel_type.clone(),
                speed_knots: args.speed,
                priority: args.priority.into(),
            }
            .into_request(None)
        }
    };
    if zones.is_some() {
        request.hazard_zones = zones;
    }

    let result = match &args.server {
        Some(url) => {
            tracing::info!(%url, "optimizing remotely");
            optimize_remote(url, &request)?
        }
        None => RouteOptimizer::default().optimize(&request, chrono::Utc::now())?,
    };

    eprintln!("{}", summary_line(&result));
    let output = if args.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{output}");
    Ok(())
}
