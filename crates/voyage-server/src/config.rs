//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Fetch live weather when a request omits `hazardZones`
    pub weather_enabled: bool,
    pub weather_url: String,
    pub marine_url: String,
    /// Per-fetch timeout, clamped to 3-5 seconds
    pub weather_timeout_s: u64,
    pub weather_samples: usize,
    pub weather_zone_radius_nm: f64,
    pub weather_validity_h: i64,
    pub weather_cache_ttl_s: u64,
    pub weather_cache_max_entries: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("VOYAGE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            weather_enabled: env::var("VOYAGE_WEATHER_ENABLED")
                .ok()
                .map(|s| parse_flag(&s))
                .unwrap_or(true),
            weather_url: env::var("VOYAGE_WEATHER_URL")
                .unwrap_or_else(|_| "https://api.open-meteo.com/v1/forecast".to_string()),
            marine_url: env::var("VOYAGE_MARINE_URL")
                .unwrap_or_else(|_| "https://marine-api.open-meteo.com/v1/marine".to_string()),
            weather_timeout_s: env::var("VOYAGE_WEATHER_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(4)
                .clamp(3, 5),
            weather_samples: env::var("VOYAGE_WEATHER_SAMPLES")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
            weather_zone_radius_nm: env::var("VOYAGE_WEATHER_ZONE_RADIUS_NM")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|r| r.is_finite() && *r > 0.0)
                .unwrap_or(25.0),
            weather_validity_h: env::var("VOYAGE_WEATHER_VALIDITY_H")
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|h| *h > 0)
                .unwrap_or(6),
            weather_cache_ttl_s: env::var("VOYAGE_WEATHER_CACHE_TTL_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
            weather_cache_max_entries: env::var("VOYAGE_WEATHER_CACHE_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(512),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" ON "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
