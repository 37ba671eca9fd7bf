//! Live weather lookup along a voyage.
//!
//! Samples points along the track the vessel will sail (origin, any coastal
//! corridor, destination), fetches wind (Open-Meteo forecast) and wave height (Open-Meteo marine) for each one concurrently,
//! and turns readings above the alert thresholds into hazard zones. A failed
//! or timed-out sample only shrinks the hazard set.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::cache::TtlCache;
use crate::config::Config;
use voyage_core::geodesy::{bearing_deg, destination_point, distance_nm};
use voyage_core::{
    build_corridor, AvoidancePolicy, Coordinate, HazardKind, HazardSeverity, HazardZone,
    OptimizerRules, Waypoint, WeatherCoverage,
};

const STORM_WIND_KN: f64 = 48.0;
const GALE_WIND_KN: f64 = 34.0;
const STRONG_WIND_KN: f64 = 25.0;
const SEVERE_WAVE_M: f64 = 6.0;
const ROUGH_WAVE_M: f64 = 4.0;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather provider HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("weather request timed out after {0:?}")]
    Timeout(Duration),
    #[error("weather response missing current data")]
    MissingData,
}

/// Conditions observed at one sample point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub wind_knots: Option<f64>,
    pub wave_height_m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<ForecastCurrent>,
}

#[derive(Debug, Deserialize)]
struct ForecastCurrent {
    wind_speed_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MarineResponse {
    current: Option<MarineCurrent>,
}

#[derive(Debug, Deserialize)]
struct MarineCurrent {
    wave_height: Option<f64>,
}

/// Cache key: sample position rounded to 0.1 degree.
type CellKey = (i32, i32);

fn cell_key(point: Coordinate) -> CellKey {
    ((point.lat * 10.0).round() as i32, (point.lng * 10.0).round() as i32)
}

pub struct WeatherService {
    client: Client,
    config: Config,
    cache: TtlCache<CellKey, Reading>,
}

impl WeatherService {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.weather_timeout_s))
            .build()
            .unwrap_or_else(|_| Client::new());
        let cache = TtlCache::new(
            config.weather_cache_max_entries,
            Duration::from_secs(config.weather_cache_ttl_s),
        );
        Self {
            client,
            config,
            cache,
        }
    }

    /// Hazard zones derived from live conditions along `track`, valid from
    /// `at` for the configured window.
    pub async fn hazards_along(
        &self,
        track: &[Coordinate],
        at: DateTime<Utc>,
    ) -> (Vec<HazardZone>, WeatherCoverage) {
        let samples = sample_track(track, self.config.weather_samples);
        let fetches = samples.iter().map(|point| self.reading_at(*point));
        let results = join_all(fetches).await;

        let mut zones = Vec::new();
        let mut answered = 0;
        for (index, (point, result)) in samples.iter().zip(results).enumerate() {
            match result {
                Ok(reading) => {
                    answered += 1;
                    zones.extend(zones_from_reading(index, *point, reading, &self.config, at));
                }
                Err(err) => {
                    tracing::warn!(
                        sample = index,
                        lat = point.lat,
                        lng = point.lng,
                        "weather sample dropped: {}",
                        err
                    );
                }
            }
        }

        let coverage = coverage_for(answered, samples.len());
        tracing::info!(
            samples = samples.len(),
            answered,
            zones = zones.len(),
            coverage = ?coverage,
            "live weather lookup complete"
        );
        (zones, coverage)
    }

    async fn reading_at(&self, point: Coordinate) -> Result<Reading, WeatherError> {
        let key = cell_key(point);
        if let Some(cached) = self.cache.get_fresh(&key) {
            return Ok(cached);
        }

        let (wind, waves) = tokio::join!(self.fetch_wind(point), self.fetch_waves(point));
        // Wind is required; the marine model has no data near some coasts.
        let wind_knots = wind?;
        let wave_height_m = match waves {
            Ok(height) => height,
            Err(err) => {
                tracing::debug!(lat = point.lat, lng = point.lng, "no wave data: {}", err);
                None
            }
        };

        let reading = Reading {
            wind_knots,
            wave_height_m,
        };
        self.cache.insert(key, reading);
        Ok(reading)
    }

    async fn fetch_wind(&self, point: Coordinate) -> Result<Option<f64>, WeatherError> {
        let request = self.client.get(&self.config.weather_url).query(&[
            ("latitude", point.lat.to_string()),
            ("longitude", point.lng.to_string()),
            ("current", "wind_speed_10m".to_string()),
            ("wind_speed_unit", "kn".to_string()),
            ("timezone", "UTC".to_string()),
        ]);
        let payload: ForecastResponse = self.send_json(request).await?;
        let current = payload.current.ok_or(WeatherError::MissingData)?;
        Ok(current.wind_speed_10m)
    }

    async fn fetch_waves(&self, point: Coordinate) -> Result<Option<f64>, WeatherError> {
        let request = self.client.get(&self.config.marine_url).query(&[
            ("latitude", point.lat.to_string()),
            ("longitude", point.lng.to_string()),
            ("current", "wave_height".to_string()),
            ("timezone", "UTC".to_string()),
        ]);
        let payload: MarineResponse = self.send_json(request).await?;
        let current = payload.current.ok_or(WeatherError::MissingData)?;
        Ok(current.wave_height)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, WeatherError> {
        let limit = Duration::from_secs(self.config.weather_timeout_s);
        let response = tokio::time::timeout(limit, request.send())
            .await
            .map_err(|_| WeatherError::Timeout(limit))??;
        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status()));
        }
        let payload = tokio::time::timeout(limit, response.json::<T>())
            .await
            .map_err(|_| WeatherError::Timeout(limit))??;
        Ok(payload)
    }
}

/// The polyline the vessel sails: origin, the coastal corridor the optimizer
/// will build for this pair, destination.
pub fn planned_track(
    origin: Coordinate,
    destination: Coordinate,
    rules: &OptimizerRules,
) -> Vec<Coordinate> {
    let corridor = build_corridor(origin, destination, rules);
    std::iter::once(origin)
        .chain(corridor.waypoints.iter().map(Waypoint::coordinate))
        .chain(std::iter::once(destination))
        .collect()
}

/// Sample points along `track`: every vertex, plus great-circle points on
/// each leg so that no gap is wider than `1 / (count - 1)` of the total
/// length. A straight two-point track gives exactly `count` samples.
pub fn sample_track(track: &[Coordinate], count: usize) -> Vec<Coordinate> {
    let Some(&first) = track.first() else {
        return Vec::new();
    };
    let total: f64 = track.windows(2).map(|leg| distance_nm(leg[0], leg[1])).sum();
    if count <= 1 || total <= f64::EPSILON {
        return vec![first];
    }

    let spacing = total / (count - 1) as f64;
    let mut samples = vec![first];
    for leg in track.windows(2) {
        let (from, to) = (leg[0], leg[1]);
        let length = distance_nm(from, to);
        let steps = (length / spacing - 1e-9).ceil().max(1.0) as usize;
        let bearing = bearing_deg(from, to);
        for step in 1..steps {
            samples.push(destination_point(
                from,
                length * step as f64 / steps as f64,
                bearing,
            ));
        }
        samples.push(to);
    }
    samples
}

pub fn coverage_for(answered: usize, total: usize) -> WeatherCoverage {
    if total == 0 || answered == 0 {
        WeatherCoverage::Unavailable
    } else if answered < total {
        WeatherCoverage::Partial
    } else {
        WeatherCoverage::Live
    }
}

/// Convert one reading into zero, one or two zones centred on the sample.
pub fn zones_from_reading(
    index: usize,
    point: Coordinate,
    reading: Reading,
    config: &Config,
    at: DateTime<Utc>,
) -> Vec<HazardZone> {
    let valid_to = at + ChronoDuration::hours(config.weather_validity_h);
    let zone = |suffix: &str, kind, severity, avoidance| HazardZone {
        id: format!("wx-{index}-{suffix}"),
        kind,
        severity,
        center: point,
        radius_nm: config.weather_zone_radius_nm,
        wind_speed_knots: reading.wind_knots,
        wave_height_m: reading.wave_height_m,
        valid_from: at,
        valid_to,
        avoidance,
    };

    let mut zones = Vec::new();
    if let Some(wind) = reading.wind_knots {
        if wind >= STORM_WIND_KN {
            zones.push(zone(
                "wind",
                HazardKind::Storm,
                HazardSeverity::Severe,
                AvoidancePolicy::Mandatory,
            ));
        } else if wind >= GALE_WIND_KN {
            zones.push(zone(
                "wind",
                HazardKind::HighWind,
                HazardSeverity::Moderate,
                AvoidancePolicy::Recommended,
            ));
        } else if wind >= STRONG_WIND_KN {
            zones.push(zone(
                "wind",
                HazardKind::HighWind,
                HazardSeverity::Advisory,
                AvoidancePolicy::Optional,
            ));
        }
    }
    if let Some(waves) = reading.wave_height_m {
        if waves >= SEVERE_WAVE_M {
            zones.push(zone(
                "waves",
                HazardKind::HighSeas,
                HazardSeverity::Severe,
                AvoidancePolicy::Mandatory,
            ));
        } else if waves >= ROUGH_WAVE_M {
            zones.push(zone(
                "waves",
                HazardKind::HighSeas,
                HazardSeverity::Moderate,
                AvoidancePolicy::Recommended,
            ));
        }
    }
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> Config {
        let mut config = Config::from_env();
        config.weather_zone_radius_nm = 25.0;
        config.weather_validity_h = 6;
        config
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap()
    }

    fn reading(wind: Option<f64>, waves: Option<f64>) -> Reading {
        Reading {
            wind_knots: wind,
            wave_height_m: waves,
        }
    }

    #[test]
    fn calm_reading_gives_no_zones() {
        let point = Coordinate::new(26.0, 53.0);
        let calm = reading(Some(12.0), Some(1.0));
        assert!(zones_from_reading(0, point, calm, &config(), at()).is_empty());
        assert!(zones_from_reading(0, point, reading(None, None), &config(), at()).is_empty());
    }

    #[test]
    fn wind_thresholds() {
        let point = Coordinate::new(26.0, 53.0);
        let cases = [
            (
                50.0,
                HazardKind::Storm,
                HazardSeverity::Severe,
                AvoidancePolicy::Mandatory,
            ),
            (
                36.0,
                HazardKind::HighWind,
                HazardSeverity::Moderate,
                AvoidancePolicy::Recommended,
            ),
            (
                27.0,
                HazardKind::HighWind,
                HazardSeverity::Advisory,
                AvoidancePolicy::Optional,
            ),
        ];
        for (wind, kind, severity, avoidance) in cases {
            let zones = zones_from_reading(2, point, reading(Some(wind), None), &config(), at());
            assert_eq!(zones.len(), 1, "wind {wind}");
            assert_eq!(zones[0].kind, kind);
            assert_eq!(zones[0].severity, severity);
            assert_eq!(zones[0].avoidance, avoidance);
            assert_eq!(zones[0].id, "wx-2-wind");
        }
    }

    #[test]
    fn wind_and_waves_give_two_zones() {
        let point = Coordinate::new(24.5, 58.0);
        let zones = zones_from_reading(1, point, reading(Some(40.0), Some(6.5)), &config(), at());
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[1].kind, HazardKind::HighSeas);
        assert_eq!(zones[1].severity, HazardSeverity::Severe);
        assert!(zones.iter().all(|z| z.is_active_at(at())));
        assert!(zones
            .iter()
            .all(|z| !z.is_active_at(at() + ChronoDuration::hours(6))));
        assert!(zones.iter().all(|z| voyage_core::validate_zone(z).is_ok()));
    }

    #[test]
    fn samples_include_endpoints() {
        let a = Coordinate::new(26.0, 52.0);
        let b = Coordinate::new(26.0, 54.0);
        let points = sample_track(&[a, b], 5);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], a);
        assert_eq!(points[4], b);
        let spacing = distance_nm(points[0], points[1]);
        assert!((spacing - distance_nm(a, b) / 4.0).abs() < 1e-6);
    }

    #[test]
    fn corridor_track_is_sampled_at_every_transit_point() {
        let config = config();
        let dubai = Coordinate::new(25.27, 55.27);
        let fujairah = Coordinate::new(25.17, 56.40);
        let rules = OptimizerRules::default();
        let track = planned_track(dubai, fujairah, &rules);
        let corridor = build_corridor(dubai, fujairah, &rules);
        assert_eq!(track.len(), corridor.waypoints.len() + 2);
        assert!(corridor.waypoints.len() >= 3);

        let samples = sample_track(&track, 5);
        for waypoint in &corridor.waypoints {
            let nearest = samples
                .iter()
                .map(|s| distance_nm(*s, waypoint.coordinate()))
                .fold(f64::INFINITY, f64::min);
            assert!(
                nearest <= config.weather_zone_radius_nm,
                "{:?} is {nearest:.1} nm from the nearest sample",
                waypoint.name
            );
        }

        let total: f64 = track.windows(2).map(|leg| distance_nm(leg[0], leg[1])).sum();
        let widest = samples
            .windows(2)
            .map(|pair| distance_nm(pair[0], pair[1]))
            .fold(0.0, f64::max);
        assert!(widest <= total / 4.0 + 1e-6, "gap {widest:.1} nm");
    }

    #[test]
    fn open_water_track_is_the_direct_line() {
        let a = Coordinate::new(26.0, 52.0);
        let b = Coordinate::new(26.0, 54.0);
        assert_eq!(planned_track(a, b, &OptimizerRules::default()), vec![a, b]);
        assert_eq!(sample_track(&[], 5), Vec::<Coordinate>::new());
        assert_eq!(sample_track(&[a, b], 1), vec![a]);
    }

    #[test]
    fn coverage_levels() {
        assert_eq!(coverage_for(5, 5), WeatherCoverage::Live);
        assert_eq!(coverage_for(3, 5), WeatherCoverage::Partial);
        assert_eq!(coverage_for(0, 5), WeatherCoverage::Unavailable);
    }

    #[test]
    fn cache_key_rounds_to_tenth_of_degree() {
        assert_eq!(cell_key(Coordinate::new(26.04, 53.96)), (260, 540));
        assert_eq!(cell_key(Coordinate::new(-12.06, -0.04)), (-121, 0));
    }

    #[tokio::test]
    async fn unreachable_provider_degrades_to_unavailable() {
        let mut config = config();
        config.weather_url = "http://127.0.0.1:9/v1/forecast".to_string();
        config.marine_url = "http://127.0.0.1:9/v1/marine".to_string();
        config.weather_samples = 3;
        let service = WeatherService::new(config);
        let (zones, coverage) = service
            .hazards_along(&[Coordinate::new(26.0, 52.0), Coordinate::new(26.0, 54.0)], at())
            .await;
        assert!(zones.is_empty());
        assert_eq!(coverage, WeatherCoverage::Unavailable);
    }

    #[tokio::test]
    #[ignore]
    async fn live_open_meteo_lookup() {
        let service = WeatherService::new(Config::from_env());
        let track = [Coordinate::new(26.0, 52.0), Coordinate::new(26.0, 54.0)];
        let (_, coverage) = service.hazards_along(&track, Utc::now()).await;
        assert_ne!(coverage, WeatherCoverage::Unavailable);
    }
}
