//! Shared application state.

use voyage_core::{OptimizerRules, RouteOptimizer};

use crate::config::Config;
use crate::weather::WeatherService;

pub struct AppState {
    config: Config,
    optimizer: RouteOptimizer,
    weather: WeatherService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_rules(config, OptimizerRules::default())
    }

    pub fn with_rules(config: Config, rules: OptimizerRules) -> Self {
        Self {
            weather: WeatherService::new(config.clone()),
            optimizer: RouteOptimizer::new(rules),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn optimizer(&self) -> &RouteOptimizer {
        &self.optimizer
    }

    pub fn weather(&self) -> &WeatherService {
        &self.weather
    }
}
