//! Named maritime basins.
//!
//! Two points in different basins are separated by a strait or peninsula and
//! always need a corridor, even when the straight line happens to miss the
//! sampled land.

use crate::models::Coordinate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basin {
    ArabianGulf,
    GulfOfBahrain,
    GulfOfOman,
    ArabianSea,
}

impl Basin {
    pub fn name(&self) -> &'static str {
        match self {
            Basin::ArabianGulf => "Arabian Gulf",
            Basin::GulfOfBahrain => "Gulf of Bahrain",
            Basin::GulfOfOman => "Gulf of Oman",
            Basin::ArabianSea => "Arabian Sea",
        }
    }

    /// Latitude of the basin's open-water band, used to bias generated
    /// corridors away from the coasts.
    pub fn open_water_lat(&self) -> f64 {
        BASIN_AREAS
            .iter()
            .find(|area| area.basin == *self)
            .map(|area| area.open_water_lat)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct BasinArea {
    basin: Basin,
    /// `[min, max)`
    lat: (f64, f64),
    /// `[min, max)`
    lng: (f64, f64),
    open_water_lat: f64,
}

// First match wins: sub-basins come before the basin that encloses them.
static BASIN_AREAS: &[BasinArea] = &[
    BasinArea {
        basin: Basin::GulfOfBahrain,
        lat: (25.0, 26.0),
        lng: (50.3, 50.85),
        open_water_lat: 25.6,
    },
    BasinArea {
        basin: Basin::GulfOfOman,
        lat: (22.5, 26.8),
        lng: (56.36, 61.5),
        open_water_lat: 24.6,
    },
    BasinArea {
        basin: Basin::ArabianGulf,
        lat: (23.0, 30.5),
        lng: (47.5, 56.36),
        open_water_lat: 26.3,
    },
    BasinArea {
        basin: Basin::ArabianSea,
        lat: (5.0, 22.5),
        lng: (50.0, 70.0),
        open_water_lat: 19.0,
    },
];

/// Basin containing `point`, or `None` outside the modeled waters.
pub fn basin_of(point: Coordinate) -> Option<Basin> {
    BASIN_AREAS
        .iter()
        .find(|area| {
            point.lat >= area.lat.0
                && point.lat < area.lat.1
                && point.lng >= area.lng.0
                && point.lng < area.lng.1
        })
        .map(|area| area.basin)
}
