//! Request validation errors.

use thiserror::Error;

/// Input rejected before any routing work is done.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Latitude outside [-90, 90], longitude outside [-180, 180], or non-finite
    #[error("invalid {field} coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate {
        field: String,
        lat: f64,
        lng: f64,
    },

    #[error("invalid {field}: {value} knots (must be a positive number)")]
    InvalidSpeed { field: &'static str, value: f64 },

    #[error("invalid fuel consumption rate: {0} L/nm (must be a positive number)")]
    InvalidFuelRate(f64),

    #[error("invalid hazard zone {id}: {reason}")]
    InvalidHazardZone { id: String, reason: String },
}
