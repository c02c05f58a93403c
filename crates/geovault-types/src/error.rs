//! Common error types

use thiserror::Error;

/// Validation errors for domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeovaultError {
    /// Place identifier is empty or longer than the column allows
    #[error("invalid place id: {0:?}")]
    InvalidPlaceId(String),

    /// Latitude or longitude outside of the WGS84 range
    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}
