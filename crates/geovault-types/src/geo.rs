//! Geometry descriptors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::GeovaultError;

/// Axis-aligned WGS84 bounding box of a dataset (`datasets.bbox_json`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Smallest box containing every `(lat, lon)` point, `None` for no points
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        points.into_iter().fold(None, |acc, (lat, lon)| {
            Some(match acc {
                None => Self {
                    min_lon: lon,
                    min_lat: lat,
                    max_lon: lon,
                    max_lat: lat,
                },
                Some(b) => Self {
                    min_lon: b.min_lon.min(lon),
                    min_lat: b.min_lat.min(lat),
                    max_lon: b.max_lon.max(lon),
                    max_lat: b.max_lat.max(lat),
                },
            })
        })
    }

    /// Check whether the point lies inside the box (edges inclusive)
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Validate a WGS84 coordinate pair
pub fn validate_coordinate(lat: f64, lon: f64) -> Result<(), GeovaultError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(GeovaultError::InvalidCoordinate { lat, lon })
    }
}

/// Free-form key/value labels attached to a place (OSM-style `amenity`, `cuisine`, ...).
///
/// Ordering carries no meaning; keys are kept sorted so the stored JSON is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceTags(pub BTreeMap<String, String>);

impl PlaceTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, replacing any previous value for the key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for PlaceTags {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
