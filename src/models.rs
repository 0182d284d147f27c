//! # Forecast Models
//! Request-scoped values flowing through the forecast pipeline.
//!
//! Field names serialize in camelCase so the JSON shape matches what API
//! consumers already read (`swellDirection`, `ownerId`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Facing orientation of a beach, also used as the cardinal bucket of a
/// direction in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeoPosition {
    N,
    E,
    S,
    W,
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GeoPosition::N => "N",
            GeoPosition::E => "E",
            GeoPosition::S => "S",
            GeoPosition::W => "W",
        };
        f.write_str(s)
    }
}

/// One timestamp's complete marine reading after source merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPoint {
    /// ISO-8601 timestamp exactly as reported by the source.
    pub time: String,
    pub swell_direction: f64,
    pub swell_height: f64,
    pub swell_period: f64,
    pub wave_direction: f64,
    pub wave_height: f64,
    pub wind_direction: f64,
    pub wind_speed: f64,
}

/// A beach registered by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beach {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub position: GeoPosition,
    pub owner_id: String,
}

/// A normalized point enriched with its beach identity and rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeachForecastPoint {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub position: GeoPosition,
    /// 1 (poor) ..= 5 (excellent)
    pub rating: u8,
    #[serde(flatten)]
    pub point: NormalizedPoint,
}

impl BeachForecastPoint {
    pub fn new(beach: &Beach, point: NormalizedPoint, rating: u8) -> Self {
        Self {
            lat: beach.lat,
            lng: beach.lng,
            name: beach.name.clone(),
            position: beach.position,
            rating,
            point,
        }
    }

    pub fn time(&self) -> &str {
        &self.point.time
    }
}

/// All beaches' forecast points sharing one timestamp, best rated first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeForecast {
    pub time: String,
    pub forecast: Vec<BeachForecastPoint>,
}
