// src/stormglass/types.rs
use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Per-source readings for one field, e.g. `{"noaa": 1.2, "sg": null}`.
pub type SourceValues = HashMap<String, Option<f64>>;

/// Body of `GET /weather/point`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawForecastResponse {
    #[serde(default)]
    pub hours: Vec<RawSourcePoint>,
}

/// One hourly reading as StormGlass reports it. Every field may be absent or
/// `null`; the normalizer decides what survives.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawSourcePoint {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub swell_direction: Option<SourceValues>,
    #[serde(default)]
    pub swell_height: Option<SourceValues>,
    #[serde(default)]
    pub swell_period: Option<SourceValues>,
    #[serde(default)]
    pub wave_direction: Option<SourceValues>,
    #[serde(default)]
    pub wave_height: Option<SourceValues>,
    #[serde(default)]
    pub wind_direction: Option<SourceValues>,
    #[serde(default)]
    pub wind_speed: Option<SourceValues>,
}

/// Query for one point request.
#[derive(Debug, Clone, Copy)]
pub struct PointsQuery<'a> {
    pub lat: f64,
    pub lng: f64,
    pub sources: &'a [String],
}

/// Outcome of a failed request, before it is worded for callers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    /// The request never got an answer (DNS, refused, timeout) or the answer
    /// could not be decoded.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("status {status}: {body}")]
    Remote { status: u16, body: String },
}

/// Low-level request seam: does the actual network call. Separated so the
/// client logic (cache, normalization, error wording) can be driven by a
/// stub in tests.
#[async_trait::async_trait]
pub trait PointsRequest: Send + Sync {
    async fn get_points(&self, query: PointsQuery<'_>) -> Result<RawForecastResponse, RequestError>;
}
