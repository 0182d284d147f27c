// src/stormglass/normalize.rs
//! Reshape raw StormGlass hours into complete `NormalizedPoint`s.
//!
//! An hour survives only if `time` and all seven fields resolve to a value.
//! Incomplete hours are dropped without error; this is the only place where
//! bad upstream data is tolerated instead of surfaced.

use crate::models::NormalizedPoint;
use crate::stormglass::types::{RawSourcePoint, SourceValues};

/// Fields requested from StormGlass, in the wire spelling.
pub const FORECAST_PARAMS: [&str; 7] = [
    "swellDirection",
    "swellHeight",
    "swellPeriod",
    "waveDirection",
    "waveHeight",
    "windDirection",
    "windSpeed",
];

/// Normalize a batch of raw hours. Output keeps input order.
pub fn normalize(raw: &[RawSourcePoint], sources: &[String]) -> Vec<NormalizedPoint> {
    raw.iter()
        .filter_map(|point| normalize_point(point, sources))
        .collect()
}

/// `None` when any required field is missing for every configured source.
pub fn normalize_point(raw: &RawSourcePoint, sources: &[String]) -> Option<NormalizedPoint> {
    let time = raw.time.as_deref().filter(|t| !t.is_empty())?;
    Some(NormalizedPoint {
        time: time.to_string(),
        swell_direction: pick(&raw.swell_direction, sources)?,
        swell_height: pick(&raw.swell_height, sources)?,
        swell_period: pick(&raw.swell_period, sources)?,
        wave_direction: pick(&raw.wave_direction, sources)?,
        wave_height: pick(&raw.wave_height, sources)?,
        wind_direction: pick(&raw.wind_direction, sources)?,
        wind_speed: pick(&raw.wind_speed, sources)?,
    })
}

/// First source in priority order with a non-null reading.
fn pick(values: &Option<SourceValues>, sources: &[String]) -> Option<f64> {
    let values = values.as_ref()?;
    sources
        .iter()
        .find_map(|s| values.get(s).copied().flatten())
}
