//! # Forecast Aggregator
//! Fetches points per beach, rates them, and merges everything into time
//! buckets ordered best-first.
//!
//! Beaches are fetched one after another so bucket order is the order in
//! which each `time` is first seen (beach by beach, point by point). Any
//! failure aborts the whole call; partial results are dropped.

use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use crate::config::WaveHeights;
use crate::models::{Beach, BeachForecastPoint, TimeForecast};
use crate::rating::BeachRating;
use crate::stormglass::DynForecastSource;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unexpected error during the forecast processing: {0}")]
pub struct ForecastProcessingError(pub String);

pub struct ForecastService {
    source: DynForecastSource,
    heights: WaveHeights,
}

impl ForecastService {
    pub fn new(source: DynForecastSource, heights: WaveHeights) -> Self {
        Self { source, heights }
    }

    pub async fn process_forecast_for_beaches(
        &self,
        beaches: &[Beach],
    ) -> Result<Vec<TimeForecast>, ForecastProcessingError> {
        let rated = self.calculate_rating(beaches).await?;
        let mut by_time = map_forecast_by_time(rated);
        for bucket in &mut by_time {
            // stable: ties keep insertion order
            bucket.forecast.sort_by(|a, b| b.rating.cmp(&a.rating));
        }
        Ok(by_time)
    }

    async fn calculate_rating(
        &self,
        beaches: &[Beach],
    ) -> Result<Vec<BeachForecastPoint>, ForecastProcessingError> {
        info!(
            beaches = beaches.len(),
            source = self.source.name(),
            "preparing forecast"
        );

        let mut out = Vec::new();
        for beach in beaches {
            let rating = BeachRating::for_beach(beach, self.heights);
            let points = self
                .source
                .fetch_points(beach.lat, beach.lng)
                .await
                .map_err(|e| ForecastProcessingError(e.to_string()))?;

            out.extend(points.into_iter().map(|p| {
                let r = rating.rate(&p);
                BeachForecastPoint::new(beach, p, r)
            }));
        }
        Ok(out)
    }
}

/// Group by exact `time` string, buckets in first-seen order.
pub fn map_forecast_by_time(points: Vec<BeachForecastPoint>) -> Vec<TimeForecast> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<TimeForecast> = Vec::new();

    for p in points {
        match index.get(p.time()).copied() {
            Some(i) => buckets[i].forecast.push(p),
            None => {
                index.insert(p.time().to_string(), buckets.len());
                buckets.push(TimeForecast {
                    time: p.time().to_string(),
                    forecast: vec![p],
                });
            }
        }
    }
    buckets
}
