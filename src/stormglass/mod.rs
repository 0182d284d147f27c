// src/stormglass/mod.rs
//! StormGlass weather source: cache lookup, one request, normalization.
//!
//! Failures are worded here and handed up unchanged; no retry, no partial
//! success.

pub mod normalize;
pub mod request;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::cache::{CacheKey, DynPointCache};
use crate::models::NormalizedPoint;
use crate::stormglass::types::{PointsQuery, PointsRequest, RequestError};

pub const SERVICE_NAME: &str = "StormGlass";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WeatherSourceError {
    #[error("Unexpected error when trying to communicate to {service}: {message}")]
    Transport { service: String, message: String },

    #[error("Unexpected error returned by the {service} service: Error: {body} Code: {status}")]
    Remote {
        service: String,
        status: u16,
        body: String,
    },
}

impl WeatherSourceError {
    pub fn from_request(service: &str, err: RequestError) -> Self {
        match err {
            RequestError::Transport(message) => Self::Transport {
                service: service.to_string(),
                message,
            },
            RequestError::Remote { status, body } => Self::Remote {
                service: service.to_string(),
                status,
                body,
            },
        }
    }
}

/// What the forecast aggregator needs from a weather source.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_points(&self, lat: f64, lng: f64)
        -> Result<Vec<NormalizedPoint>, WeatherSourceError>;
    fn name(&self) -> &'static str;
}

pub type DynForecastSource = Arc<dyn ForecastSource>;

/// One-time metrics registration (so series show up on /metrics).
/// Runs on the first fetch, after the recorder is installed.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "forecast_cache_hits_total",
            "Point lookups answered from the cache."
        );
        describe_counter!(
            "forecast_cache_misses_total",
            "Point lookups that went to the network."
        );
        describe_counter!(
            "forecast_source_errors_total",
            "Failed StormGlass requests."
        );
        describe_histogram!("forecast_fetch_ms", "StormGlass request time in milliseconds.");
    });
}

pub struct StormGlassClient<R: PointsRequest> {
    request: R,
    cache: DynPointCache,
    sources: Vec<String>,
}

impl<R: PointsRequest> StormGlassClient<R> {
    /// `sources` is the priority list; the first entry is the primary source.
    pub fn new(request: R, cache: DynPointCache, sources: Vec<String>) -> Self {
        Self {
            request,
            cache,
            sources,
        }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

#[async_trait]
impl<R: PointsRequest> ForecastSource for StormGlassClient<R> {
    async fn fetch_points(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<NormalizedPoint>, WeatherSourceError> {
        ensure_metrics_described();

        let key = CacheKey::new(lat, lng);
        if let Some(points) = self.cache.get(&key) {
            counter!("forecast_cache_hits_total").increment(1);
            return Ok(points);
        }
        counter!("forecast_cache_misses_total").increment(1);

        let t0 = std::time::Instant::now();
        let raw = self
            .request
            .get_points(PointsQuery {
                lat,
                lng,
                sources: &self.sources,
            })
            .await
            .map_err(|e| {
                counter!("forecast_source_errors_total").increment(1);
                WeatherSourceError::from_request(SERVICE_NAME, e)
            })?;
        histogram!("forecast_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        let points = normalize::normalize(&raw.hours, &self.sources);
        self.cache.set(key, points.clone());
        Ok(points)
    }

    fn name(&self) -> &'static str {
        SERVICE_NAME
    }
}
