// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod beaches;
pub mod cache;
pub mod config;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod rating;
pub mod stormglass;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::forecast::{ForecastProcessingError, ForecastService};
pub use crate::models::{Beach, BeachForecastPoint, GeoPosition, NormalizedPoint, TimeForecast};

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::beaches::DynBeachRepository;
use crate::cache::{DynPointCache, InMemoryPointCache};
use crate::config::ForecastConfig;
use crate::stormglass::{request::HttpPointsRequest, StormGlassClient};

/// Wire the production graph: reqwest StormGlass client behind an in-memory
/// point cache, feeding the forecast service.
pub fn build_state(cfg: &ForecastConfig, beaches: DynBeachRepository) -> Result<AppState> {
    let cache: DynPointCache = Arc::new(InMemoryPointCache::with_ttl(cfg.cache.ttl()));
    let request = HttpPointsRequest::new(&cfg.stormglass)?;
    let client = StormGlassClient::new(request, cache, cfg.stormglass.sources.clone());
    let forecast = ForecastService::new(Arc::new(client), cfg.wave_heights);

    info!(
        api_url = %cfg.stormglass.api_url,
        sources = ?cfg.stormglass.sources,
        cache_ttl_secs = cfg.cache.ttl_secs,
        "forecast service ready"
    );
    Ok(AppState::new(forecast, beaches))
}
