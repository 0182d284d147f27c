//! Surf Forecast Service: binary entrypoint.
//! Boots the Axum HTTP server, wiring config, the StormGlass client, and routes.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use surf_forecast::beaches::InMemoryBeachRepository;
use surf_forecast::config::ForecastConfig;
use surf_forecast::metrics::Metrics;

/// Install our subscriber unless the runtime already did.
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("surf_forecast=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = ForecastConfig::from_toml()?;
    // Recorder first, so everything built below reports into it.
    let metrics = Metrics::init(cfg.cache.ttl_secs)?;

    let beaches = Arc::new(InMemoryBeachRepository::new());
    let state = surf_forecast::build_state(&cfg, beaches)?;

    let router = surf_forecast::router(state).merge(metrics.router());

    Ok(router.into())
}
