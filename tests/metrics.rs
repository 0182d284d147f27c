// tests/metrics.rs
//
// The Prometheus recorder is process-global, so everything that needs it
// lives in this one test.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use surf_forecast::cache::InMemoryPointCache;
use surf_forecast::metrics::Metrics;
use surf_forecast::stormglass::types::{
    PointsQuery, PointsRequest, RawForecastResponse, RequestError,
};
use surf_forecast::stormglass::{ForecastSource, StormGlassClient};

struct FixtureRequest;

#[async_trait]
impl PointsRequest for FixtureRequest {
    async fn get_points(&self, _q: PointsQuery<'_>) -> Result<RawForecastResponse, RequestError> {
        Ok(serde_json::from_str(include_str!("fixtures/stormglass_weather_3_hours.json"))
            .expect("weather fixture"))
    }
}

#[tokio::test]
async fn metrics_endpoint_reports_cache_and_fetch_series() {
    // Client built before the recorder exists, as in a cold start.
    let client = StormGlassClient::new(
        FixtureRequest,
        Arc::new(InMemoryPointCache::new()),
        vec!["noaa".to_string()],
    );
    let metrics = Metrics::init(30).expect("install recorder");

    // miss, then hit
    client.fetch_points(-33.792726, 151.289824).await.unwrap();
    client.fetch_points(-33.792726, 151.289824).await.unwrap();

    let resp = metrics
        .router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "# HELP forecast_cache_hits_total",
        "# HELP forecast_cache_misses_total",
        "# HELP forecast_fetch_ms",
        "forecast_cache_hits_total 1",
        "forecast_cache_misses_total 1",
        "forecast_fetch_ms",
        "forecast_point_cache_ttl_secs 30",
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n{text}"
        );
    }
    assert!(!text.contains("forecast_source_errors_total 1"));
}
