// tests/stormglass_http.rs
//
// Exercises HttpPointsRequest (reqwest) end to end against a local fake
// StormGlass bound to 127.0.0.1:0. No external network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use surf_forecast::cache::InMemoryPointCache;
use surf_forecast::config::StormGlassConfig;
use surf_forecast::models::NormalizedPoint;
use surf_forecast::stormglass::request::HttpPointsRequest;
use surf_forecast::stormglass::{ForecastSource, StormGlassClient, WeatherSourceError};

const LAT: f64 = -33.792726;
const LNG: f64 = 151.289824;

#[derive(Clone)]
struct Fake {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<(HashMap<String, String>, Option<String>)>>>,
}

async fn weather_point(
    State(fake): State<Fake>,
    Query(q): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    fake.seen.lock().unwrap().push((q, auth));
    (
        fake.status,
        [("content-type", "application/json")],
        fake.body.clone(),
    )
}

/// Start the fake and return its base url plus the request log.
async fn spawn_fake(
    status: StatusCode,
    body: &str,
) -> (String, Arc<Mutex<Vec<(HashMap<String, String>, Option<String>)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let fake = Fake {
        status,
        body: body.to_string(),
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/v2/weather/point", get(weather_point))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake stormglass");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server");
    });
    (format!("http://{addr}/v2"), seen)
}

fn client_for(api_url: &str) -> StormGlassClient<HttpPointsRequest> {
    let cfg = StormGlassConfig {
        api_url: api_url.to_string(),
        api_token: "test-token".into(),
        timeout_secs: 5,
        ..Default::default()
    };
    let req = HttpPointsRequest::new(&cfg).expect("http client");
    StormGlassClient::new(req, Arc::new(InMemoryPointCache::new()), cfg.sources)
}

#[tokio::test]
async fn fetches_and_normalizes_over_http() {
    let body = include_str!("fixtures/stormglass_weather_3_hours.json");
    let (url, seen) = spawn_fake(StatusCode::OK, body).await;
    let client = client_for(&url);

    let points = client.fetch_points(LAT, LNG).await.expect("fetch ok");
    let expected: Vec<NormalizedPoint> =
        serde_json::from_str(include_str!("fixtures/stormglass_normalized_3_hours.json")).unwrap();
    assert_eq!(points, expected);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (q, auth) = &seen[0];
    assert_eq!(q.get("lat").map(String::as_str), Some("-33.792726"));
    assert_eq!(q.get("lng").map(String::as_str), Some("151.289824"));
    assert_eq!(q.get("source").map(String::as_str), Some("noaa"));
    assert_eq!(
        q.get("params").map(String::as_str),
        Some("swellDirection,swellHeight,swellPeriod,waveDirection,waveHeight,windDirection,windSpeed")
    );
    assert_eq!(auth.as_deref(), Some("test-token"));
}

#[tokio::test]
async fn rate_limit_response_surfaces_code_and_body() {
    let (url, _) = spawn_fake(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{ "errors": ["Rate Limit reached"] }"#,
    )
    .await;
    let client = client_for(&url);

    let err = client.fetch_points(LAT, LNG).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"Unexpected error returned by the StormGlass service: Error: {"errors":["Rate Limit reached"]} Code: 429"#
    );
}

#[tokio::test]
async fn undecodable_success_body_is_a_transport_error() {
    let (url, _) = spawn_fake(StatusCode::OK, "not json").await;
    let client = client_for(&url);

    let err = client.fetch_points(LAT, LNG).await.unwrap_err();
    assert!(matches!(err, WeatherSourceError::Transport { .. }), "{err}");
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}/v2"));
    let err = client.fetch_points(LAT, LNG).await.unwrap_err();
    assert!(
        err.to_string()
            .starts_with("Unexpected error when trying to communicate to StormGlass: "),
        "{err}"
    );
}

#[tokio::test]
async fn error_body_that_is_not_json_is_passed_through() {
    let (url, _) = spawn_fake(StatusCode::BAD_GATEWAY, "upstream down").await;
    let client = client_for(&url);

    match client.fetch_points(LAT, LNG).await.unwrap_err() {
        WeatherSourceError::Remote { status, body, .. } => {
            assert_eq!(status, 502);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}
