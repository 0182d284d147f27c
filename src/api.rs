use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::beaches::DynBeachRepository;
use crate::error::ApiError;
use crate::forecast::ForecastService;
use crate::models::{Beach, GeoPosition, TimeForecast};

/// Caller identity. Authentication happens in front of this service.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub forecast: Arc<ForecastService>,
    pub beaches: DynBeachRepository,
}

impl AppState {
    pub fn new(forecast: ForecastService, beaches: DynBeachRepository) -> Self {
        Self {
            forecast: Arc::new(forecast),
            beaches,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/beaches", post(create_beach))
        .route("/forecast", get(forecast_for_user))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn user_id(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Missing user identity"))
}

/// Malformed or mistyped bodies are a 400 in the usual error shape.
fn validation_error(rejection: JsonRejection) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())
}

#[derive(Deserialize)]
struct NewBeach {
    name: String,
    lat: f64,
    lng: f64,
    position: GeoPosition,
}

async fn create_beach(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<NewBeach>, JsonRejection>,
) -> Result<(StatusCode, Json<Beach>), ApiError> {
    let owner_id = user_id(&headers)?;
    let Json(body) = body.map_err(validation_error)?;
    let beach = Beach {
        name: body.name,
        lat: body.lat,
        lng: body.lng,
        position: body.position,
        owner_id,
    };
    let saved = state.beaches.create(beach).await.map_err(|e| {
        error!(error = ?e, "failed to store beach");
        ApiError::internal()
    })?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn forecast_for_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TimeForecast>>, ApiError> {
    let owner_id = user_id(&headers)?;

    let beaches = state.beaches.find_by_owner(&owner_id).await.map_err(|e| {
        error!(error = ?e, "failed to load beaches");
        ApiError::internal()
    })?;

    match state.forecast.process_forecast_for_beaches(&beaches).await {
        Ok(forecast) => Ok(Json(forecast)),
        Err(e) => {
            error!(error = %e, beaches = beaches.len(), "forecast processing failed");
            Err(ApiError::internal())
        }
    }
}
