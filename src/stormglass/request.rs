// src/stormglass/request.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

use crate::config::StormGlassConfig;
use crate::stormglass::normalize::FORECAST_PARAMS;
use crate::stormglass::types::{PointsQuery, PointsRequest, RawForecastResponse, RequestError};

/// `GET {api_url}/weather/point` over reqwest.
pub struct HttpPointsRequest {
    http: reqwest::Client,
    api_url: String,
    api_token: String,
}

impl HttpPointsRequest {
    pub fn new(cfg: &StormGlassConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("surf-forecast/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.timeout())
            .build()
            .context("building StormGlass http client")?;
        Ok(Self {
            http,
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
            api_token: cfg.api_token.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/weather/point", self.api_url)
    }
}

#[async_trait]
impl PointsRequest for HttpPointsRequest {
    async fn get_points(&self, query: PointsQuery<'_>) -> Result<RawForecastResponse, RequestError> {
        let params = [
            ("lat", query.lat.to_string()),
            ("lng", query.lng.to_string()),
            ("params", FORECAST_PARAMS.join(",")),
            ("source", query.sources.join(",")),
        ];

        let resp = self
            .http
            .get(self.endpoint())
            .header(AUTHORIZATION, &self.api_token)
            .query(&params)
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RequestError::Remote {
                status: status.as_u16(),
                body: remote_body(resp.text().await),
            });
        }

        resp.json::<RawForecastResponse>()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))
    }
}

/// Body of an error response; if it cannot be read, the read error stands in.
fn remote_body<E: std::fmt::Display>(read: Result<String, E>) -> String {
    match read {
        Ok(body) => compact_body(&body),
        Err(e) => format!("failed to read response body: {e}"),
    }
}

/// JSON bodies are re-serialized compactly; anything else is passed trimmed.
fn compact_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(v) => v.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
