// src/config.rs
//! Startup configuration: StormGlass access, point cache TTL and the wave
//! height bands used by the rating engine.
//!
//! Loaded once from TOML (`config/forecast.toml` or `$FORECAST_CONFIG_PATH`),
//! then env overrides are applied. Values are immutable afterwards and passed
//! into constructors explicitly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

// --- env defaults & names ---
pub const DEFAULT_FORECAST_CONFIG_PATH: &str = "config/forecast.toml";
pub const DEFAULT_STORMGLASS_API_URL: &str = "https://api.stormglass.io/v2";
pub const DEFAULT_SOURCE: &str = "noaa";

pub const ENV_FORECAST_CONFIG_PATH: &str = "FORECAST_CONFIG_PATH";
pub const ENV_STORMGLASS_API_TOKEN: &str = "STORMGLASS_API_TOKEN";
pub const ENV_STORMGLASS_API_URL: &str = "STORMGLASS_API_URL";
pub const ENV_CACHE_TTL_SECS: &str = "FORECAST_CACHE_TTL_SECS";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ForecastConfig {
    #[serde(default)]
    pub stormglass: StormGlassConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub wave_heights: WaveHeights,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StormGlassConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Never read from TOML; comes from `$STORMGLASS_API_TOKEN`.
    #[serde(skip)]
    pub api_token: String,
    /// Source priority: for every field the first source with a value wins.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_STORMGLASS_API_URL.to_string()
}
fn default_sources() -> Vec<String> {
    vec![DEFAULT_SOURCE.to_string()]
}
fn default_connect_timeout_secs() -> u64 {
    4
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for StormGlassConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: String::new(),
            sources: default_sources(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StormGlassConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// 0 keeps entries until `clear_all`.
    #[serde(default)]
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }
}

/// Height interval in metres, `min` inclusive and `max` exclusive.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct HeightBand {
    pub min: f64,
    pub max: f64,
}

/// Swell height bands the rating engine scores against.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct WaveHeights {
    pub ankle_to_knee: HeightBand,
    pub waist_high: HeightBand,
    pub head_high: HeightBand,
}

impl Default for WaveHeights {
    fn default() -> Self {
        Self {
            ankle_to_knee: HeightBand { min: 0.3, max: 1.0 },
            waist_high: HeightBand { min: 1.0, max: 2.0 },
            head_high: HeightBand { min: 2.0, max: 2.5 },
        }
    }
}

impl ForecastConfig {
    /// Load from `$FORECAST_CONFIG_PATH` or `config/forecast.toml`.
    /// A missing file yields defaults; a malformed one is an error.
    pub fn from_toml() -> Result<Self> {
        let path = std::env::var(ENV_FORECAST_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FORECAST_CONFIG_PATH));

        let mut cfg = if path.exists() {
            let cfg = Self::from_path(&path)?;
            info!(path = %path.display(), "forecast config loaded");
            cfg
        } else {
            warn!(path = %path.display(), "forecast config not found, using defaults");
            Self::default()
        };

        cfg.apply_env();
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading forecast config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing forecast config at {}", path.display()))
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let mut cfg: ForecastConfig = toml::from_str(toml_str)?;
        cfg.sanitize();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(ENV_STORMGLASS_API_TOKEN) {
            self.stormglass.api_token = token.trim().to_string();
        }
        if let Ok(url) = std::env::var(ENV_STORMGLASS_API_URL) {
            if !url.trim().is_empty() {
                self.stormglass.api_url = url.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var(ENV_CACHE_TTL_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(ttl) => self.cache.ttl_secs = ttl,
                Err(e) => warn!(
                    value = %raw,
                    error = %e,
                    kept = self.cache.ttl_secs,
                    "{ENV_CACHE_TTL_SECS} is not a whole number of seconds; ignoring it"
                ),
            }
        }
        if self.stormglass.api_token.is_empty() {
            warn!("{ENV_STORMGLASS_API_TOKEN} is not set; StormGlass will reject requests");
        }
    }

    fn sanitize(&mut self) {
        // Keep priority order, drop blanks and repeats.
        let mut sources: Vec<String> = Vec::with_capacity(self.stormglass.sources.len());
        for s in &self.stormglass.sources {
            let t = s.trim();
            if !t.is_empty() && !sources.iter().any(|x| x == t) {
                sources.push(t.to_string());
            }
        }
        if sources.is_empty() {
            sources = default_sources();
        }
        self.stormglass.sources = sources;

        self.stormglass.api_url = self.stormglass.api_url.trim_end_matches('/').to_string();

        for band in [
            &mut self.wave_heights.ankle_to_knee,
            &mut self.wave_heights.waist_high,
            &mut self.wave_heights.head_high,
        ] {
            if band.min > band.max {
                std::mem::swap(&mut band.min, &mut band.max);
            }
        }
    }
}
