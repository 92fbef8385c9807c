//! Source configuration - endpoints and client tuning.
//!
//! Defaults point at the public provider endpoints, so most callers use
//! `SourceConfig::default()`. An embedding application that keeps its
//! settings in TOML can hand them over with `from_toml_str` or
//! `load_config`; the crate never reads files or environment variables
//! on its own.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{IngestError, Result};

pub const DEFAULT_USGS_BASE_URL: &str = "https://waterservices.usgs.gov/nwis/iv/";
pub const DEFAULT_ENVCANADA_BASE_URL: &str = "https://dd.weather.gc.ca/hydrometric/csv";
pub const DEFAULT_DWR_BASE_URL: &str =
    "https://dwr.state.co.us/Rest/GET/api/v2/telemetrystations/telemetrystation/";

/// Endpoint and client settings shared by all adapters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub usgs_base_url: String,
    /// Root of the hydrometric CSV tree; province and station are appended.
    pub envcanada_base_url: String,
    pub dwr_base_url: String,

    /// Per-request HTTP timeout. Also bounds how long an abandoned
    /// fan-out request can keep running.
    pub request_timeout_secs: u64,
    pub user_agent: String,

    /// Upper bound on concurrent station fetches in `fetch_many`.
    pub fanout_workers: usize,

    /// Where CSV working directories are created (system temp dir if unset).
    pub temp_root: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            usgs_base_url: DEFAULT_USGS_BASE_URL.to_string(),
            envcanada_base_url: DEFAULT_ENVCANADA_BASE_URL.to_string(),
            dwr_base_url: DEFAULT_DWR_BASE_URL.to_string(),
            request_timeout_secs: 30,
            user_agent: format!("flowgauge/{}", env!("CARGO_PKG_VERSION")),
            fanout_workers: 8,
            temp_root: None,
        }
    }
}

impl SourceConfig {
    /// Parses a TOML document; missing keys fall back to defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SourceConfig =
            toml::from_str(contents).map_err(|e| IngestError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fanout_workers == 0 {
            return Err(IngestError::Config("fanout_workers must be at least 1".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(IngestError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        for (key, url) in [
            ("usgs_base_url", &self.usgs_base_url),
            ("envcanada_base_url", &self.envcanada_base_url),
            ("dwr_base_url", &self.dwr_base_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| IngestError::Config(format!("{} '{}': {}", key, url, e)))?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn temp_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Loads a `SourceConfig` from a TOML file chosen by the caller.
pub fn load_config(path: &Path) -> Result<SourceConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| IngestError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    SourceConfig::from_toml_str(&contents)
}
