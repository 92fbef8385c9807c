//! Environment Canada hydrometric datamart adapter.
//!
//! Latest hourly readings are published as one static CSV per station:
//!   https://dd.weather.gc.ca/hydrometric/csv/{PROV}/hourly/{PROV}_{station}_hourly_hydrometric.csv
//!
//! A fetch walks: working directory created → downloaded → header
//! validated → rows parsed → directory removed. Any failure, creating the
//! directory included, comes back as `FetchFailed` for the station, and
//! only after the directory is gone.

use log::{error, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::SourceConfig;
use crate::error::{IngestError, Result};
use crate::http;
use crate::ingest::csv_pipeline::{self, ScopedDir};
use crate::model::Reading;
use crate::source::GaugeSource;

// ---------------------------------------------------------------------------
// Provinces
// ---------------------------------------------------------------------------

/// Province and territory codes used in the datamart path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Province {
    Ab,
    Bc,
    Mb,
    Nb,
    Nl,
    Ns,
    Nt,
    Nu,
    On,
    Pe,
    Qc,
    Sk,
    Yt,
}

impl Province {
    pub const ALL: [Province; 13] = [
        Province::Ab,
        Province::Bc,
        Province::Mb,
        Province::Nb,
        Province::Nl,
        Province::Ns,
        Province::Nt,
        Province::Nu,
        Province::On,
        Province::Pe,
        Province::Qc,
        Province::Sk,
        Province::Yt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Province::Ab => "ab",
            Province::Bc => "bc",
            Province::Mb => "mb",
            Province::Nb => "nb",
            Province::Nl => "nl",
            Province::Ns => "ns",
            Province::Nt => "nt",
            Province::Nu => "nu",
            Province::On => "on",
            Province::Pe => "pe",
            Province::Qc => "qc",
            Province::Sk => "sk",
            Province::Yt => "yt",
        }
    }

    /// Upper-case form used in datamart paths ("BC").
    pub fn code(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Province {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        Province::ALL
            .into_iter()
            .find(|p| p.as_str() == lowered)
            .ok_or_else(|| IngestError::InvalidUrl(format!("unknown province code '{}'", s)))
    }
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

pub fn build_csv_url(base_url: &str, province: Province, station: &str) -> Result<reqwest::Url> {
    let prov = province.code();
    let url = format!(
        "{}/{}/hourly/{}_{}_hourly_hydrometric.csv",
        base_url.trim_end_matches('/'),
        prov,
        prov,
        urlencoding::encode(station)
    );
    http::parse_url(&url)
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct EnvironmentCanada {
    client: Client,
    config: Arc<SourceConfig>,
}

impl EnvironmentCanada {
    pub fn new() -> Result<Self> {
        Self::with_config(SourceConfig::default())
    }

    pub fn with_config(config: SourceConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(&config)?,
            config: Arc::new(config),
        })
    }

    /// Everything between directory creation and cleanup.
    fn fetch_into(&self, dir: &ScopedDir, station: &str, province: Province) -> Result<Vec<Reading>> {
        let url = build_csv_url(&self.config.envcanada_base_url, province, station)?;
        let path = csv_pipeline::download_into(
            &self.client,
            &url,
            dir.path(),
            &self.config.temp_root(),
        )?;
        csv_pipeline::read_station_file(&path, station)
    }
}

impl GaugeSource for EnvironmentCanada {
    type Params = Province;
    const NAME: &'static str = "envcanada";

    fn max_workers(&self) -> usize {
        self.config.fanout_workers
    }

    fn fetch_one(&self, station: &str, province: &Province) -> Result<Vec<Reading>> {
        let outcome = ScopedDir::create(&self.config.temp_root()).and_then(|dir| {
            let result = self.fetch_into(&dir, station, *province);
            settle(station, result, dir.close())
        });

        outcome.map_err(|source| {
            error!("Failed to fetch data for {}: {}", station, source);
            IngestError::FetchFailed {
                station: station.to_string(),
                source: Box::new(source),
            }
        })
    }
}

/// Combines the fetch result with the working-directory cleanup result.
/// A pending fetch error always wins over a cleanup error.
fn settle(
    station: &str,
    result: Result<Vec<Reading>>,
    cleanup: io::Result<()>,
) -> Result<Vec<Reading>> {
    match (result, cleanup) {
        (Ok(readings), Ok(())) => Ok(readings),
        (Ok(_), Err(e)) => Err(IngestError::Io(e)),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup_err)) => {
            warn!(
                "Environment Canada {}: failed to remove working directory: {}",
                station, cleanup_err
            );
            Err(e)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
