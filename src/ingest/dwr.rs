//! Colorado Division of Water Resources telemetry adapter.
//!
//! Current readings for a telemetry station, by abbreviation:
//!   https://dwr.state.co.us/Rest/GET/api/v2/telemetrystations/telemetrystation/?format=JSON&abbrev=PLACHECO
//!
//! Each record carries its own units and timestamp; one reading is
//! produced per record.

use chrono::{DateTime, FixedOffset};
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::SourceConfig;
use crate::error::{IngestError, Result};
use crate::http;
use crate::model::{Reading, Unit};
use crate::source::GaugeSource;

// ============================================================================
// DWR API Response Structures
// ============================================================================

/// Page wrapper. Only the first page is read; a station lookup by
/// abbreviation fits on one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TelemetryResponse {
    pub page_number: u32,
    pub page_count: u32,
    pub result_count: u32,
    pub result_date_time: String,
    pub result_list: Vec<TelemetryRecord>,
}

/// The fields of a telemetry record the reading model needs; the station
/// metadata DWR also sends (county, UTM, division, ...) is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    pub abbrev: String,
    /// e.g. "2024-07-29T09:15:00-06:00"
    pub meas_date_time: String,
    pub meas_value: f64,
    pub units: String,
}

// ============================================================================
// Request / response handling
// ============================================================================

pub fn build_telemetry_url(base_url: &str, abbrev: &str) -> Result<reqwest::Url> {
    let url = format!(
        "{}?format=JSON&abbrev={}",
        base_url,
        urlencoding::encode(abbrev)
    );
    http::parse_url(&url)
}

/// DWR stamps look like `yyyy-MM-ddTHH:mm:ss` plus an offset, written
/// either `-06:00` or `-0600`.
fn parse_meas_date_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// Maps every record to a reading, keeping the record's own abbreviation.
///
/// # Errors
/// - `Decode` — body is not a DWR page.
/// - `InvalidUnit` — `units` (lower-cased) is not in the unit vocabulary.
/// - `InvalidDate` — `measDateTime` does not parse.
pub fn parse_telemetry_response(json: &str) -> Result<Vec<Reading>> {
    let page: TelemetryResponse = serde_json::from_str(json)
        .map_err(|e| IngestError::Decode(format!("JSON deserialization failed: {}", e)))?;

    debug!(
        "DWR page {}/{}: {} results as of {}",
        page.page_number, page.page_count, page.result_count, page.result_date_time
    );

    page.result_list
        .into_iter()
        .map(|record| -> Result<Reading> {
            let unit: Unit = record.units.to_lowercase().parse()?;
            let timestamp = parse_meas_date_time(&record.meas_date_time).ok_or_else(|| {
                IngestError::InvalidDate {
                    station: record.abbrev.clone(),
                    value: record.meas_date_time.clone(),
                }
            })?;
            Ok(Reading::new(record.meas_value, timestamp, unit, record.abbrev))
        })
        .collect()
}

// ============================================================================
// Adapter
// ============================================================================

#[derive(Clone)]
pub struct DwrTelemetry {
    client: Client,
    config: Arc<SourceConfig>,
}

impl DwrTelemetry {
    pub fn new() -> Result<Self> {
        Self::with_config(SourceConfig::default())
    }

    pub fn with_config(config: SourceConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(&config)?,
            config: Arc::new(config),
        })
    }
}

impl GaugeSource for DwrTelemetry {
    type Params = ();
    const NAME: &'static str = "dwr";

    fn max_workers(&self) -> usize {
        self.config.fanout_workers
    }

    fn fetch_one(&self, station: &str, _params: &()) -> Result<Vec<Reading>> {
        let url = build_telemetry_url(&self.config.dwr_base_url, station)
            .map_err(|e| e.for_station(station))?;
        let body = http::get_text(&self.client, &url, station)?;
        parse_telemetry_response(&body).map_err(|e| e.for_station(station))
    }
}

// ============================================================================
// Tests
// ============================================================================
