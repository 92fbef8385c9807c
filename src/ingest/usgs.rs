//! USGS NWIS Instantaneous Values (IV) adapter.
//!
//! Handles URL construction and JSON response parsing for the USGS Water
//! Services IV endpoint:
//!   https://waterservices.usgs.gov/nwis/iv/
//!
//! The IV service returns WaterML rendered as JSON. Every point of every
//! requested series becomes one `Reading`; see `fixtures.rs` for annotated
//! examples of the response structure.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::SourceConfig;
use crate::error::{IngestError, Result};
use crate::http;
use crate::model::{Reading, TimePeriod, Unit};
use crate::source::GaugeSource;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// USGS parameter code for discharge (streamflow), in cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";

/// USGS parameter code for gage height (stage), in feet.
pub const PARAM_STAGE: &str = "00065";

/// Measured quantities that can be requested from the IV service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UsgsParameter {
    Height,
    Discharge,
}

impl UsgsParameter {
    pub fn code(&self) -> &'static str {
        match self {
            UsgsParameter::Height => PARAM_STAGE,
            UsgsParameter::Discharge => PARAM_DISCHARGE,
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            UsgsParameter::Height => Unit::Feet,
            UsgsParameter::Discharge => Unit::Cfs,
        }
    }

    /// Reverse lookup used when decoding `variableCode`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            PARAM_STAGE => Some(UsgsParameter::Height),
            PARAM_DISCHARGE => Some(UsgsParameter::Discharge),
            _ => None,
        }
    }
}

/// Request parameters for one IV fetch.
#[derive(Debug, Clone)]
pub struct UsgsParams {
    pub period: TimePeriod,
    pub parameters: BTreeSet<UsgsParameter>,
}

impl UsgsParams {
    pub fn new(period: impl Into<TimePeriod>, parameters: &[UsgsParameter]) -> Self {
        Self {
            period: period.into(),
            parameters: parameters.iter().copied().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde structures for WaterML JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IvResponse {
    value: ValueWrapper,
}

#[derive(Deserialize)]
struct ValueWrapper {
    #[serde(rename = "timeSeries")]
    time_series: Vec<TimeSeries>,
}

#[derive(Deserialize)]
struct TimeSeries {
    #[serde(rename = "sourceInfo")]
    source_info: SourceInfo,
    variable: Variable,
    values: Vec<Values>,
}

#[derive(Deserialize)]
struct SourceInfo {
    #[serde(rename = "siteCode")]
    site_code: Vec<CodeValue>,
}

#[derive(Deserialize)]
struct CodeValue {
    value: String,
}

#[derive(Deserialize)]
struct Variable {
    #[serde(rename = "variableCode")]
    variable_code: Vec<CodeValue>,
    #[serde(rename = "noDataValue")]
    no_data_value: Option<f64>,
}

#[derive(Deserialize)]
struct Values {
    value: Vec<ValueEntry>,
}

#[derive(Deserialize)]
struct ValueEntry {
    value: String, // USGS returns as string!
    #[serde(rename = "dateTime")]
    date_time: String,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds an IV request URL for one or more sites over a resolved time
/// range. Always requests JSON and all site statuses.
///
/// # Errors
/// `InvalidUrl` when no parameters are requested, the period is inverted,
/// or the result is not a valid URL.
pub fn build_iv_url(
    base_url: &str,
    sites: &[&str],
    params: &UsgsParams,
    now: DateTime<Utc>,
) -> Result<reqwest::Url> {
    if sites.is_empty() {
        return Err(IngestError::InvalidUrl("no USGS sites requested".to_string()));
    }
    if params.parameters.is_empty() {
        return Err(IngestError::InvalidUrl(
            "no USGS parameters requested".to_string(),
        ));
    }

    let (start, end) = params.period.resolve(now)?;

    let sites_param = sites
        .iter()
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join(",");
    let params_param = params
        .parameters
        .iter()
        .map(|p| p.code())
        .collect::<Vec<_>>()
        .join(",");

    let url = format!(
        "{}?format=json&sites={}&parameterCd={}&siteStatus=all&startDT={}&endDT={}",
        base_url,
        sites_param,
        params_param,
        start.format("%Y-%m-%dT%H:%M:%SZ"),
        end.format("%Y-%m-%dT%H:%M:%SZ")
    );

    http::parse_url(&url)
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses an IV JSON body into readings, one per data point, in series
/// then point order.
///
/// Every point becomes exactly one reading with the provider's value as
/// sent, including points equal to the series' `noDataValue` sentinel
/// (logged, left for the caller to filter).
///
/// # Errors
/// - `Decode` — malformed or unexpected JSON structure.
/// - `InvalidUnit` — a series carries a parameter code outside the table.
/// - `InvalidValue` — a point's value is not a finite number.
/// - `InvalidDate` — a point's `dateTime` is not an offset-aware ISO 8601 instant.
pub fn parse_iv_response(json: &str) -> Result<Vec<Reading>> {
    let response: IvResponse = serde_json::from_str(json)
        .map_err(|e| IngestError::Decode(format!("JSON deserialization failed: {}", e)))?;

    let mut readings = Vec::new();

    for series in response.value.time_series {
        let site_code = series
            .source_info
            .site_code
            .first()
            .ok_or_else(|| IngestError::Decode("Missing siteCode".to_string()))?
            .value
            .clone();

        let parameter_code = series
            .variable
            .variable_code
            .first()
            .ok_or_else(|| IngestError::Decode("Missing variableCode".to_string()))?
            .value
            .as_str();

        let unit = UsgsParameter::from_code(parameter_code)
            .ok_or_else(|| {
                IngestError::InvalidUnit(format!("USGS parameter code {}", parameter_code))
            })?
            .unit();

        let no_data_value = series.variable.no_data_value;

        for entry in series.values.iter().flat_map(|v| v.value.iter()) {
            let value: f64 = entry
                .value
                .trim()
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| IngestError::InvalidValue {
                    station: site_code.clone(),
                    value: entry.value.clone(),
                })?;

            if no_data_value.is_some_and(|sentinel| (value - sentinel).abs() < 0.1) {
                warn!(
                    "USGS {} {}: no-data sentinel {} at {}",
                    site_code, parameter_code, value, entry.date_time
                );
            }

            let timestamp = DateTime::parse_from_rfc3339(&entry.date_time).map_err(|_| {
                IngestError::InvalidDate {
                    station: site_code.clone(),
                    value: entry.date_time.clone(),
                }
            })?;

            readings.push(Reading::new(value, timestamp, unit, site_code.as_str()));
        }
    }

    Ok(readings)
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// USGS Water Services client.
#[derive(Clone)]
pub struct UsgsWaterServices {
    client: Client,
    config: Arc<SourceConfig>,
}

impl UsgsWaterServices {
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

impl GaugeSource for UsgsWaterServices {
    type Params = UsgsParams;
    const NAME: &'static str = "usgs";

    fn max_workers(&self) -> usize {
        self.config.fanout_workers
    }

    fn fetch_one(&self, station: &str, params: &UsgsParams) -> Result<Vec<Reading>> {
        let url = build_iv_url(&self.config.usgs_base_url, &[station], params, Utc::now())
            .map_err(|e| e.for_station(station))?;
        let body = http::get_text(&self.client, &url, station)?;
        let readings = parse_iv_response(&body).map_err(|e| e.for_station(station))?;
        debug!("USGS {}: decoded {} readings", station, readings.len());
        Ok(readings)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
