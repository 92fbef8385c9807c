//! Core data types shared by every source adapter.
//!
//! Every adapter converges on `Reading`: a single measurement with a unit
//! from the closed `Unit` vocabulary and an offset-aware timestamp.
//! This module contains no I/O.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::IngestError;

/// Provider-specific station identifier (USGS site number, Environment
/// Canada station code, DWR abbreviation). Opaque to the core.
pub type StationId = String;

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Closed set of units a reading may carry. Values are never converted
/// between members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Discharge, cubic feet per second (USGS, DWR).
    Cfs,
    /// Gage height, feet (USGS, DWR).
    Feet,
    /// Water level, meters (Environment Canada).
    Meter,
    /// Discharge, cubic meters per second (Environment Canada).
    Cms,
    /// Reserved; no adapter produces it yet.
    Temperature,
}

impl Unit {
    pub const ALL: [Unit; 5] = [
        Unit::Cfs,
        Unit::Feet,
        Unit::Meter,
        Unit::Cms,
        Unit::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Cfs => "cfs",
            Unit::Feet => "feet",
            Unit::Meter => "meter",
            Unit::Cms => "cms",
            Unit::Temperature => "temperature",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; anything outside the vocabulary is `InvalidUnit`.
impl FromStr for Unit {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Unit::ALL
            .into_iter()
            .find(|u| u.as_str() == lowered)
            .ok_or_else(|| IngestError::InvalidUnit(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// One normalized measurement.
///
/// Readings are only built once the value, unit and timestamp have all
/// parsed; there is no placeholder or partially-filled reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: Uuid,
    /// Provider-native magnitude in `unit`.
    pub value: f64,
    pub timestamp: DateTime<FixedOffset>,
    pub unit: Unit,
    pub station_id: StationId,
}

impl Reading {
    /// Builds a reading with a freshly generated id.
    pub fn new(
        value: f64,
        timestamp: DateTime<FixedOffset>,
        unit: Unit,
        station_id: impl Into<StationId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
            timestamp,
            unit,
            station_id: station_id.into(),
        }
    }

    pub fn timestamp_utc(&self) -> DateTime<Utc> {
        self.timestamp.with_timezone(&Utc)
    }
}

// ---------------------------------------------------------------------------
// Time periods
// ---------------------------------------------------------------------------

/// Lookback windows resolved against "now" when the request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredefinedPeriod {
    OneDay,
    SevenDays,
    ThirtyDays,
    OneYear,
}

impl PredefinedPeriod {
    pub const ALL: [PredefinedPeriod; 4] = [
        PredefinedPeriod::OneDay,
        PredefinedPeriod::SevenDays,
        PredefinedPeriod::ThirtyDays,
        PredefinedPeriod::OneYear,
    ];

    pub fn days(&self) -> i64 {
        match self {
            PredefinedPeriod::OneDay => 1,
            PredefinedPeriod::SevenDays => 7,
            PredefinedPeriod::ThirtyDays => 30,
            PredefinedPeriod::OneYear => 365,
        }
    }
}

/// Time range for sources that support server-side range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimePeriod {
    /// Explicit `[start, end)` range.
    Custom {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Predefined(PredefinedPeriod),
}

impl TimePeriod {
    /// Resolves to a concrete `(start, end)` pair relative to `now`.
    ///
    /// # Errors
    /// `InvalidUrl` when a custom range is empty or inverted.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>), IngestError> {
        match *self {
            TimePeriod::Custom { start, end } => {
                if start >= end {
                    return Err(IngestError::InvalidUrl(format!(
                        "time period start {} is not before end {}",
                        start.to_rfc3339(),
                        end.to_rfc3339()
                    )));
                }
                Ok((start, end))
            }
            TimePeriod::Predefined(p) => Ok((now - Duration::days(p.days()), now)),
        }
    }
}

impl From<PredefinedPeriod> for TimePeriod {
    fn from(p: PredefinedPeriod) -> Self {
        TimePeriod::Predefined(p)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
