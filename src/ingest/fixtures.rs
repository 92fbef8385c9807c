//! Test fixtures: representative payloads from the three providers.
//!
//! These are structurally complete but truncated to the minimum needed to
//! exercise the parsers.
//!
//! USGS IV response shape (WaterML as JSON):
//!   response.value.timeSeries[]
//!     .sourceInfo.siteCode[0].value  — site number (string)
//!     .variable.variableCode[0].value — parameter code (string)
//!     .variable.noDataValue          — sentinel for missing data (-999999)
//!     .values[0].value[]
//!       .value     — the measurement as a STRING (not a number)
//!       .dateTime  — ISO 8601 with offset
//!
//! Environment Canada hourly CSV:
//!   header row, then one row per station per interval;
//!   col 0 station, col 1 ISO 8601 instant, col 2 level (m), col 6 discharge (cms)
//!
//! DWR telemetry: PascalCase page wrapper around camelCase `ResultList` records.

// ---------------------------------------------------------------------------
// USGS
// ---------------------------------------------------------------------------

/// Animas River at Durango (09359500): three discharge points, two stage points.
#[cfg(test)]
pub(crate) fn fixture_animas_two_series_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "ANIMAS RIVER AT DURANGO, CO",
              "siteCode": [{ "value": "09359500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "variableName": "Streamflow, ft&#179;/s",
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "412", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-06:00" },
                { "value": "418", "qualifiers": ["P"], "dateTime": "2024-05-01T12:15:00.000-06:00" },
                { "value": "425", "qualifiers": ["P"], "dateTime": "2024-05-01T12:30:00.000-06:00" }
              ]
            }]
          },
          {
            "sourceInfo": {
              "siteName": "ANIMAS RIVER AT DURANGO, CO",
              "siteCode": [{ "value": "09359500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "variableName": "Gage height, ft",
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "3.12", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-06:00" },
                { "value": "3.15", "qualifiers": ["P"], "dateTime": "2024-05-01T12:15:00.000-06:00" }
              ]
            }]
          }
        ]
      }
    }"#
}

/// Two sites in one response: Peoria pool stage and Chillicothe discharge.
#[cfg(test)]
pub(crate) fn fixture_multi_site_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": { "siteCode": [{ "value": "05567500" }] },
            "variable": { "variableCode": [{ "value": "00065" }], "noDataValue": -999999.0 },
            "values": [{ "value": [
              { "value": "14.85", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-05:00" }
            ]}]
          },
          {
            "sourceInfo": { "siteCode": [{ "value": "05568000" }] },
            "variable": { "variableCode": [{ "value": "00060" }], "noDataValue": -999999.0 },
            "values": [{ "value": [
              { "value": "39100", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-05:00" }
            ]}]
          }
        ]
      }
    }"#
}

/// USGS writes "-999999" with a real timestamp when the gauge had no data.
#[cfg(test)]
pub(crate) fn fixture_sentinel_no_data_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [{
          "sourceInfo": { "siteCode": [{ "value": "05567500" }] },
          "variable": { "variableCode": [{ "value": "00065" }], "noDataValue": -999999.0 },
          "values": [{ "value": [
            { "value": "-999999", "qualifiers": ["P", "Eqp"], "dateTime": "2024-05-01T11:45:00.000-05:00" },
            { "value": "14.85", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-05:00" }
          ]}]
        }]
      }
    }"#
}

/// Water temperature (00010) has no entry in the parameter table.
#[cfg(test)]
pub(crate) fn fixture_unknown_parameter_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [{
          "sourceInfo": { "siteCode": [{ "value": "09359500" }] },
          "variable": { "variableCode": [{ "value": "00010" }], "noDataValue": -999999.0 },
          "values": [{ "value": [
            { "value": "11.2", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-06:00" }
          ]}]
        }]
      }
    }"#
}

/// Ice-affected gauges report "Ice" instead of a number.
#[cfg(test)]
pub(crate) fn fixture_bad_value_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [{
          "sourceInfo": { "siteCode": [{ "value": "09359500" }] },
          "variable": { "variableCode": [{ "value": "00060" }], "noDataValue": -999999.0 },
          "values": [{ "value": [
            { "value": "412", "qualifiers": ["P"], "dateTime": "2024-01-01T12:00:00.000-07:00" },
            { "value": "Ice", "qualifiers": ["P"], "dateTime": "2024-01-01T12:15:00.000-07:00" }
          ]}]
        }]
      }
    }"#
}

#[cfg(test)]
pub(crate) fn fixture_bad_timestamp_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [{
          "sourceInfo": { "siteCode": [{ "value": "09359500" }] },
          "variable": { "variableCode": [{ "value": "00060" }], "noDataValue": -999999.0 },
          "values": [{ "value": [
            { "value": "412", "qualifiers": ["P"], "dateTime": "2024-05-01 12:00" }
          ]}]
        }]
      }
    }"#
}

// ---------------------------------------------------------------------------
// Environment Canada
// ---------------------------------------------------------------------------

/// BC hourly file: two rows for 07EA004, one for a neighbouring station.
#[cfg(test)]
pub(crate) fn fixture_bc_hourly_csv() -> &'static str {
    "ID,Date,Water Level / Niveau d'eau (m),Grade,Symbol / Symbole,QA/QC,Discharge / Débit (cms),Grade,Symbol / Symbole,QA/QC\n\
07EA004,2024-06-08T00:00:00-08:00,1.234,,,1,45.6,,,1\n\
08MF005,2024-06-08T00:00:00-08:00,5.010,,,1,3120,,,1\n\
07EA004,2024-06-08T01:00:00-08:00,1.240,,,1,46.1,,,1\n"
}

/// What the datamart serves with HTTP 200 for a station it does not know.
#[cfg(test)]
pub(crate) fn fixture_html_not_found() -> &'static str {
    "<!DOCTYPE html>\n<html><head><title>404 Not Found</title></head>\n<body><h1>Not Found</h1></body></html>\n"
}

// ---------------------------------------------------------------------------
// Colorado DWR
// ---------------------------------------------------------------------------

/// One telemetry record for PLACHECO (Platte River near Cheesman).
#[cfg(test)]
pub(crate) fn fixture_dwr_telemetry_json() -> &'static str {
    r#"{
      "PageNumber": 1,
      "PageCount": 1,
      "ResultCount": 2,
      "ResultDateTime": "2024-07-29T09:25:13.12-06:00",
      "ResultList": [
        {
          "division": 1,
          "waterDistrict": 8,
          "county": "JEFFERSON",
          "stationName": "SOUTH PLATTE RIVER BELOW CHEESMAN RESERVOIR",
          "dataSourceAbbrev": "DWR",
          "dataSource": "Colorado's Surface Water Conditions",
          "waterSource": "SOUTH PLATTE RIVER",
          "gnisId": "00205130",
          "streamMile": 332.6,
          "abbrev": "PLACHECO",
          "usgsStationId": "06701900",
          "stationStatus": "Active",
          "stationType": "Stream",
          "structureType": "Stream Gage",
          "measDateTime": "2024-07-29T09:15:00-06:00",
          "parameter": "DISCHRG",
          "stage": 2.41,
          "measValue": 215.0,
          "units": "CFS",
          "flagA": "P",
          "flagB": null,
          "contrArea": null,
          "drainArea": null,
          "huc10": "1019000205",
          "utmX": 479842.0,
          "utmY": 4346541.0,
          "latitude": 39.209728,
          "longitude": -105.233521,
          "locationAccuracy": "Digitized",
          "wdid": "0800653",
          "modified": "2024-07-29T09:20:00-06:00",
          "moreInformation": "https://dwr.state.co.us/Tools/Stations/PLACHECO",
          "stationPorStart": "1994-10-01T00:00:00-06:00",
          "stationPorEnd": "2024-07-29T00:00:00-06:00",
          "thirdParty": false
        },
        {
          "abbrev": "PLACHECO",
          "measDateTime": "2024-07-29T09:15:00-0600",
          "parameter": "GAGE_HT",
          "measValue": 2.41,
          "units": "Feet"
        }
      ]
    }"#
}
