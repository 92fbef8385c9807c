//! Working-file pipeline for the Environment Canada CSV adapter.
//!
//! Per fetch: a uniquely named `ScopedDir` under the temp root, the CSV
//! downloaded to a staging file and moved into it, the header row checked,
//! then the rows for one station turned into readings. The directory is
//! removed when the `ScopedDir` is closed or dropped, so every exit path
//! cleans up.

use chrono::DateTime;
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

use crate::error::{IngestError, Result};
use crate::http;
use crate::model::{Reading, Unit};

/// Loose header signature, compared after removing spaces and lower-casing.
pub const HEADER_SIGNATURE: &str = "id,date,water";

const COL_STATION: usize = 0;
const COL_DATE: usize = 1;
const COL_WATER_LEVEL: usize = 2;
const COL_DISCHARGE: usize = 6;

const FALLBACK_FILE_NAME: &str = "hydrometric.csv";

// ---------------------------------------------------------------------------
// Scoped directory
// ---------------------------------------------------------------------------

/// Private working directory for one fetch.
///
/// Removed by `close` (which reports removal errors) or, failing that, on
/// drop (which cannot).
#[derive(Debug)]
pub struct ScopedDir {
    dir: TempDir,
}

impl ScopedDir {
    /// Creates `<root>/flowgauge-XXXXXX`, creating `root` first if needed.
    pub fn create(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix("flowgauge-")
            .tempdir_in(root)?;
        debug!("Created working directory {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn close(self) -> io::Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!("Removed working directory {}", path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// Downloads `url` into a staging file under `staging_root`, then moves
/// it into `dir` under the URL's last path segment.
///
/// Staging and working directory should share a filesystem so the move is
/// a rename.
pub fn download_into(
    client: &Client,
    url: &reqwest::Url,
    dir: &Path,
    staging_root: &Path,
) -> Result<PathBuf> {
    let mut staged = NamedTempFile::new_in(staging_root)?;
    let bytes = http::download_to(client, url, staged.as_file_mut())?;

    let file_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_FILE_NAME);
    let dest = dir.join(file_name);

    staged.persist(&dest).map_err(|e| IngestError::Io(e.error))?;
    debug!("Downloaded {} bytes to {}", bytes, dest.display());

    Ok(dest)
}

// ---------------------------------------------------------------------------
// Validation + parsing
// ---------------------------------------------------------------------------

/// True when the first row looks like a hydrometric CSV header.
///
/// The datamart serves HTML 404 pages with HTTP 200, and those must not
/// be parsed as data. The check is deliberately loose: spaces and case
/// are ignored and only the leading `ID,Date,Water` columns matter.
pub fn validate_header(first_row: &StringRecord) -> bool {
    first_row
        .iter()
        .collect::<Vec<_>>()
        .join(",")
        .trim_start_matches('\u{feff}')
        .replace(' ', "")
        .to_lowercase()
        .contains(HEADER_SIGNATURE)
}

/// Turns the data rows for `station` into readings: height (meter) then
/// discharge (cms) per row, sharing the row's timestamp. Rows for other
/// stations are ignored; the station column must match exactly.
pub fn parse_station_rows(rows: &[StringRecord], station: &str) -> Result<Vec<Reading>> {
    let mut readings = Vec::new();

    for row in rows.iter().filter(|row| row.get(COL_STATION) == Some(station)) {
        let raw_date = row.get(COL_DATE).unwrap_or_default();
        let timestamp = DateTime::parse_from_rfc3339(raw_date.trim()).map_err(|_| {
            IngestError::InvalidDate {
                station: station.to_string(),
                value: raw_date.to_string(),
            }
        })?;

        let height = parse_value(row, COL_WATER_LEVEL, station)?;
        let discharge = parse_value(row, COL_DISCHARGE, station)?;

        readings.push(Reading::new(height, timestamp, Unit::Meter, station));
        readings.push(Reading::new(discharge, timestamp, Unit::Cms, station));
    }

    Ok(readings)
}

fn parse_value(row: &StringRecord, column: usize, station: &str) -> Result<f64> {
    let raw = row.get(column).unwrap_or_default();
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| IngestError::InvalidValue {
            station: station.to_string(),
            value: raw.to_string(),
        })
}

/// Reads a whole hydrometric CSV: header check, then station rows.
pub fn read_station_csv<R: Read>(reader: R, station: &str) -> Result<Vec<Reading>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = rdr.records();

    let header = match records.next() {
        Some(Ok(header)) => header,
        Some(Err(e)) => {
            debug!("Unreadable first row for {}: {}", station, e);
            return Err(IngestError::InvalidCsv(station.to_string()));
        }
        None => return Err(IngestError::InvalidCsv(station.to_string())),
    };
    if !validate_header(&header) {
        return Err(IngestError::InvalidCsv(station.to_string()));
    }

    let rows = records.collect::<std::result::Result<Vec<_>, csv::Error>>()?;
    parse_station_rows(&rows, station)
}

pub fn read_station_file(path: &Path, station: &str) -> Result<Vec<Reading>> {
    read_station_csv(File::open(path)?, station)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
