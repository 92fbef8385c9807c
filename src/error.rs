//! Error types for gauge ingestion.
//!
//! Every failure is terminal for the station that produced it and is
//! reported upward; nothing here is retried.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    /// A request URL could not be built from the inputs.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP call itself failed (connect, TLS, timeout, body read).
    #[error("Request for station {station} failed: {source}")]
    Transport {
        station: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-2xx status.
    #[error("Request for station {station} returned HTTP {status}")]
    HttpStatus { station: String, status: u16 },

    /// The response body did not match the expected JSON envelope.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A unit or parameter code outside the closed vocabulary.
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    #[error("Failed to parse date '{value}' for station {station}")]
    InvalidDate { station: String, value: String },

    #[error("Failed to parse value '{value}' for station {station}")]
    InvalidValue { station: String, value: String },

    /// The downloaded file does not look like a hydrometric CSV
    /// (usually an HTML error page served with HTTP 200).
    #[error("Invalid CSV for station {0}")]
    InvalidCsv(String),

    /// The file passed the header check but a later record is unreadable.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    /// Anything that went wrong after the CSV working directory existed.
    #[error("Failed to fetch data for station {station}: {source}")]
    FetchFailed {
        station: String,
        #[source]
        source: Box<IngestError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("Fetch deadline exceeded")]
    DeadlineExceeded,

    #[error("Fetch task for station {station} panicked")]
    TaskPanicked { station: String },
}

impl IngestError {
    /// Station the error is attributed to, when one is known.
    pub fn station(&self) -> Option<&str> {
        match self {
            IngestError::Transport { station, .. }
            | IngestError::HttpStatus { station, .. }
            | IngestError::InvalidDate { station, .. }
            | IngestError::InvalidValue { station, .. }
            | IngestError::FetchFailed { station, .. }
            | IngestError::TaskPanicked { station } => Some(station),
            IngestError::InvalidCsv(station) => Some(station),
            _ => None,
        }
    }

    /// Attributes the error to `station` unless it already names one.
    pub fn for_station(self, station: &str) -> Self {
        if self.station().is_some() {
            return self;
        }
        IngestError::FetchFailed {
            station: station.to_string(),
            source: Box::new(self),
        }
    }
}

/// Type alias for Results using IngestError
pub type Result<T> = std::result::Result<T, IngestError>;
