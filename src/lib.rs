//! flowgauge: multi-source hydrological telemetry ingestion.
//!
//! Stream height and discharge from USGS, Environment Canada and Colorado
//! DWR, normalized into one `Reading` model.
//!
//! # Module structure
//!
//! ```text
//! flowgauge
//! ├── model       — Reading, Unit, TimePeriod (shared by every adapter)
//! ├── error       — IngestError
//! ├── config      — SourceConfig: endpoints, HTTP timeout, fan-out width
//! ├── http        — blocking reqwest client + GET helpers
//! ├── source      — GaugeSource trait: fetch_one / fetch_many
//! ├── fanout      — concurrent multi-station fetch, deadline + cancellation
//! └── ingest
//!     ├── usgs         — USGS NWIS IV: URL construction + JSON parsing
//!     ├── envcanada    — Environment Canada hourly hydrometric CSV
//!     ├── csv_pipeline — working directory, download, header check, row parsing
//!     ├── dwr          — Colorado DWR telemetry JSON
//!     └── fixtures (test only) — representative provider payloads
//! ```
//!
//! # Example
//! ```no_run
//! use flowgauge::{FetchContext, GaugeSource, PredefinedPeriod};
//! use flowgauge::ingest::usgs::{UsgsParameter, UsgsParams, UsgsWaterServices};
//!
//! let usgs = UsgsWaterServices::new()?;
//! let params = UsgsParams::new(
//!     PredefinedPeriod::SevenDays,
//!     &[UsgsParameter::Height, UsgsParameter::Discharge],
//! );
//! let stations = vec!["09359500".to_string(), "01646500".to_string()];
//! let readings = usgs.fetch_many(&stations, &params, &FetchContext::new())?;
//! # Ok::<(), flowgauge::IngestError>(())
//! ```

pub mod config;
pub mod error;
pub mod fanout;
pub mod http;
pub mod ingest;
pub mod model;
pub mod source;

pub use config::SourceConfig;
pub use error::{IngestError, Result};
pub use fanout::{CancelToken, FetchContext};
pub use ingest::dwr::DwrTelemetry;
pub use ingest::envcanada::{EnvironmentCanada, Province};
pub use ingest::usgs::{UsgsParameter, UsgsParams, UsgsWaterServices};
pub use model::{PredefinedPeriod, Reading, StationId, TimePeriod, Unit};
pub use source::GaugeSource;
