//! Capability shared by every provider adapter.
//!
//! An adapter only has to know how to fetch one station; the multi-station
//! entry point is provided once, on top of `fanout`.

use crate::error::Result;
use crate::fanout::{self, DEFAULT_MAX_WORKERS, FetchContext};
use crate::model::Reading;

pub trait GaugeSource: Clone + Send + Sync + 'static {
    /// Source-specific request parameters (time period, province, ...).
    type Params: Clone + Send + Sync + 'static;

    /// Short provider name used in log lines and worker thread names.
    const NAME: &'static str;

    /// Fetches and normalizes every reading for one station.
    fn fetch_one(&self, station: &str, params: &Self::Params) -> Result<Vec<Reading>>;

    /// Concurrent station fetches used by `fetch_many` when the context
    /// sets no cap. Adapters report `SourceConfig::fanout_workers`.
    fn max_workers(&self) -> usize {
        DEFAULT_MAX_WORKERS
    }

    /// Fetches all `stations` concurrently and concatenates the results.
    ///
    /// All-or-nothing: the first station error is returned and no partial
    /// list is produced. Order across stations is unspecified; each
    /// station's readings stay in source order.
    fn fetch_many(
        &self,
        stations: &[String],
        params: &Self::Params,
        ctx: &FetchContext,
    ) -> Result<Vec<Reading>> {
        fanout::fan_out(self, stations, params, ctx)
    }
}
