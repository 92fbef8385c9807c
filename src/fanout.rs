//! Concurrent multi-station fetching.
//!
//! One task per station runs on a bounded thread pool; results come back
//! over a channel in completion order. The group is all-or-nothing: the
//! first failure raises a group-local abort flag so queued stations never
//! issue their request, and the error goes straight back to the caller.
//! Requests already in flight are abandoned (they are bounded by the HTTP
//! client timeout) and their results dropped.
//!
//! `FetchContext` adds caller-side control the providers themselves lack:
//! a deadline, a cancellation token and a cap on concurrent workers.

use log::{debug, error, info};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use threadpool::ThreadPool;

use crate::config::SourceConfig;
use crate::error::{IngestError, Result};
use crate::model::Reading;
use crate::source::GaugeSource;

pub const DEFAULT_MAX_WORKERS: usize = 8;

/// How often the collector wakes up to look at the deadline and the
/// caller's cancel token while no result is ready.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Cloneable cancellation flag. Cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Fetch context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    deadline: Option<Instant>,
    cancel: CancelToken,
    max_workers: Option<usize>,
}

impl FetchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose worker cap comes from `SourceConfig::fanout_workers`.
    pub fn from_config(config: &SourceConfig) -> Self {
        Self::default().with_max_workers(config.fanout_workers)
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers);
        self
    }

    /// The caller's token; cancelling a clone of it stops the fetch.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// `Cancelled` or `DeadlineExceeded` once either has happened.
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(IngestError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(IngestError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// Pool width: the context's cap, else the source's configured width,
    /// never more than one worker per station.
    fn workers_for(&self, stations: usize, source_default: usize) -> usize {
        self.max_workers
            .unwrap_or(source_default)
            .max(1)
            .min(stations)
    }

    fn next_wait(&self) -> Duration {
        match self.deadline {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(POLL_INTERVAL),
            None => POLL_INTERVAL,
        }
    }
}

// ---------------------------------------------------------------------------
// Fan-out / fan-in
// ---------------------------------------------------------------------------

/// Runs `source.fetch_one` for every station concurrently and concatenates
/// the results. See the module docs for failure and cancellation rules.
pub fn fan_out<S: GaugeSource>(
    source: &S,
    stations: &[String],
    params: &S::Params,
    ctx: &FetchContext,
) -> Result<Vec<Reading>> {
    if stations.is_empty() {
        return Ok(Vec::new());
    }
    ctx.check()?;

    let workers = ctx.workers_for(stations.len(), source.max_workers());
    debug!(
        "{}: fetching {} stations on {} workers",
        S::NAME,
        stations.len(),
        workers
    );

    let pool = ThreadPool::with_name(format!("{}-fetch", S::NAME), workers);
    let abort = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<(String, Result<Vec<Reading>>)>();

    for station in stations {
        let source = source.clone();
        let params = params.clone();
        let station = station.clone();
        let abort = Arc::clone(&abort);
        let caller = ctx.cancel.clone();
        let tx = tx.clone();

        pool.execute(move || {
            if abort.load(Ordering::SeqCst) || caller.is_cancelled() {
                let _ = tx.send((station, Err(IngestError::Cancelled)));
                return;
            }

            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                source.fetch_one(&station, &params)
            }))
            .unwrap_or_else(|_| {
                Err(IngestError::TaskPanicked {
                    station: station.clone(),
                })
            });

            // The collector may already have returned; nobody to tell.
            let _ = tx.send((station, result));
        });
    }
    drop(tx);

    let mut readings = Vec::new();
    let mut remaining = stations.len();

    while remaining > 0 {
        match rx.recv_timeout(ctx.next_wait()) {
            Ok((station, Ok(batch))) => {
                remaining -= 1;
                info!("{}: {} readings for station {}", S::NAME, batch.len(), station);
                readings.extend(batch);
            }
            Ok((station, Err(e))) => {
                abort.store(true, Ordering::SeqCst);
                let e = caller_reason(ctx, e);
                error!("{}: fetch for station {} failed: {}", S::NAME, station, e);
                return Err(e);
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Err(e) = ctx.check() {
                    abort.store(true, Ordering::SeqCst);
                    error!("{}: abandoning {} pending stations: {}", S::NAME, remaining, e);
                    return Err(e);
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Every task reports exactly once, so this only happens if
                // the pool lost a job; treat it like a cancelled group.
                abort.store(true, Ordering::SeqCst);
                return Err(caller_reason(ctx, IngestError::Cancelled));
            }
        }
    }

    Ok(readings)
}

/// A task that saw the caller's token reports a bare `Cancelled` before the
/// collector notices the token itself; report the caller's own reason
/// instead. Real station failures pass through untouched.
fn caller_reason(ctx: &FetchContext, e: IngestError) -> IngestError {
    match e {
        IngestError::Cancelled => ctx.check().err().unwrap_or(IngestError::Cancelled),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
