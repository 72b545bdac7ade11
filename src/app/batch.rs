//! Batch download driving loop for album items
//!
//! Runs each queued item through the `PENDING → DOWNLOADING → {DONE |
//! RETRY}` state machine. A connection-level failure during `DOWNLOADING`
//! discards the partial output and re-enters `DOWNLOADING` for the same
//! item; retries are unbounded with no backoff (acceptable for an
//! interactive CLI, deliberately not bounded here). Any other failure
//! terminates the item and the loop moves on; one item's failure never
//! corrupts its siblings. Start/end index filters are applied before an
//! item ever becomes `PENDING`, so excluded items make no network calls.

use tracing::{debug, warn};

use crate::errors::AppError;

/// Per-item processing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    Downloading,
    Retry,
    Done,
}

/// Index bounds and transfer tuning for one batch run
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// First 1-based index to include, if bounded below
    pub start: Option<usize>,
    /// Last 1-based index to include, if bounded above
    pub end: Option<usize>,
}

impl BatchOptions {
    /// Whether the 1-based item index falls inside the bounds
    pub fn includes(&self, index: usize) -> bool {
        self.start.map_or(true, |s| index >= s) && self.end.map_or(true, |e| index <= e)
    }
}

/// External progress sink consuming per-item batch events
pub trait BatchObserver {
    fn item_started(&mut self, _index: usize, _total: usize, _id: &str) {}
    fn item_progress(&mut self, _fraction: f64) {}
    fn item_retry(&mut self, _id: &str, _error: &AppError) {}
    fn item_done(&mut self, _id: &str, _bytes: u64) {}
    fn item_failed(&mut self, _id: &str, _error: &AppError) {}
    fn item_skipped(&mut self, _id: &str) {}
}

/// No-op observer for callers that do not display progress
pub struct NullObserver;

impl BatchObserver for NullObserver {}

/// Per-item accounting for one completed batch run
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub completed: usize,
    pub skipped: usize,
    /// Terminal per-item failures, in queue order
    pub failed: Vec<(String, AppError)>,
}

impl BatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drive every queued item through the state machine.
///
/// `attempt` performs one `DOWNLOADING` pass for an item and must discard
/// any partial output from a previous pass itself (recreating the sink
/// truncates it). It reports transfer progress through the observer it is
/// handed. Returns per-item accounting; the queue is never aborted by a
/// single item's failure.
pub fn run_batch<F>(
    ids: &[String],
    options: &BatchOptions,
    observer: &mut dyn BatchObserver,
    mut attempt: F,
) -> BatchOutcome
where
    F: FnMut(usize, &str, &mut dyn BatchObserver) -> Result<u64, AppError>,
{
    let mut outcome = BatchOutcome::default();
    let total = ids.len();

    for (position, id) in ids.iter().enumerate() {
        let index = position + 1;
        if !options.includes(index) {
            debug!("skipping {} (index {} outside bounds)", id, index);
            observer.item_skipped(id);
            outcome.skipped += 1;
            continue;
        }

        let mut state = ItemState::Pending;
        observer.item_started(index, total, id);

        loop {
            match state {
                ItemState::Pending | ItemState::Retry => {
                    state = ItemState::Downloading;
                }
                ItemState::Downloading => match attempt(index, id, observer) {
                    Ok(bytes) => {
                        observer.item_done(id, bytes);
                        outcome.completed += 1;
                        state = ItemState::Done;
                    }
                    Err(error) if error.is_retryable() => {
                        warn!("{} failed ({}), retrying", id, error);
                        observer.item_retry(id, &error);
                        state = ItemState::Retry;
                    }
                    Err(error) => {
                        warn!("{} failed terminally: {}", id, error);
                        observer.item_failed(id, &error);
                        outcome.failed.push((id.clone(), error));
                        break;
                    }
                },
                ItemState::Done => break,
            }
        }
    }

    outcome
}
