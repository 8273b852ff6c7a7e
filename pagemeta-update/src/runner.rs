//! Deferred-update runner
//!
//! Host-side seam: page edits enqueue updates here, and the runner executes
//! them after the triggering request has completed. There is no return
//! channel back to the enqueuer; outcomes are logged and counted, and a
//! failed update never affects the request that scheduled it.
//!
//! # Usage
//!
//! ```ignore
//! use pagemeta_update::{RunnerConfig, UpdateRunner};
//!
//! let runner = UpdateRunner::spawn(RunnerConfig::default());
//! runner.enqueue(DeferredDescriptionUpdate::new(page, true, source, store));
//! // ...
//! runner.shutdown().await;
//! ```

use crate::reconcile::{DeferredDescriptionUpdate, UpdateOutcome};
use pagemeta_core::{new_update_id, PageId, PagemetaResult, Timestamp, UpdateId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

// ============================================================================
// CONFIGURATION
// ============================================================================

const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Configuration for the update runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Maximum number of queued updates. Enqueues beyond this are dropped
    /// (default: 256).
    pub queue_capacity: usize,

    /// Whether to log each completed update at info level (default: true).
    pub log_outcomes: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            log_outcomes: true,
        }
    }
}

impl RunnerConfig {
    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PAGEMETA_QUEUE_CAPACITY`: Maximum queued updates (default: 256)
    /// - `PAGEMETA_LOG_OUTCOMES`: "true" or "false" (default: true)
    pub fn from_env() -> Self {
        let queue_capacity = std::env::var("PAGEMETA_QUEUE_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);

        let log_outcomes = std::env::var("PAGEMETA_LOG_OUTCOMES")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);

        Self {
            queue_capacity,
            log_outcomes,
        }
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// Metrics for the update runner.
#[derive(Debug, Default)]
pub struct RunnerMetrics {
    /// Updates executed to completion (any outcome).
    pub runs: AtomicU64,
    /// Runs that inserted a fresh description row.
    pub inserted: AtomicU64,
    /// Runs that updated an existing row in place.
    pub updated: AtomicU64,
    /// Runs that repaired duplicate rows (delete-all plus insert).
    pub replaced: AtomicU64,
    /// Runs where the stored value already matched.
    pub unchanged: AtomicU64,
    /// Runs abandoned before the decision step.
    pub skipped: AtomicU64,
    /// Runs that failed with a store error (or panicked).
    pub errors: AtomicU64,
    /// Updates dropped at enqueue because the queue was full or closed.
    pub dropped: AtomicU64,
}

impl RunnerMetrics {
    fn record(&self, outcome: UpdateOutcome) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            UpdateOutcome::Inserted => &self.inserted,
            UpdateOutcome::Updated => &self.updated,
            UpdateOutcome::Replaced => &self.replaced,
            UpdateOutcome::Unchanged => &self.unchanged,
            UpdateOutcome::Skipped(_) => &self.skipped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of all counters.
    pub fn snapshot(&self) -> RunnerSnapshot {
        RunnerSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            inserted: self.inserted.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            replaced: self.replaced.load(Ordering::Relaxed),
            unchanged: self.unchanged.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of runner metrics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerSnapshot {
    pub runs: u64,
    pub inserted: u64,
    pub updated: u64,
    pub replaced: u64,
    pub unchanged: u64,
    pub skipped: u64,
    pub errors: u64,
    pub dropped: u64,
}

// ============================================================================
// DEFERRED UPDATE TRAIT
// ============================================================================

/// A unit of work the runner can execute after a request completes.
pub trait DeferredUpdate: Send + Sync {
    /// The page the update targets, for logging.
    fn page(&self) -> PageId;

    /// Execute the update. Runs synchronously on a blocking thread.
    fn run(&self) -> PagemetaResult<UpdateOutcome>;
}

impl DeferredUpdate for DeferredDescriptionUpdate {
    fn page(&self) -> PageId {
        DeferredDescriptionUpdate::page(self)
    }

    fn run(&self) -> PagemetaResult<UpdateOutcome> {
        DeferredDescriptionUpdate::run(self)
    }
}

struct QueuedUpdate {
    id: UpdateId,
    queued_at: Timestamp,
    update: Box<dyn DeferredUpdate>,
}

// ============================================================================
// RUNNER
// ============================================================================

/// Work queue executing deferred updates one at a time.
///
/// Must be created inside a tokio runtime. Updates run on blocking tasks
/// since store and source access is synchronous.
pub struct UpdateRunner {
    tx: mpsc::Sender<QueuedUpdate>,
    metrics: Arc<RunnerMetrics>,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl UpdateRunner {
    /// Spawn the runner task with the given configuration.
    pub fn spawn(config: RunnerConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let metrics = Arc::new(RunnerMetrics::default());

        let handle = tokio::spawn(runner_loop(
            rx,
            Arc::clone(&metrics),
            config,
            shutdown_rx,
        ));

        Self {
            tx,
            metrics,
            shutdown_tx,
            handle,
        }
    }

    /// Queue an update for execution.
    ///
    /// Fire-and-forget: returns the assigned update id, or `None` if the
    /// queue is full or shut down, in which case the update is dropped and
    /// counted. The enqueuer never learns the update's outcome.
    pub fn enqueue(&self, update: impl DeferredUpdate + 'static) -> Option<UpdateId> {
        let queued = QueuedUpdate {
            id: new_update_id(),
            queued_at: chrono::Utc::now(),
            update: Box::new(update),
        };
        let id = queued.id;
        let page = queued.update.page();

        match self.tx.try_send(queued) {
            Ok(()) => Some(id),
            Err(_) => {
                self.metrics.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(%page, "update queue full, dropping deferred update");
                None
            }
        }
    }

    /// Current metrics for this runner.
    pub fn metrics(&self) -> Arc<RunnerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Signal shutdown and wait for the runner task to stop.
    ///
    /// Updates still in the queue when the signal lands are not executed.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        drop(self.tx);
        let _ = self.handle.await;
    }
}

async fn runner_loop(
    mut rx: mpsc::Receiver<QueuedUpdate>,
    metrics: Arc<RunnerMetrics>,
    config: RunnerConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            // Shutdown wins over pending work: once the signal lands,
            // queued updates are abandoned, not executed.
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            item = rx.recv() => {
                match item {
                    Some(queued) => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                        execute(queued, &metrics, &config).await;
                    }
                    None => break,
                }
            }
        }
    }
}

async fn execute(queued: QueuedUpdate, metrics: &Arc<RunnerMetrics>, config: &RunnerConfig) {
    let QueuedUpdate {
        id,
        queued_at,
        update,
    } = queued;
    let page = update.page();

    let result = tokio::task::spawn_blocking(move || update.run()).await;

    match result {
        Ok(Ok(outcome)) => {
            metrics.record(outcome);
            if config.log_outcomes {
                let waited_ms = (chrono::Utc::now() - queued_at).num_milliseconds();
                info!(%id, %page, ?outcome, waited_ms, "deferred update finished");
            }
        }
        Ok(Err(err)) => {
            metrics.errors.fetch_add(1, Ordering::Relaxed);
            warn!(%id, %page, error = %err, "deferred update failed");
        }
        Err(join_err) => {
            metrics.errors.fetch_add(1, Ordering::Relaxed);
            warn!(%id, %page, error = %join_err, "deferred update panicked");
        }
    }
}
