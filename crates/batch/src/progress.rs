//! Progress publication for batch runs.
//!
//! The orchestrator is the single writer of [`BatchProgress`]; embedders
//! observe snapshots through a watch channel. `current` only ever grows
//! within a run, and the status is back at idle by the time a run
//! returns, however many units failed.

use easel_core::types::{BatchProgress, BatchStatus};
use serde::Serialize;
use tokio::sync::watch;

/// Read side of the progress channel.
pub type ProgressReceiver = watch::Receiver<BatchProgress>;

/// Single-writer progress handle owned by the orchestrator.
pub(crate) struct ProgressPublisher {
    tx: watch::Sender<BatchProgress>,
}

impl ProgressPublisher {
    pub(crate) fn new() -> (Self, ProgressReceiver) {
        let (tx, rx) = watch::channel(BatchProgress::default());
        (Self { tx }, rx)
    }

    /// Current snapshot.
    pub(crate) fn snapshot(&self) -> BatchProgress {
        self.tx.borrow().clone()
    }

    /// Reset for a new run of `total` planned units.
    pub(crate) fn start(&self, total: u32) {
        self.tx.send_replace(BatchProgress {
            total,
            current: 0,
            category: None,
            status: BatchStatus::Running,
        });
    }

    /// Record the unit in flight.
    pub(crate) fn unit(&self, category: &str, current: u32) {
        self.tx.send_modify(|p| {
            p.category = Some(category.to_string());
            p.current = current;
        });
    }

    /// Return to idle, clearing the in-flight category.
    pub(crate) fn finish(&self) {
        self.tx.send_modify(|p| {
            p.status = BatchStatus::Idle;
            p.category = None;
        });
    }
}

/// Outcome counts for one completed batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Units attempted (equals the planned total unless cancelled).
    pub attempted: u32,
    /// Units that produced at least one image.
    pub produced_units: u32,
    /// Total images collected.
    pub images: usize,
    /// Units that failed.
    pub failed: u32,
    /// Whether cancellation cut the run short.
    pub cancelled: bool,
}
