//! Events emitted during a batch run.
//!
//! High-level, loggable state changes; the console subscribes and
//! renders them as production log lines. Emission order matches unit
//! attempt order.

use serde::Serialize;

/// A batch-level event.
#[derive(Debug, Clone, Serialize)]
pub enum BatchEvent {
    /// A batch run started.
    BatchStarted {
        /// Planned units across all categories.
        total: u32,
        /// Display name of the selected model.
        model: String,
    },

    /// A unit of work is about to run.
    UnitStarted {
        category: String,
        /// 1-based position within the whole batch.
        current: u32,
        total: u32,
    },

    /// A unit completed and produced images.
    UnitCompleted {
        category: String,
        /// Images produced by this unit.
        produced: usize,
        /// 1-based position within the category.
        unit: u32,
        units_per_category: u32,
    },

    /// A unit completed without producing anything. Not a failure.
    UnitEmpty { category: String },

    /// A unit failed; the batch continues with the next unit.
    UnitFailed { category: String, error: String },

    /// The cancellation flag was observed and the run is stopping.
    BatchCancelled { completed: u32, total: u32 },

    /// The run finished and progress returned to idle.
    BatchFinished {
        completed: u32,
        /// Total images collected across all units.
        produced: usize,
        failed: u32,
    },
}
