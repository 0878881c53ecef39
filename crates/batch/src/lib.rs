//! Batch orchestration for the Easel production console.
//!
//! Drives sequential generation runs across the selected categories:
//! one unit of work at a time, unit failures isolated, cancellation
//! observed cooperatively between units. Progress snapshots and
//! per-unit events are published for whatever front-end is embedding
//! the run.

pub mod events;
pub mod orchestrator;
pub mod progress;
