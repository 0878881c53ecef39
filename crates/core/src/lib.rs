//! Pure domain logic for the Easel batch image-production console.
//!
//! No I/O lives in this crate: prompt assembly, session identity
//! derivation, aspect-ratio/size mapping, per-model request limits, and
//! the shared progress types used by the orchestration layer.

pub mod error;
pub mod limits;
pub mod prompt;
pub mod session;
pub mod types;
