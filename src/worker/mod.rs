//! Parallel search execution.
//!
//! This module provides:
//! - The per-thread search loop (draw, match, report)
//! - Pool coordination: shared quota state, stop signal, result channel
//! - Progress statistics for reporting

mod pool;
mod search;

pub use pool::{PoolEvent, SearchPool, SearchState, VanityMatch};
pub use search::{SearchWorker, WorkerError, WorkerStats};
