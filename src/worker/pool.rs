//! Search coordination.
//!
//! The pool owns the shared termination state, spawns one search worker
//! per execution unit, and aggregates their reports over a bounded
//! channel. The pool-side sender is dropped right after spawning, so
//! channel disconnect is the signal that every worker has exited.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use tracing::debug;

use crate::index::AddressIndex;
use crate::matcher::PatternSet;
use crate::provider::{Address, GenerationMode, KeyProvider};

use super::search::{SearchWorker, WorkerError, WorkerStats};

/// A matching candidate reported by a worker.
#[derive(Debug, Clone)]
pub struct VanityMatch {
    /// The matched address.
    pub address: Address,
    /// The secret key (hex encoded, no 0x prefix).
    pub private_key: String,
    /// The seed phrase the account was derived from, in seed-phrase mode.
    pub mnemonic: Option<String>,
    /// The ID of the worker that found this match.
    pub worker_id: usize,
    /// The address was already present in the known-address index.
    pub known_collision: bool,
}

/// Shared termination state: matches reported so far versus the quota.
///
/// Workers report a match first and record it here second, so the job
/// total can overshoot the quota by up to `workers - 1` when several
/// workers complete their in-flight search concurrently. That bound is
/// a documented property of the design, not an accident.
#[derive(Debug)]
pub struct SearchState {
    matched: AtomicU64,
    target: u64,
}

impl SearchState {
    pub fn new(target: u64) -> Self {
        Self {
            matched: AtomicU64::new(0),
            target,
        }
    }

    /// Records one reported match. Returns true when the quota is now
    /// met. The counter is monotonically non-decreasing.
    pub fn record_match(&self) -> bool {
        self.matched.fetch_add(1, Ordering::Relaxed) + 1 >= self.target
    }

    pub fn quota_reached(&self) -> bool {
        self.matched.load(Ordering::Relaxed) >= self.target
    }

    pub fn matched(&self) -> u64 {
        self.matched.load(Ordering::Relaxed)
    }

    pub fn target(&self) -> u64 {
        self.target
    }
}

/// What a consumer sees when polling the pool.
#[derive(Debug)]
pub enum PoolEvent {
    /// A worker reported a matching candidate.
    Match(VanityMatch),
    /// A worker aborted on a provider failure.
    Failed(WorkerError),
    /// Nothing arrived within the timeout window.
    Timeout,
    /// Every worker has exited and the channel is drained.
    Finished,
}

/// Coordinates a set of search workers sharing one termination state.
pub struct SearchPool {
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    result_rx: Receiver<Result<VanityMatch, WorkerError>>,
    stop_flag: Arc<AtomicBool>,
    state: Arc<SearchState>,
    stats: Arc<WorkerStats>,
    start_time: Instant,
}

impl SearchPool {
    /// Spawns `num_workers` workers searching for `target` matches.
    ///
    /// The pattern set and index are built by the caller before any
    /// worker starts and are read-only from here on; the generation
    /// mode must already be validated (see [`crate::Config::validate`]).
    pub fn new(
        num_workers: usize,
        target: u64,
        patterns: PatternSet,
        index: AddressIndex,
        mode: GenerationMode,
    ) -> Self {
        let (result_tx, result_rx) = bounded(100);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let state = Arc::new(SearchState::new(target));
        let stats = Arc::new(WorkerStats::new());
        let index = Arc::new(index);

        debug!("spawning {} search workers (target {})", num_workers, target);

        let handles = (0..num_workers)
            .map(|id| {
                let patterns = patterns.clone();
                let index = index.clone();
                let result_tx = result_tx.clone();
                let state = state.clone();
                let stop_flag = stop_flag.clone();
                let stats = stats.clone();

                thread::Builder::new()
                    .name(format!("vanity-worker-{}", id))
                    .spawn(move || {
                        let worker = SearchWorker::new(
                            id,
                            patterns,
                            index,
                            KeyProvider::new(mode),
                            result_tx,
                            state,
                            stop_flag,
                            stats,
                        );
                        worker.run();
                    })
                    .expect("Failed to spawn worker thread")
            })
            .collect();

        // Workers hold the only senders now; the channel disconnects
        // once the last worker exits.
        drop(result_tx);

        Self {
            num_workers,
            handles: Some(handles),
            result_rx,
            stop_flag,
            state,
            stats,
            start_time: Instant::now(),
        }
    }

    /// Polls for the next worker report.
    pub fn next_event(&self, timeout: Duration) -> PoolEvent {
        match self.result_rx.recv_timeout(timeout) {
            Ok(Ok(found)) => PoolEvent::Match(found),
            Ok(Err(err)) => PoolEvent::Failed(err),
            Err(RecvTimeoutError::Timeout) => PoolEvent::Timeout,
            Err(RecvTimeoutError::Disconnected) => PoolEvent::Finished,
        }
    }

    /// Drains the pool to completion and joins all workers.
    ///
    /// Returns every reported match, in arrival order (which worker
    /// found what first is unspecified), or the first worker failure.
    /// With a satisfiable pattern set, the number of matches `C`
    /// satisfies `target <= C <= target + workers - 1`.
    pub fn run_to_completion(mut self) -> Result<Vec<VanityMatch>, WorkerError> {
        let mut found = Vec::new();
        let mut failure: Option<WorkerError> = None;

        while let Ok(report) = self.result_rx.recv() {
            match report {
                Ok(m) => found.push(m),
                Err(e) => {
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }
        self.join_workers();

        match failure {
            Some(e) => Err(e),
            None => Ok(found),
        }
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Waits for all workers to complete.
    pub fn join(mut self) {
        self.join_workers();
    }

    fn join_workers(&mut self) {
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }

    /// A clone of the stop flag for external use (e.g. signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// True if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Matches recorded on the shared state so far.
    pub fn matched_count(&self) -> u64 {
        self.state.matched()
    }

    pub fn target(&self) -> u64 {
        self.state.target()
    }

    pub fn total_keys(&self) -> u64 {
        self.stats.total_keys()
    }

    pub fn total_matches(&self) -> u64 {
        self.stats.total_matches()
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Current generation rate over the whole run.
    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_keys() as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl Drop for SearchPool {
    fn drop(&mut self) {
        self.stop();
        self.join_workers();
    }
}
