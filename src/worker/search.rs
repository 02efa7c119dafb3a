//! The per-thread search loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::warn;

use crate::index::AddressIndex;
use crate::matcher::PatternSet;
use crate::provider::{Candidate, CandidateSource, ProviderError};

use super::pool::{SearchState, VanityMatch};

/// How many draws a worker makes between looks at the shared stop
/// condition. Checking on every draw would serialize workers on the
/// shared counter; a reported match triggers an immediate check
/// regardless of this interval.
pub(crate) const STOP_CHECK_INTERVAL: u64 = 10_000;

/// Generation statistics shared by all workers of a pool.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total keys generated
    pub keys_generated: AtomicU64,
    /// Matches found
    pub matches_found: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_keys(&self) -> u64 {
        self.keys_generated.load(Ordering::Relaxed)
    }

    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }
}

/// A worker failure, tagged with the worker that hit it.
#[derive(Debug, thiserror::Error)]
#[error("worker {worker_id}: {source}")]
pub struct WorkerError {
    pub worker_id: usize,
    #[source]
    pub source: ProviderError,
}

/// One sequential search unit.
///
/// Draws candidates from its source and tests them against the shared
/// pattern set until either a match is found or the shared stop
/// condition is observed. The driving loop ([`SearchWorker::run`])
/// repeats that until the job's quota is met.
pub struct SearchWorker<S: CandidateSource> {
    id: usize,
    patterns: PatternSet,
    index: Arc<AddressIndex>,
    source: S,
    result_tx: Sender<Result<VanityMatch, WorkerError>>,
    state: Arc<SearchState>,
    stop_flag: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
}

impl<S: CandidateSource> SearchWorker<S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        patterns: PatternSet,
        index: Arc<AddressIndex>,
        source: S,
        result_tx: Sender<Result<VanityMatch, WorkerError>>,
        state: Arc<SearchState>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            patterns,
            index,
            source,
            result_tx,
            state,
            stop_flag,
            stats,
        }
    }

    /// Runs the driving loop.
    ///
    /// Each found match is reported on the result channel immediately,
    /// then recorded on the shared state; the worker that records the
    /// quota-meeting match raises the stop flag for everyone. A
    /// candidate-source failure also stops the whole job: those errors
    /// are environmental, not transient, so running degraded would only
    /// hide them.
    pub fn run(&self) {
        loop {
            if self.should_stop() {
                break;
            }

            match self.search_one() {
                Ok(Some(found)) => {
                    self.stats.matches_found.fetch_add(1, Ordering::Relaxed);
                    let _ = self.result_tx.send(Ok(found));

                    // Tight check on the success path: a worker that
                    // just reported must not keep searching past the
                    // quota.
                    if self.state.record_match() {
                        self.stop_flag.store(true, Ordering::Relaxed);
                        break;
                    }
                }
                Ok(None) => break,
                Err(source) => {
                    warn!("worker {} aborting: {}", self.id, source);
                    let _ = self.result_tx.send(Err(WorkerError {
                        worker_id: self.id,
                        source,
                    }));
                    self.stop_flag.store(true, Ordering::Relaxed);
                    break;
                }
            }
        }
    }

    /// Draws candidates until one matches the pattern set.
    ///
    /// Returns `Ok(None)` when a periodic check observes the shared
    /// stop condition mid-search.
    fn search_one(&self) -> Result<Option<VanityMatch>, ProviderError> {
        let mut since_check: u64 = 0;

        loop {
            if since_check >= STOP_CHECK_INTERVAL {
                self.stats
                    .keys_generated
                    .fetch_add(since_check, Ordering::Relaxed);
                since_check = 0;

                if self.should_stop() {
                    return Ok(None);
                }
            }

            since_check += 1;
            let Candidate { account, mnemonic } = self.source.next_candidate()?;
            let address = account.address().to_hex_prefixed();

            if !self.patterns.matches_any(&address) {
                continue;
            }

            self.stats
                .keys_generated
                .fetch_add(since_check, Ordering::Relaxed);

            // A hit against the known-address list is reported loudly
            // but still returned: the match counts toward the quota.
            let known_collision = self.index.contains(&address);
            if known_collision {
                warn!(
                    "worker {}: address {} already exists in the known-address list",
                    self.id, address
                );
            }

            return Ok(Some(VanityMatch {
                address: *account.address(),
                private_key: account.private_key_hex(),
                mnemonic,
                worker_id: self.id,
                known_collision,
            }));
        }
    }

    #[inline]
    fn should_stop(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed) || self.state.quota_reached()
    }

    pub fn id(&self) -> usize {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crossbeam_channel::bounded;
    use secp256k1::Secp256k1;

    use crate::provider::Account;

    use super::*;

    /// Address of secret key 1.
    const ADDR_ONE: &str = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";
    /// Address of secret key 2.
    const ADDR_TWO: &str = "0x2b5ad5c4795c026514f8317c7a215e218dccd6cf";

    fn account(secret_tail: u8) -> Account {
        let mut secret = [0u8; 32];
        secret[31] = secret_tail;
        Account::from_secret_bytes(&Secp256k1::new(), secret).unwrap()
    }

    /// Deterministic source cycling through preset accounts.
    struct FixedSource {
        accounts: Vec<Account>,
        cursor: Cell<usize>,
    }

    impl FixedSource {
        fn new(accounts: Vec<Account>) -> Self {
            Self {
                accounts,
                cursor: Cell::new(0),
            }
        }
    }

    impl CandidateSource for FixedSource {
        fn next_candidate(&self) -> Result<Candidate, ProviderError> {
            let i = self.cursor.get();
            self.cursor.set(i + 1);
            Ok(Candidate {
                account: self.accounts[i % self.accounts.len()].clone(),
                mnemonic: None,
            })
        }
    }

    /// Source that always fails, standing in for a broken provider.
    struct FailingSource;

    impl CandidateSource for FailingSource {
        fn next_candidate(&self) -> Result<Candidate, ProviderError> {
            Err(ProviderError::UnsupportedWordCount(13))
        }
    }

    fn worker_fixture<S: CandidateSource>(
        source: S,
        patterns: PatternSet,
        index: AddressIndex,
        target: u64,
    ) -> (
        SearchWorker<S>,
        crossbeam_channel::Receiver<Result<VanityMatch, WorkerError>>,
        Arc<AtomicBool>,
        Arc<SearchState>,
    ) {
        let (tx, rx) = bounded(16);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let state = Arc::new(SearchState::new(target));
        let worker = SearchWorker::new(
            7,
            patterns,
            Arc::new(index),
            source,
            tx,
            state.clone(),
            stop_flag.clone(),
            Arc::new(WorkerStats::new()),
        );
        (worker, rx, stop_flag, state)
    }

    #[test]
    fn test_worker_skips_non_matching_candidates() {
        let source = FixedSource::new(vec![account(1), account(2)]);
        let patterns = PatternSet::new(&["2b".to_string()], &[]);
        let (worker, rx, _, state) =
            worker_fixture(source, patterns, AddressIndex::default(), 1);

        worker.run();
        drop(worker);

        let found = rx.recv().unwrap().unwrap();
        assert_eq!(found.address.to_hex_prefixed(), ADDR_TWO);
        assert_eq!(found.worker_id, 7);
        assert!(!found.known_collision);
        assert_eq!(state.matched(), 1);
    }

    #[test]
    fn test_worker_stops_at_quota() {
        let source = FixedSource::new(vec![account(1)]);
        let patterns = PatternSet::new(&[], &[]);
        let (worker, rx, stop_flag, state) =
            worker_fixture(source, patterns, AddressIndex::default(), 3);

        worker.run();
        drop(worker);

        let found: Vec<_> = rx.iter().collect();
        assert_eq!(found.len(), 3);
        assert_eq!(state.matched(), 3);
        assert!(stop_flag.load(Ordering::Relaxed));
    }

    #[test]
    fn test_collision_is_flagged_but_still_reported() {
        let source = FixedSource::new(vec![account(1)]);
        let patterns = PatternSet::new(&[], &[]);
        let index = AddressIndex::from_addresses([ADDR_ONE]);
        let (worker, rx, _, state) = worker_fixture(source, patterns, index, 1);

        worker.run();
        drop(worker);

        let found = rx.recv().unwrap().unwrap();
        assert!(found.known_collision);
        assert_eq!(found.address.to_hex_prefixed(), ADDR_ONE);
        // The collision still counted toward the quota.
        assert_eq!(state.matched(), 1);
    }

    #[test]
    fn test_provider_failure_aborts_and_raises_stop() {
        let patterns = PatternSet::new(&[], &[]);
        let (worker, rx, stop_flag, state) =
            worker_fixture(FailingSource, patterns, AddressIndex::default(), 1);

        worker.run();
        drop(worker);

        let err = rx.recv().unwrap().unwrap_err();
        assert_eq!(err.worker_id, 7);
        assert!(matches!(err.source, ProviderError::UnsupportedWordCount(13)));
        assert!(stop_flag.load(Ordering::Relaxed));
        assert_eq!(state.matched(), 0);
    }

    #[test]
    fn test_worker_observes_preexisting_stop() {
        let source = FixedSource::new(vec![account(1)]);
        let patterns = PatternSet::new(&[], &[]);
        let (worker, rx, stop_flag, _) =
            worker_fixture(source, patterns, AddressIndex::default(), 5);

        stop_flag.store(true, Ordering::Relaxed);
        worker.run();
        drop(worker);

        assert!(rx.try_recv().is_err());
    }
}
