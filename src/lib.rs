//! # web3_vanity
//!
//! Parallel Ethereum vanity address generator.
//!
//! ## Architecture
//!
//! - `config`: runtime configuration and validation
//! - `matcher`: pattern-set normalization and matching
//! - `provider`: key generation and address derivation, plain or from
//!   BIP-39 seed phrases
//! - `index`: known-address index for collision reporting
//! - `worker`: parallel search workers and coordination

pub mod config;
pub mod index;
pub mod matcher;
pub mod provider;
pub mod worker;

pub use config::{Config, ConfigError};
pub use index::AddressIndex;
pub use matcher::PatternSet;
pub use provider::{
    Account, Address, Candidate, CandidateSource, GenerationMode, KeyProvider, ProviderError,
};
pub use worker::{PoolEvent, SearchPool, VanityMatch, WorkerError};
