//! Key generation for the vanity search.
//!
//! This module is the boundary to the cryptographic collaborators:
//! - secp256k1 keypair generation from OS entropy
//! - Ethereum address derivation (Keccak-256 over the public key)
//! - BIP-39 mnemonic generation and BIP-32 account derivation
//!
//! The search loop consumes it through the [`CandidateSource`] trait,
//! one fresh draw per call, so tests can substitute a deterministic
//! source.

mod account;
mod address;
mod mnemonic;

pub use account::Account;
pub use address::Address;
pub use mnemonic::{ACCOUNT_DERIVATION_PATH, SUPPORTED_WORD_COUNTS};

use secp256k1::{All, Secp256k1};
use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 convenience wrapper shared by address derivation and
/// checksum encoding.
pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);
    hash
}

/// How candidate accounts are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Fresh keypair straight from the secure RNG. No seed phrase.
    Random,
    /// Fresh BIP-39 mnemonic per draw, account derived from it.
    /// Noticeably slower than [`GenerationMode::Random`] because of the
    /// PBKDF2 seed stretch on every draw.
    SeedPhrase { word_count: usize },
}

/// One generated sample: an account plus the seed phrase it came from,
/// if seed-phrase mode is active.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub account: Account,
    pub mnemonic: Option<String>,
}

/// Errors from the key/mnemonic collaborators.
///
/// These are environment or programmer errors, not transient
/// conditions; callers abort rather than retry.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("unsupported seed phrase word count {0} (supported: 12, 15, 18, 21, 24)")]
    UnsupportedWordCount(usize),

    #[error("mnemonic error: {0}")]
    Mnemonic(#[from] bip39::Error),

    #[error("key derivation error: {0}")]
    Derivation(#[from] bip32::Error),

    #[error("invalid secret key: {0}")]
    SecretKey(#[from] secp256k1::Error),
}

/// A source of candidate accounts, drawn one at a time.
///
/// Implementations must not retry internally: each call is exactly one
/// fresh draw, and each draw must consume fresh entropy.
pub trait CandidateSource {
    fn next_candidate(&self) -> Result<Candidate, ProviderError>;
}

/// The production [`CandidateSource`]: secp256k1 keys, optionally
/// derived from a BIP-39 seed phrase.
///
/// Constructed once per worker so the secp256k1 context is reused
/// across draws.
pub struct KeyProvider {
    secp: Secp256k1<All>,
    mode: GenerationMode,
}

impl KeyProvider {
    /// Creates a provider for the given generation mode.
    ///
    /// The word count inside [`GenerationMode::SeedPhrase`] is validated
    /// on the first draw; front ends validate it up front via
    /// [`crate::Config::validate`] so no worker is spawned against an
    /// unusable mode.
    pub fn new(mode: GenerationMode) -> Self {
        Self {
            secp: Secp256k1::new(),
            mode,
        }
    }

    /// The active generation mode.
    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// Generates a fresh random account, ignoring the configured mode.
    pub fn random_account(&self) -> Account {
        Account::random(&self.secp)
    }

    /// Re-derives the account a recorded seed phrase encodes.
    pub fn account_from_phrase(&self, phrase: &str) -> Result<Account, ProviderError> {
        let parsed = mnemonic::parse_phrase(phrase)?;
        mnemonic::derive_account(&self.secp, &parsed)
    }
}

impl CandidateSource for KeyProvider {
    fn next_candidate(&self) -> Result<Candidate, ProviderError> {
        match self.mode {
            GenerationMode::Random => Ok(Candidate {
                account: Account::random(&self.secp),
                mnemonic: None,
            }),
            GenerationMode::SeedPhrase { word_count } => {
                let phrase = mnemonic::generate_phrase(word_count)?;
                let account = mnemonic::derive_account(&self.secp, &phrase)?;
                Ok(Candidate {
                    account,
                    mnemonic: Some(phrase.to_string()),
                })
            }
        }
    }
}
