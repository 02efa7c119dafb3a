//! BIP-39 seed phrases and BIP-32 account derivation.
//!
//! Seed-phrase mode draws a fresh English mnemonic per candidate and
//! derives the account at the standard Ethereum path, matching what
//! common wallet software recovers from the same phrase.

use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use rand::RngCore;
use secp256k1::{All, Secp256k1};

use super::{Account, ProviderError};

/// Word counts the BIP-39 wordlist encoding supports.
pub const SUPPORTED_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Derivation path for the first external Ethereum account (BIP-44).
pub const ACCOUNT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Entropy bytes backing a phrase of the given length.
///
/// 12 words encode 128 bits; every 3 further words add 32 bits.
fn entropy_bytes(word_count: usize) -> Option<usize> {
    match word_count {
        12 => Some(16),
        15 => Some(20),
        18 => Some(24),
        21 => Some(28),
        24 => Some(32),
        _ => None,
    }
}

/// Generates a fresh English mnemonic from OS entropy.
pub fn generate_phrase(word_count: usize) -> Result<Mnemonic, ProviderError> {
    let len = entropy_bytes(word_count).ok_or(ProviderError::UnsupportedWordCount(word_count))?;

    let mut entropy = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut entropy[..len]);

    Ok(Mnemonic::from_entropy_in(Language::English, &entropy[..len])?)
}

/// Parses a recorded phrase back into a mnemonic.
pub fn parse_phrase(phrase: &str) -> Result<Mnemonic, ProviderError> {
    Ok(Mnemonic::parse_in_normalized(Language::English, phrase)?)
}

/// Derives the account a mnemonic encodes at
/// [`ACCOUNT_DERIVATION_PATH`], with an empty passphrase.
pub fn derive_account(secp: &Secp256k1<All>, mnemonic: &Mnemonic) -> Result<Account, ProviderError> {
    let seed = mnemonic.to_seed("");
    let path: DerivationPath = ACCOUNT_DERIVATION_PATH.parse()?;
    let xprv = XPrv::derive_from_path(&seed, &path)?;

    let mut secret = [0u8; 32];
    secret.copy_from_slice(xprv.private_key().to_bytes().as_slice());
    Ok(Account::from_secret_bytes(secp, secret)?)
}
