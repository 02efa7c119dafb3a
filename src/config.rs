//! Runtime configuration for the vanity address generator.

use std::path::PathBuf;

use clap::Parser;

use crate::provider::{GenerationMode, SUPPORTED_WORD_COUNTS};

/// Ethereum Vanity Address Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Desired starts of the address (hex, "0x" optional); several may be given
    #[arg(long = "address-start", value_name = "HEX", num_args = 1..)]
    pub address_starts: Vec<String>,

    /// Desired ends of the address (hex); several may be given
    #[arg(long = "address-end", value_name = "HEX", num_args = 1..)]
    pub address_ends: Vec<String>,

    /// Number of matching addresses to generate
    #[arg(short = 'n', long, default_value = "1")]
    pub number_of_addresses: u64,

    /// Derive each candidate from a fresh seed phrase (slows down generation significantly)
    #[arg(long, default_value = "false")]
    pub use_seed_phrase: bool,

    /// Number of words in the seed phrase, if enabled
    #[arg(long, default_value = "12")]
    pub seed_phrase_words: usize,

    /// Number of worker threads (default: CPU count minus one)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// File of known addresses to flag collisions against (first CSV field per line)
    #[arg(long, default_value = "addr.csv")]
    pub address_file: PathBuf,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,

    /// Enable debug-level diagnostics
    #[arg(short = 'v', long, default_value = "false")]
    pub verbose: bool,
}

impl Config {
    /// Returns the number of workers: the explicit override, or the
    /// CPU count minus one reserved core, never less than one.
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| num_cpus::get().saturating_sub(1))
            .max(1)
    }

    /// The candidate generation mode this configuration asks for.
    pub fn generation_mode(&self) -> GenerationMode {
        if self.use_seed_phrase {
            GenerationMode::SeedPhrase {
                word_count: self.seed_phrase_words,
            }
        } else {
            GenerationMode::Random
        }
    }

    /// Validates the configuration.
    ///
    /// Runs before any index loading or worker spawning, so a bad
    /// configuration aborts before compute is spent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.number_of_addresses == 0 {
            return Err(ConfigError::InvalidTargetCount);
        }

        for start in &self.address_starts {
            let lower = start.to_lowercase();
            let fragment = lower.strip_prefix("0x").unwrap_or(&lower);
            validate_hex_fragment(fragment, "start")?;
        }
        for end in &self.address_ends {
            validate_hex_fragment(&end.to_lowercase(), "end")?;
        }

        if self.use_seed_phrase && !SUPPORTED_WORD_COUNTS.contains(&self.seed_phrase_words) {
            return Err(ConfigError::InvalidWordCount(self.seed_phrase_words));
        }

        Ok(())
    }
}

/// An empty fragment is a valid wildcard; anything else must be hex
/// that fits inside a 40-character address.
fn validate_hex_fragment(fragment: &str, side: &str) -> Result<(), ConfigError> {
    if !fragment.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidPattern(format!(
            "address {} {:?} must contain only hex characters (0-9, a-f)",
            side, fragment
        )));
    }
    if fragment.len() > 40 {
        return Err(ConfigError::InvalidPattern(format!(
            "address {} {:?} is longer than a full address (40 characters)",
            side, fragment
        )));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Number of addresses must be at least 1")]
    InvalidTargetCount,

    #[error("Invalid seed phrase word count {0} (supported: 12, 15, 18, 21, 24)")]
    InvalidWordCount(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config() -> Config {
        Config {
            address_starts: vec![],
            address_ends: vec![],
            number_of_addresses: 1,
            use_seed_phrase: false,
            seed_phrase_words: 12,
            workers: None,
            address_file: PathBuf::from("addr.csv"),
            report_interval: 5,
            verbose: false,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(make_test_config().validate().is_ok());
    }

    #[test]
    fn test_prefixed_and_bare_starts_are_valid() {
        let mut config = make_test_config();
        config.address_starts = vec!["0xDEAD".into(), "beef".into(), "".into()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_hex_pattern_rejected() {
        let mut config = make_test_config();
        config.address_starts = vec!["xyz".into()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern(_))
        ));

        let mut config = make_test_config();
        config.address_ends = vec!["ghij".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlong_pattern_rejected() {
        let mut config = make_test_config();
        config.address_starts = vec!["a".repeat(41)];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_target_rejected() {
        let mut config = make_test_config();
        config.number_of_addresses = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTargetCount)
        ));
    }

    #[test]
    fn test_word_count_checked_only_in_seed_phrase_mode() {
        let mut config = make_test_config();
        config.seed_phrase_words = 13;
        assert!(config.validate().is_ok());

        config.use_seed_phrase = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWordCount(13))
        ));

        config.seed_phrase_words = 24;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_worker_count_has_floor_of_one() {
        let mut config = make_test_config();
        config.workers = Some(0);
        assert_eq!(config.worker_count(), 1);

        config.workers = Some(8);
        assert_eq!(config.worker_count(), 8);

        config.workers = None;
        assert!(config.worker_count() >= 1);
    }
}
