//! Known-address index for collision reporting.
//!
//! Loads a delimited text file of previously seen addresses (one record
//! per line, address in the first field) into a set that workers query
//! read-only. A hit never stops or redirects the search; it only flags
//! the reported match.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

/// Immutable set of canonical (lowercase, `0x`-prefixed) addresses.
#[derive(Debug, Default)]
pub struct AddressIndex {
    addresses: HashSet<String>,
}

impl AddressIndex {
    /// Loads the index from a file.
    ///
    /// A missing file yields an empty index. An unreadable file also
    /// yields an empty index, with a warning: the list is informational,
    /// so losing it must not abort the search job.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("no address file at {}, collision checks disabled", path.display());
            return Self::default();
        }

        let started = Instant::now();
        match Self::read_file(path) {
            Ok(addresses) => {
                info!(
                    "loaded {} existing addresses from {} in {:.2}s",
                    addresses.len(),
                    path.display(),
                    started.elapsed().as_secs_f64()
                );
                Self { addresses }
            }
            Err(err) => {
                warn!(
                    "could not read address file {}: {}; continuing without collision checks",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Builds an index directly from address strings.
    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = addresses
            .into_iter()
            .filter_map(|a| canonicalize_record(a.as_ref()))
            .collect();
        Self { addresses }
    }

    fn read_file(path: &Path) -> std::io::Result<HashSet<String>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut addresses = HashSet::new();
        for line in reader.lines() {
            if let Some(address) = canonicalize_record(&line?) {
                addresses.insert(address);
            }
        }
        Ok(addresses)
    }

    /// True if the canonical form of the address was seen before.
    ///
    /// Callers pass the canonical lowercase `0x`-prefixed form; that is
    /// what generated candidates already use in the hot loop.
    #[inline]
    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Extracts the address from one record: first comma-delimited field,
/// trimmed, lowercased, `0x` prefix added when absent. Empty records
/// yield nothing.
fn canonicalize_record(record: &str) -> Option<String> {
    let field = record.split(',').next().unwrap_or("").trim();
    if field.is_empty() {
        return None;
    }

    let lower = field.to_lowercase();
    if lower.starts_with("0x") {
        Some(lower)
    } else {
        Some(format!("0x{lower}"))
    }
}
