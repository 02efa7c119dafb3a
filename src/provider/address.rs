//! Ethereum address representation.

use std::fmt;

use super::keccak256;

/// A 20-byte Ethereum address.
///
/// The canonical textual form used throughout the search is the
/// lowercase hex string with a `0x` prefix; the EIP-55 checksummed form
/// is only produced for display.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    #[inline]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex, no `0x` prefix.
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Canonical form: lowercase hex with `0x` prefix.
    #[inline]
    pub fn to_hex_prefixed(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// EIP-55 checksummed form: a hex letter is uppercased when the
    /// corresponding nibble of `keccak256(lowercase_hex)` is >= 8.
    pub fn to_checksum(&self) -> String {
        let hex_addr = self.to_hex();
        let hash = keccak256(hex_addr.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in hex_addr.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex_prefixed())
    }
}

impl fmt::Display for Address {
    /// Displays the checksummed form so printed addresses are
    /// verifiable by wallets.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}
