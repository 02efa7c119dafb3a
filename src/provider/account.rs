//! Ethereum account: a secret key and its derived address.

use secp256k1::{All, PublicKey, Secp256k1, SecretKey};

use super::{keccak256, Address};

/// A generated Ethereum account.
#[derive(Debug, Clone)]
pub struct Account {
    /// The 32-byte secret key.
    secret: [u8; 32],
    /// The address derived from the corresponding public key.
    address: Address,
}

impl Account {
    /// Generates a fresh account from the secure RNG.
    #[inline]
    pub fn random(secp: &Secp256k1<All>) -> Self {
        let (secret_key, public_key) = secp.generate_keypair(&mut rand::thread_rng());
        Self {
            secret: secret_key.secret_bytes(),
            address: Self::derive_address(&public_key),
        }
    }

    /// Builds an account from existing secret key bytes.
    ///
    /// Fails if the bytes are not a valid secp256k1 scalar (zero or
    /// above the curve order).
    pub fn from_secret_bytes(
        secp: &Secp256k1<All>,
        secret: [u8; 32],
    ) -> Result<Self, secp256k1::Error> {
        let secret_key = SecretKey::from_slice(&secret)?;
        let public_key = PublicKey::from_secret_key(secp, &secret_key);
        Ok(Self {
            secret,
            address: Self::derive_address(&public_key),
        })
    }

    /// Keccak-256 of the uncompressed public key minus its 0x04 tag,
    /// last 20 bytes.
    #[inline]
    fn derive_address(public_key: &PublicKey) -> Address {
        let uncompressed = public_key.serialize_uncompressed();
        let hash = keccak256(&uncompressed[1..]);

        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Address::from_bytes(bytes)
    }

    /// Secret key as lowercase hex, no `0x` prefix.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret)
    }

    /// Raw secret key bytes.
    pub fn secret_bytes(&self) -> &[u8; 32] {
        &self.secret
    }

    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}
