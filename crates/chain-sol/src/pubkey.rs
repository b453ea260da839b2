//! Solana public keys and address text.
//!
//! An address is the Base58 encoding of the raw 32-byte Ed25519 public key
//! (or of a program-derived address). No hashing is involved.

use std::fmt;
use std::str::FromStr;

use crate::base58;
use crate::error::SolError;

/// A 32-byte account address. Equality is byte equality.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse Base58 text that must decode to exactly 32 bytes.
    pub fn from_base58(text: &str) -> Result<Self, SolError> {
        base58::decode_array::<32>(text)
            .map(Self)
            .map_err(|e| SolError::InvalidInput(format!("invalid address {text:?}: {e}")))
    }

    pub fn to_base58(&self) -> String {
        base58::encode(&self.0)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub const fn to_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl From<[u8; 32]> for PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for PublicKey {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base58())
    }
}

/// Whether `address` is Base58 text for a 32-byte key.
pub fn validate_address(address: &str) -> bool {
    PublicKey::from_base58(address).is_ok()
}
