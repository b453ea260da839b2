//! Base58 text codec for keys, signatures and blockhashes.
//!
//! Solana uses the Bitcoin alphabet. The byte string is read as a big-endian
//! integer and every leading zero byte becomes a leading `'1'`, so the
//! length survives a round trip.

use crate::error::SolError;

pub fn encode(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode Base58 text. Characters outside the alphabet are rejected.
pub fn decode(text: &str) -> Result<Vec<u8>, SolError> {
    bs58::decode(text)
        .into_vec()
        .map_err(|e| SolError::InvalidInput(format!("base58 decode failed: {e}")))
}

/// Decode Base58 text that must yield exactly `N` bytes.
pub fn decode_array<const N: usize>(text: &str) -> Result<[u8; N], SolError> {
    let bytes = decode(text)?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidInput(format!("expected {N} bytes, got {}", v.len()))
    })
}
