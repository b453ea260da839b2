use hmac::Hmac;
use sha2::Sha512;

use crate::error::CryptoError;
use crate::zeroizing::ZeroizingBytes;

/// Iteration count fixed by BIP-39 for mnemonic-to-seed stretching.
pub const BIP39_PBKDF2_ROUNDS: u32 = 2048;

/// Length of a BIP-39 seed in bytes.
pub const BIP39_SEED_LEN: usize = 64;

/// Stretches `password` with PBKDF2-HMAC-SHA512 into `out_len` bytes.
///
/// The output is wrapped in [`ZeroizingBytes`] because every caller in this
/// workspace feeds it straight into key derivation.
pub fn pbkdf2_sha512(
    password: &[u8],
    salt: &[u8],
    rounds: u32,
    out_len: usize,
) -> Result<ZeroizingBytes, CryptoError> {
    if rounds == 0 {
        return Err(CryptoError::InvalidInput("pbkdf2 rounds must be > 0".into()));
    }
    if out_len == 0 {
        return Err(CryptoError::InvalidKeyLength);
    }

    let mut output = ZeroizingBytes::new(vec![0u8; out_len]);
    pbkdf2::pbkdf2::<Hmac<Sha512>>(password, salt, rounds, output.as_mut_slice())
        .map_err(|e| CryptoError::KdfFailed(format!("pbkdf2-hmac-sha512 failed: {e}")))?;

    Ok(output)
}

/// Derives the 64-byte BIP-39 seed from an already-normalized mnemonic and salt.
///
/// The salt is `"mnemonic" || passphrase`; normalization of both inputs is the
/// caller's job.
pub fn bip39_seed(normalized_mnemonic: &[u8], salt: &[u8]) -> Result<ZeroizingBytes, CryptoError> {
    pbkdf2_sha512(normalized_mnemonic, salt, BIP39_PBKDF2_ROUNDS, BIP39_SEED_LEN)
}
