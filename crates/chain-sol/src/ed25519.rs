//! Ed25519 primitive behind an explicit handle.
//!
//! Callers construct a backend and pass it into every operation that needs
//! key generation, signing or the on-curve test. There is no process-wide
//! initialisation state.

use curve25519_dalek::edwards::CompressedEdwardsY;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::error::SolError;
use crate::pubkey::PublicKey;

pub const SEED_LEN: usize = 32;
pub const SECRET_KEY_LEN: usize = 64;
pub const SIGNATURE_LEN: usize = 64;

pub trait Ed25519Backend {
    /// Expand a 32-byte seed into `(public key, seed || public key)`.
    fn keypair_from_seed(
        &self,
        seed: &[u8; SEED_LEN],
    ) -> Result<([u8; 32], Zeroizing<[u8; SECRET_KEY_LEN]>), SolError>;

    /// Deterministic detached signature over `message`.
    fn sign_detached(
        &self,
        message: &[u8],
        secret_key: &[u8; SECRET_KEY_LEN],
    ) -> Result<[u8; SIGNATURE_LEN], SolError>;

    /// Whether `candidate` decodes to a point on the Ed25519 curve.
    fn is_on_curve(&self, candidate: &[u8; 32]) -> bool;
}

/// Production backend over `ed25519-dalek`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DalekBackend;

impl DalekBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Ed25519Backend for DalekBackend {
    fn keypair_from_seed(
        &self,
        seed: &[u8; SEED_LEN],
    ) -> Result<([u8; 32], Zeroizing<[u8; SECRET_KEY_LEN]>), SolError> {
        let signing_key = SigningKey::from_bytes(seed);
        let public = signing_key.verifying_key().to_bytes();
        let secret = Zeroizing::new(signing_key.to_keypair_bytes());
        Ok((public, secret))
    }

    fn sign_detached(
        &self,
        message: &[u8],
        secret_key: &[u8; SECRET_KEY_LEN],
    ) -> Result<[u8; SIGNATURE_LEN], SolError> {
        // Rejects secrets whose public half does not match the seed half.
        let signing_key = SigningKey::from_keypair_bytes(secret_key)
            .map_err(|e| SolError::SignatureFailed(format!("invalid keypair bytes: {e}")))?;
        let signature = signing_key
            .try_sign(message)
            .map_err(|e| SolError::SignatureFailed(e.to_string()))?;
        Ok(signature.to_bytes())
    }

    fn is_on_curve(&self, candidate: &[u8; 32]) -> bool {
        // Decompression succeeds exactly when the Montgomery conversion would.
        CompressedEdwardsY(*candidate).decompress().is_some()
    }
}

/// Strict Ed25519 verification of a detached signature.
pub fn verify_detached(public_key: &PublicKey, message: &[u8], signature: &[u8; SIGNATURE_LEN]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
        return false;
    };
    verifying_key
        .verify_strict(message, &Signature::from_bytes(signature))
        .is_ok()
}
