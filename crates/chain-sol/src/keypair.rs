use std::fmt;

use zeroize::Zeroizing;

use crate::base58;
use crate::ed25519::{Ed25519Backend, SECRET_KEY_LEN, SEED_LEN, SIGNATURE_LEN};
use crate::error::SolError;
use crate::pubkey::PublicKey;

/// An Ed25519 keypair in Solana's 64-byte secret layout.
///
/// Bytes `0..32` of the secret are the seed and bytes `32..64` are the public
/// key. The secret is wiped on drop.
#[derive(Clone)]
pub struct Keypair {
    secret: Zeroizing<[u8; SECRET_KEY_LEN]>,
    public: PublicKey,
}

impl Keypair {
    /// Expand a 32-byte seed (e.g. a SLIP-0010 leaf key) into a keypair.
    pub fn from_seed(backend: &impl Ed25519Backend, seed: &[u8; SEED_LEN]) -> Result<Self, SolError> {
        let (public, secret) = backend.keypair_from_seed(seed)?;
        Ok(Self {
            secret,
            public: PublicKey::new(public),
        })
    }

    /// Build a keypair from its 64-byte secret.
    ///
    /// A bare 32-byte seed is rejected, as is a secret whose trailing half is
    /// not the public key of its leading half.
    pub fn from_secret_bytes(backend: &impl Ed25519Backend, bytes: &[u8]) -> Result<Self, SolError> {
        if bytes.len() != SECRET_KEY_LEN {
            return Err(SolError::InvalidInput(format!(
                "secret key must be {SECRET_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        seed.copy_from_slice(&bytes[..SEED_LEN]);
        let keypair = Self::from_seed(backend, &seed)?;

        if keypair.public.as_bytes()[..] != bytes[SEED_LEN..] {
            return Err(SolError::InvalidInput(
                "public half of secret key does not match its seed".into(),
            ));
        }
        Ok(keypair)
    }

    pub fn from_base58_secret(backend: &impl Ed25519Backend, text: &str) -> Result<Self, SolError> {
        let bytes = Zeroizing::new(base58::decode(text)?);
        Self::from_secret_bytes(backend, &bytes)
    }

    pub fn to_base58_secret(&self) -> Zeroizing<String> {
        Zeroizing::new(base58::encode(&self.secret[..]))
    }

    pub fn pubkey(&self) -> PublicKey {
        self.public
    }

    pub fn secret_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.secret
    }

    /// Detached signature over arbitrary bytes.
    pub fn sign_message(
        &self,
        backend: &impl Ed25519Backend,
        message: &[u8],
    ) -> Result<[u8; SIGNATURE_LEN], SolError> {
        backend.sign_detached(message, &self.secret)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public", &self.public)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
