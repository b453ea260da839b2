//! Program-derived addresses.
//!
//! A PDA is `SHA-256(seed_0 || .. || seed_n || program_id || "ProgramDerivedAddress")`
//! provided the digest is NOT a valid Ed25519 point, so no private key can
//! exist for it. [`find_program_address`] searches bump seeds from 255 down to
//! 0 for the first off-curve digest.
//!
//! Seed count and length are not limited here. The on-chain runtime caps
//! them at 16 seeds of at most 32 bytes, so an address derived from longer
//! seeds cannot be signed for by its program.

use sha2::{Digest, Sha256};

use crate::ed25519::Ed25519Backend;
use crate::error::SolError;
use crate::pubkey::PublicKey;

/// Marker appended after the program id.
pub const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Derive the address for an exact seed list.
///
/// Fails with [`SolError::OnCurve`] if the digest is a curve point. Only the
/// result is checked; seeds themselves may well be ordinary wallet keys.
pub fn create_program_address(
    backend: &impl Ed25519Backend,
    seeds: &[&[u8]],
    program_id: &PublicKey,
) -> Result<PublicKey, SolError> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    let hash: [u8; 32] = hasher.finalize().into();

    if backend.is_on_curve(&hash) {
        return Err(SolError::OnCurve);
    }
    Ok(PublicKey::new(hash))
}

/// Find the canonical PDA and its bump seed.
pub fn find_program_address(
    backend: &impl Ed25519Backend,
    seeds: &[&[u8]],
    program_id: &PublicKey,
) -> Result<(PublicKey, u8), SolError> {
    for bump in (0u8..=255).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        with_bump.push(&bump_seed);

        match create_program_address(backend, &with_bump, program_id) {
            Ok(address) => {
                tracing::debug!(program = %program_id, %address, bump, "found program address");
                return Ok((address, bump));
            }
            Err(SolError::OnCurve) => continue,
            Err(e) => return Err(e),
        }
    }

    tracing::warn!(program = %program_id, "every bump seed produced an on-curve address");
    Err(SolError::DerivationExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ed25519::{DalekBackend, SECRET_KEY_LEN, SIGNATURE_LEN};
    use zeroize::Zeroizing;

    /// Backend that reports every candidate as a curve point.
    struct AlwaysOnCurve;

    impl Ed25519Backend for AlwaysOnCurve {
        fn keypair_from_seed(
            &self,
            _seed: &[u8; 32],
        ) -> Result<([u8; 32], Zeroizing<[u8; SECRET_KEY_LEN]>), SolError> {
            Err(SolError::CryptoUnavailable("test backend".into()))
        }

        fn sign_detached(
            &self,
            _message: &[u8],
            _secret_key: &[u8; SECRET_KEY_LEN],
        ) -> Result<[u8; SIGNATURE_LEN], SolError> {
            Err(SolError::CryptoUnavailable("test backend".into()))
        }

        fn is_on_curve(&self, _candidate: &[u8; 32]) -> bool {
            true
        }
    }

    fn program() -> PublicKey {
        PublicKey::new([0x77; 32])
    }

    #[test]
    fn found_address_is_off_curve() {
        let (address, _) = find_program_address(&DalekBackend, &[b"vault"], &program()).unwrap();
        assert!(!DalekBackend.is_on_curve(address.as_bytes()));
    }

    #[test]
    fn found_address_matches_create_with_bump() {
        let (address, bump) =
            find_program_address(&DalekBackend, &[b"vault", &[1, 2, 3]], &program()).unwrap();
        let direct =
            create_program_address(&DalekBackend, &[b"vault", &[1, 2, 3], &[bump]], &program())
                .unwrap();
        assert_eq!(address, direct);
    }

    #[test]
    fn higher_bumps_were_on_curve() {
        let (_, bump) = find_program_address(&DalekBackend, &[b"seed"], &program()).unwrap();
        for higher in (u16::from(bump) + 1)..=255 {
            let higher = higher as u8;
            let result = create_program_address(&DalekBackend, &[b"seed", &[higher]], &program());
            assert_eq!(result, Err(SolError::OnCurve));
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = find_program_address(&DalekBackend, &[b"x"], &program()).unwrap();
        let b = find_program_address(&DalekBackend, &[b"x"], &program()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn on_curve_digest_is_rejected() {
        let err = create_program_address(&AlwaysOnCurve, &[b"a"], &program()).unwrap_err();
        assert_eq!(err, SolError::OnCurve);
    }

    #[test]
    fn exhausted_search_is_an_error() {
        let err = find_program_address(&AlwaysOnCurve, &[b"a"], &program()).unwrap_err();
        assert_eq!(err, SolError::DerivationExhausted);
    }

    #[test]
    fn long_seeds_still_derive() {
        let long = [7u8; 40];
        let (address, bump) = find_program_address(&DalekBackend, &[&long[..]], &program()).unwrap();
        let direct = create_program_address(&DalekBackend, &[&long[..], &[bump]], &program()).unwrap();
        assert_eq!(address, direct);
        assert!(!DalekBackend.is_on_curve(address.as_bytes()));
    }

    #[test]
    fn many_seeds_still_derive() {
        let seed: &[u8] = b"s";
        let seeds = vec![seed; 20];
        assert!(find_program_address(&DalekBackend, &seeds, &program()).is_ok());
    }

    #[test]
    fn digest_covers_seed_bytes_in_order() {
        let mut hasher = Sha256::new();
        hasher.update(b"ab");
        hasher.update(program().as_bytes());
        hasher.update(PDA_MARKER);
        let expected: [u8; 32] = hasher.finalize().into();

        // Seed boundaries do not matter, only the concatenated bytes.
        for seeds in [&[&b"ab"[..]][..], &[&b"a"[..], &b"b"[..]][..]] {
            match create_program_address(&DalekBackend, seeds, &program()) {
                Ok(address) => assert_eq!(address.to_bytes(), expected),
                Err(err) => assert_eq!(err, SolError::OnCurve),
            }
        }
    }
}
