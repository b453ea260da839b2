//! SLIP-0010 hierarchical derivation for Ed25519.
//!
//! Ed25519 has no public-parent derivation, so every step is hardened. Path
//! segments are hardened whether or not they carry the `'` (or `h`) marker:
//! `m/44/501/0/0` and `m/44'/501'/0'/0'` name the same key. Indices of
//! 2^31 and above are rejected, since hardening them would alias a lower path.

use chain_sol::ed25519::Ed25519Backend;
use chain_sol::Keypair;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WalletError;

type HmacSha512 = Hmac<Sha512>;

/// Bit OR'd into every child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const MASTER_HMAC_KEY: &[u8] = b"ed25519 seed";

/// One node of the derivation tree. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyNode {
    private_key: [u8; 32],
    chain_code: [u8; 32],
}

impl KeyNode {
    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Split a 64-byte HMAC-SHA512 digest into key and chain code.
    fn from_hmac(mac: HmacSha512) -> Self {
        let mut digest = mac.finalize().into_bytes();
        let mut node = KeyNode {
            private_key: [0u8; 32],
            chain_code: [0u8; 32],
        };
        node.private_key.copy_from_slice(&digest[..32]);
        node.chain_code.copy_from_slice(&digest[32..]);
        digest.as_mut_slice().zeroize();
        node
    }
}

/// `HMAC-SHA512(key = "ed25519 seed", data = seed)`.
pub fn master_key(seed: &[u8]) -> Result<KeyNode, WalletError> {
    let mut mac = HmacSha512::new_from_slice(MASTER_HMAC_KEY)
        .map_err(|e| WalletError::DerivationFailed(e.to_string()))?;
    mac.update(seed);
    Ok(KeyNode::from_hmac(mac))
}

/// Hardened child: `HMAC-SHA512(chain_code, 0x00 || key || be32(index | 2^31))`.
pub fn derive_child(parent: &KeyNode, index: u32) -> Result<KeyNode, WalletError> {
    let mut mac = HmacSha512::new_from_slice(&parent.chain_code)
        .map_err(|e| WalletError::DerivationFailed(e.to_string()))?;
    mac.update(&[0x00]);
    mac.update(&parent.private_key);
    mac.update(&(index | HARDENED_OFFSET).to_be_bytes());
    Ok(KeyNode::from_hmac(mac))
}

/// Parse `m/44'/501'/0'/0'` into hardened indices.
///
/// A segment is a decimal index below 2^31 with an optional `'` or `h`
/// suffix. The returned indices already have [`HARDENED_OFFSET`] set.
pub fn parse_path(path: &str) -> Result<Vec<u32>, WalletError> {
    let mut segments = path.trim().split('/');
    if segments.next() != Some("m") {
        return Err(WalletError::DerivationFailed(format!(
            "path must start with m: {path:?}"
        )));
    }

    segments
        .map(|segment| {
            let digits = segment
                .strip_suffix('\'')
                .or_else(|| segment.strip_suffix('h'))
                .unwrap_or(segment);
            let index = digits.parse::<u32>().map_err(|e| {
                WalletError::DerivationFailed(format!("invalid path segment {segment:?}: {e}"))
            })?;
            if index >= HARDENED_OFFSET {
                return Err(WalletError::DerivationFailed(format!(
                    "path segment {segment:?} out of range"
                )));
            }
            Ok(index | HARDENED_OFFSET)
        })
        .collect()
}

/// Fold the master key of `seed` through every index of `path`.
pub fn derive_path(seed: &[u8], path: &str) -> Result<KeyNode, WalletError> {
    let indices = parse_path(path)?;
    let mut node = master_key(seed)?;
    for index in indices {
        node = derive_child(&node, index)?;
    }
    Ok(node)
}

/// Derive the Solana keypair at `path`.
pub fn derive_keypair(
    backend: &impl Ed25519Backend,
    seed: &[u8],
    path: &str,
) -> Result<Keypair, WalletError> {
    let node = derive_path(seed, path)?;
    let keypair = Keypair::from_seed(backend, node.private_key())?;
    tracing::debug!(path, pubkey = %keypair.pubkey(), "derived keypair");
    Ok(keypair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_sol::DalekBackend;

    // SLIP-0010 test vector 1 for ed25519.
    const SLIP10_SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn slip10_seed() -> Vec<u8> {
        hex::decode(SLIP10_SEED).unwrap()
    }

    #[test]
    fn slip10_master() {
        let node = master_key(&slip10_seed()).unwrap();
        assert_eq!(
            hex::encode(node.private_key()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(node.chain_code()),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
    }

    #[test]
    fn slip10_master_public_key() {
        let kp = derive_keypair(&DalekBackend, &slip10_seed(), "m").unwrap();
        assert_eq!(
            hex::encode(kp.pubkey().as_bytes()),
            "a4b2856bfec510abab89753fac1ac0e1112364e7d250545963f135f2a33188ed"
        );
    }

    #[test]
    fn slip10_hardened_children() {
        let node = derive_path(&slip10_seed(), "m/0'").unwrap();
        assert_eq!(
            hex::encode(node.private_key()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
        assert_eq!(
            hex::encode(node.chain_code()),
            "8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69"
        );

        let node = derive_path(&slip10_seed(), "m/0'/1'").unwrap();
        assert_eq!(
            hex::encode(node.private_key()),
            "b1d0bad404bf35da785a64ca1ac54b2617211d2777696fbffaf208f746ae84f2"
        );
        assert_eq!(
            hex::encode(node.chain_code()),
            "a320425f77d1b5c2505a6b1b27382b37368ee640e3557c315416801243552f14"
        );
    }

    #[test]
    fn derive_child_sets_hardened_bit() {
        let master = master_key(&slip10_seed()).unwrap();
        let a = derive_child(&master, 0).unwrap();
        let b = derive_child(&master, HARDENED_OFFSET).unwrap();
        assert_eq!(a.private_key(), b.private_key());
    }

    #[test]
    fn parse_path_hardens_everything() {
        let expected: Vec<u32> = [44, 501, 0, 0].iter().map(|i| i | HARDENED_OFFSET).collect();
        assert_eq!(parse_path("m/44'/501'/0'/0'").unwrap(), expected);
        assert_eq!(parse_path("m/44/501/0/0").unwrap(), expected);
        assert_eq!(parse_path("m/44h/501h/0h/0").unwrap(), expected);
    }

    #[test]
    fn unmarked_segments_derive_the_same_key() {
        let seed = slip10_seed();
        let marked = derive_path(&seed, "m/44'/501'/0'/0'").unwrap();
        let bare = derive_path(&seed, "m/44/501/0/0").unwrap();
        assert_eq!(marked.private_key(), bare.private_key());
    }

    #[test]
    fn out_of_range_segment_does_not_alias() {
        assert_eq!(parse_path("m/2147483647'").unwrap(), vec![u32::MAX]);
        for path in ["m/2147483648'", "m/2147483648h", "m/4294967295"] {
            assert!(
                matches!(parse_path(path), Err(WalletError::DerivationFailed(_))),
                "{path}"
            );
        }
    }

    #[test]
    fn parse_path_master_only() {
        assert!(parse_path("m").unwrap().is_empty());
    }

    #[test]
    fn parse_path_rejects_garbage() {
        for path in ["", "44'/501'", "M/44'", "m/", "m/44'//0'", "m/abc", "m/-1", "m/2147483648", "m/1''"] {
            assert!(
                matches!(parse_path(path), Err(WalletError::DerivationFailed(_))),
                "{path:?} should be rejected"
            );
        }
    }

    #[test]
    fn keypair_secret_embeds_public_key() {
        let kp = derive_keypair(&DalekBackend, &slip10_seed(), "m/44'/501'/0'/0'").unwrap();
        assert_eq!(&kp.secret_bytes()[32..], kp.pubkey().as_bytes());
    }
}
