use rand::RngCore;
use rand_core::OsRng;
use zeroize::Zeroizing;

/// Fills a fixed-size buffer with OS randomness.
///
/// The buffer is returned in a [`Zeroizing`] wrapper since it is almost
/// always fresh entropy for a mnemonic or key.
pub fn secret_bytes<const N: usize>() -> Zeroizing<[u8; N]> {
    let mut buf = Zeroizing::new([0u8; N]);
    OsRng.fill_bytes(&mut buf[..]);
    buf
}
