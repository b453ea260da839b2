use bip39::{Language, Mnemonic};
use crypto_utils::kdf;
use crypto_utils::random::secret_bytes;
use crypto_utils::{ZeroizingBytes, ZeroizingString};
use unicode_normalization::UnicodeNormalization;

use crate::error::{MnemonicValidationError, WalletError};

/// Word counts accepted by [`validate_mnemonics`].
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// 128 bits of entropy, i.e. a 12-word phrase.
const ENTROPY_LEN: usize = 16;

/// Result of checking one (possibly partially typed) word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum WordMatch {
    /// The word is in the list.
    Exact,
    /// The word is a prefix of at least one listed word.
    Partial,
    NoMatch,
}

/// Generate a new 12-word English mnemonic.
///
/// 16 random bytes plus a 4-bit SHA-256 checksum, split into eleven-bit
/// groups and mapped through the BIP-39 word list.
pub fn generate_mnemonic() -> Result<ZeroizingString, WalletError> {
    let entropy = secret_bytes::<ENTROPY_LEN>();
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy[..])
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(ZeroizingString::new(mnemonic.to_string()))
}

/// Lowercase and NFKD-normalize a phrase before key stretching.
///
/// Whitespace is left as given, so the same text always stretches to the
/// same seed.
pub fn normalize_mnemonic(phrase: &str) -> ZeroizingString {
    ZeroizingString::new(phrase.to_lowercase().nfkd().collect())
}

/// Stretch a mnemonic and optional passphrase into a 64-byte seed.
///
/// PBKDF2-HMAC-SHA512, 2048 rounds, salt `"mnemonic" + passphrase`. The
/// phrase is not checked against the word list or its checksum; callers that
/// need that run [`validate_mnemonics`] or [`validate_mnemonic`] first.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<ZeroizingBytes, WalletError> {
    let normalized = normalize_mnemonic(phrase);
    let salt = ZeroizingString::new(format!("mnemonic{}", passphrase.nfkd().collect::<String>()));
    Ok(kdf::bip39_seed(normalized.as_bytes(), salt.as_bytes())?)
}

/// Check word count and word-list membership.
///
/// Matching is case-insensitive. Positions of unknown words are reported
/// zero-based. The checksum is not verified.
pub fn validate_mnemonics<S: AsRef<str>>(words: &[S]) -> Result<(), MnemonicValidationError> {
    if !VALID_WORD_COUNTS.contains(&words.len()) {
        return Err(MnemonicValidationError::WrongCount {
            count: u32::try_from(words.len()).unwrap_or(u32::MAX),
        });
    }

    let indices: Vec<u32> = words
        .iter()
        .zip(0u32..)
        .filter(|(word, _)| {
            let lower = word.as_ref().to_lowercase();
            Language::English.find_word(&lower).is_none()
        })
        .map(|(_, i)| i)
        .collect();

    if indices.is_empty() {
        Ok(())
    } else {
        Err(MnemonicValidationError::InvalidWords { indices })
    }
}

/// Full BIP-39 check of a phrase, checksum included.
pub fn validate_mnemonic(phrase: &str) -> bool {
    let normalized = normalize_mnemonic(phrase);
    Mnemonic::parse_in_normalized(Language::English, &normalized).is_ok()
}

/// Classify a single word for incremental entry.
///
/// Empty input matches nothing.
pub fn validate_mnemonic_word(word: &str) -> WordMatch {
    let lower = word.trim().to_lowercase();
    if lower.is_empty() {
        return WordMatch::NoMatch;
    }
    if Language::English.find_word(&lower).is_some() {
        WordMatch::Exact
    } else if !Language::English.words_by_prefix(&lower).is_empty() {
        WordMatch::Partial
    } else {
        WordMatch::NoMatch
    }
}

/// The English word list, for autocomplete.
pub fn word_list() -> &'static [&'static str] {
    Language::English.word_list()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const RIVAL: &str = "rival pledge marriage dove vicious okay ethics answer transfer link pave whip";

    #[test]
    fn generate_mnemonic_12_words() {
        let mnemonic = generate_mnemonic().unwrap();
        let words: Vec<&str> = mnemonic.split_whitespace().collect();
        assert_eq!(words.len(), 12);
        assert!(validate_mnemonics(&words).is_ok());
        assert!(validate_mnemonic(&mnemonic));
    }

    #[test]
    fn generated_mnemonics_differ() {
        let a = generate_mnemonic().unwrap();
        let b = generate_mnemonic().unwrap();
        assert_ne!(&*a, &*b);
    }

    #[test]
    fn bip39_test_vector() {
        let seed = mnemonic_to_seed(ABANDON, "").unwrap();
        assert_eq!(
            hex::encode(&*seed),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn bip39_test_vector_with_passphrase() {
        let seed = mnemonic_to_seed(ABANDON, "TREZOR").unwrap();
        assert_eq!(
            hex::encode(&*seed),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553\
             1f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn seed_is_case_insensitive() {
        let lower = mnemonic_to_seed(RIVAL, "").unwrap();
        let upper = mnemonic_to_seed(&RIVAL.to_uppercase(), "").unwrap();
        assert_eq!(&*lower, &*upper);
    }

    #[test]
    fn passphrase_changes_seed() {
        let plain = mnemonic_to_seed(RIVAL, "").unwrap();
        let salted = mnemonic_to_seed(RIVAL, "hunter2").unwrap();
        assert_ne!(&*plain, &*salted);
    }

    #[test]
    fn normalization_decomposes() {
        // U+00E9 decomposes to 'e' + U+0301 under NFKD.
        let normalized = normalize_mnemonic("Caf\u{e9}");
        assert_eq!(&*normalized, "cafe\u{301}");
    }

    #[test]
    fn wrong_count_reported() {
        let words = ["abandon"; 11];
        assert_eq!(
            validate_mnemonics(&words),
            Err(MnemonicValidationError::WrongCount { count: 11 })
        );
        let empty: [&str; 0] = [];
        assert_eq!(
            validate_mnemonics(&empty),
            Err(MnemonicValidationError::WrongCount { count: 0 })
        );
    }

    #[test]
    fn every_valid_count_accepted() {
        for count in VALID_WORD_COUNTS {
            let words = vec!["zoo"; count];
            assert!(validate_mnemonics(&words).is_ok(), "{count}");
        }
    }

    #[test]
    fn unknown_words_reported_by_position() {
        let mut words: Vec<&str> = RIVAL.split(' ').collect();
        words[0] = "rivall";
        words[7] = "xyz";
        assert_eq!(
            validate_mnemonics(&words),
            Err(MnemonicValidationError::InvalidWords { indices: vec![0, 7] })
        );
    }

    #[test]
    fn word_matching_ignores_case() {
        let words: Vec<String> = RIVAL.split(' ').map(str::to_uppercase).collect();
        assert!(validate_mnemonics(&words).is_ok());
    }

    #[test]
    fn checksum_validation() {
        assert!(validate_mnemonic(ABANDON));
        // Valid words, bad checksum.
        assert!(!validate_mnemonic(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon"
        ));
        assert!(!validate_mnemonic("invalid mnemonic phrase here"));
    }

    #[test]
    fn single_word_classification() {
        assert_eq!(validate_mnemonic_word("abandon"), WordMatch::Exact);
        assert_eq!(validate_mnemonic_word("ZOO"), WordMatch::Exact);
        assert_eq!(validate_mnemonic_word("aban"), WordMatch::Partial);
        assert_eq!(validate_mnemonic_word("xq"), WordMatch::NoMatch);
        assert_eq!(validate_mnemonic_word(""), WordMatch::NoMatch);
    }

    #[test]
    fn word_list_is_complete() {
        let list = word_list();
        assert_eq!(list.len(), 2048);
        assert_eq!(list[0], "abandon");
        assert_eq!(list[2047], "zoo");
    }
}
