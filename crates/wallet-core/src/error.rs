use chain_sol::error::SolError;
use crypto_utils::error::CryptoError;
use thiserror::Error;

#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum WalletError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid blockhash: {0}")]
    InvalidBlockhash(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Transaction build failed: {0}")]
    TransactionFailed(String),

    #[error("Crypto backend unavailable: {0}")]
    CryptoUnavailable(String),
}

/// Why a word list is not an acceptable mnemonic.
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum MnemonicValidationError {
    #[error("Wrong word count: {count} (expected 12, 15, 18, 21 or 24)")]
    WrongCount { count: u32 },

    /// Zero-based positions of the words missing from the word list.
    #[error("Unknown words at positions {indices:?}")]
    InvalidWords { indices: Vec<u32> },
}

impl From<CryptoError> for WalletError {
    fn from(e: CryptoError) -> Self {
        WalletError::DerivationFailed(e.to_string())
    }
}

impl From<SolError> for WalletError {
    fn from(e: SolError) -> Self {
        match e {
            SolError::InvalidBlockhash(msg) => WalletError::InvalidBlockhash(msg),
            SolError::SignatureFailed(msg) => WalletError::SigningFailed(msg),
            SolError::CryptoUnavailable(msg) => WalletError::CryptoUnavailable(msg),
            SolError::OnCurve | SolError::DerivationExhausted => {
                WalletError::DerivationFailed(e.to_string())
            }
            SolError::InvalidInput(_) | SolError::AccountNotFound(_) | SolError::Serialization(_) => {
                WalletError::TransactionFailed(e.to_string())
            }
        }
    }
}

impl From<MnemonicValidationError> for WalletError {
    fn from(e: MnemonicValidationError) -> Self {
        WalletError::InvalidMnemonic(e.to_string())
    }
}
