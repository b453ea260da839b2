use thiserror::Error;

/// Errors raised by the shared cryptographic helpers.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    KdfFailed(String),

    #[error("invalid key length")]
    InvalidKeyLength,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_kdf_failed() {
        let err = CryptoError::KdfFailed("output too long".into());
        assert_eq!(err.to_string(), "key derivation failed: output too long");
    }

    #[test]
    fn display_invalid_key_length() {
        assert_eq!(CryptoError::InvalidKeyLength.to_string(), "invalid key length");
    }

    #[test]
    fn display_invalid_input() {
        let err = CryptoError::InvalidInput("zero rounds".into());
        assert_eq!(err.to_string(), "invalid input: zero rounds");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(CryptoError::KdfFailed("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
