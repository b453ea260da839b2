use thiserror::Error;

/// Solana engine errors.
///
/// Every failure is recoverable from the caller's point of view; nothing in
/// this crate aborts the process on bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid blockhash: {0}")]
    InvalidBlockhash(String),

    #[error("derived address lies on the ed25519 curve")]
    OnCurve,

    #[error("no off-curve program address for any bump seed")]
    DerivationExhausted,

    #[error("signature failed: {0}")]
    SignatureFailed(String),

    #[error("account not found in message keys: {0}")]
    AccountNotFound(String),

    #[error("ed25519 backend unavailable: {0}")]
    CryptoUnavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_input() {
        let err = SolError::InvalidInput("bad base58".into());
        assert_eq!(err.to_string(), "invalid input: bad base58");
    }

    #[test]
    fn display_invalid_blockhash() {
        let err = SolError::InvalidBlockhash("expected 32 bytes, got 31".into());
        assert_eq!(
            err.to_string(),
            "invalid blockhash: expected 32 bytes, got 31"
        );
    }

    #[test]
    fn display_unit_variants() {
        assert_eq!(
            SolError::OnCurve.to_string(),
            "derived address lies on the ed25519 curve"
        );
        assert_eq!(
            SolError::DerivationExhausted.to_string(),
            "no off-curve program address for any bump seed"
        );
    }

    #[test]
    fn display_signature_failed() {
        let err = SolError::SignatureFailed("keypair bytes mismatch".into());
        assert_eq!(err.to_string(), "signature failed: keypair bytes mismatch");
    }

    #[test]
    fn display_account_not_found() {
        let err = SolError::AccountNotFound("11111111111111111111111111111111".into());
        assert!(err.to_string().starts_with("account not found"));
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(SolError::Serialization("eof".into()));
        assert!(err.to_string().contains("eof"));
    }
}
