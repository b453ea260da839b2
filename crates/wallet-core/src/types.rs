use serde::{Deserialize, Serialize};

/// Which derivation path an account index maps to.
///
/// Wallets disagree here, so the scheme is configuration rather than a
/// constant. [`DerivationScheme::Bip44Change`] is what most Solana wallets use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DerivationScheme {
    /// `m/44'/501'/{account}'/0'`
    #[default]
    Bip44Change,
    /// `m/44'/501'/{account}'`
    Bip44,
    /// Any path with `{account}` substituted, e.g. `m/44'/501'/0'/{account}'`.
    Custom { template: String },
}

impl DerivationScheme {
    pub fn path(&self, account: u32) -> String {
        match self {
            DerivationScheme::Bip44Change => format!("m/44'/501'/{account}'/0'"),
            DerivationScheme::Bip44 => format!("m/44'/501'/{account}'"),
            DerivationScheme::Custom { template } => {
                template.replace("{account}", &account.to_string())
            }
        }
    }
}

/// A derived wallet account, as handed to the host application.
#[derive(Clone, PartialEq, Eq, uniffi::Record)]
pub struct DerivedAccount {
    /// Base58 public key.
    pub address: String,
    /// Base58 of the 64-byte secret (seed followed by public key).
    pub secret_key: String,
    pub derivation_path: String,
}

impl std::fmt::Debug for DerivedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedAccount")
            .field("address", &self.address)
            .field("secret_key", &"[REDACTED]")
            .field("derivation_path", &self.derivation_path)
            .finish()
    }
}

/// One account reference of a host-built instruction.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct AccountMetaData {
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// A host-built instruction. Keys are Base58 text.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct InstructionData {
    pub program_id: String,
    pub accounts: Vec<AccountMetaData>,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scheme_is_bip44_change() {
        assert_eq!(DerivationScheme::default(), DerivationScheme::Bip44Change);
        assert_eq!(DerivationScheme::default().path(0), "m/44'/501'/0'/0'");
    }

    #[test]
    fn scheme_paths() {
        assert_eq!(DerivationScheme::Bip44Change.path(7), "m/44'/501'/7'/0'");
        assert_eq!(DerivationScheme::Bip44.path(7), "m/44'/501'/7'");
        assert_eq!(
            DerivationScheme::Custom {
                template: "m/44'/501'/0'/{account}'".into()
            }
            .path(3),
            "m/44'/501'/0'/3'"
        );
    }

    #[test]
    fn scheme_json_shape() {
        let json = serde_json::to_string(&DerivationScheme::Bip44).unwrap();
        assert_eq!(json, r#"{"kind":"bip44"}"#);

        let custom: DerivationScheme =
            serde_json::from_str(r#"{"kind":"custom","template":"m/44'/501'/{account}'"}"#).unwrap();
        assert_eq!(custom.path(2), "m/44'/501'/2'");
    }

    #[test]
    fn derived_account_debug_hides_secret() {
        let account = DerivedAccount {
            address: "addr".into(),
            secret_key: "super-secret".into(),
            derivation_path: "m".into(),
        };
        let debug = format!("{account:?}");
        assert!(debug.contains("addr"));
        assert!(!debug.contains("super-secret"));
    }
}
