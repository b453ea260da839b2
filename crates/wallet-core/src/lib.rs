pub mod error;
pub mod hd_derivation;
pub mod mnemonic;
pub mod types;

use chain_sol::{DalekBackend, Instruction, Keypair, PublicKey};
use crypto_utils::{ZeroizingBytes, ZeroizingString};
use error::{MnemonicValidationError, WalletError};
use mnemonic::WordMatch;
use types::{AccountMetaData, DerivationScheme, DerivedAccount, InstructionData};
use zeroize::Zeroize;

uniffi::setup_scaffolding!();

// ─── UniFFI-exported types ───────────────────────────────────────────

/// A program-derived address together with the bump seed that produced it.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ProgramAddress {
    pub address: String,
    pub bump: u8,
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn backend() -> DalekBackend {
    DalekBackend::new()
}

fn parse_address(text: &str) -> Result<PublicKey, WalletError> {
    PublicKey::from_base58(text).map_err(|e| WalletError::InvalidAddress(format!("{text}: {e}")))
}

fn keypair_from_secret(secret_key: &[u8]) -> Result<Keypair, WalletError> {
    Keypair::from_secret_bytes(&backend(), secret_key)
        .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))
}

fn instruction_from_data(ix: &InstructionData) -> Result<Instruction, WalletError> {
    let accounts = ix
        .accounts
        .iter()
        .map(|meta: &AccountMetaData| -> Result<chain_sol::AccountMeta, WalletError> {
            Ok(chain_sol::AccountMeta {
                pubkey: parse_address(&meta.pubkey)?,
                is_signer: meta.is_signer,
                is_writable: meta.is_writable,
            })
        })
        .collect::<Result<Vec<_>, WalletError>>()?;

    Ok(Instruction {
        program_id: parse_address(&ix.program_id)?,
        accounts,
        data: ix.data.clone(),
    })
}

fn derived_account(keypair: &Keypair, derivation_path: String) -> DerivedAccount {
    DerivedAccount {
        address: keypair.pubkey().to_base58(),
        secret_key: keypair.to_base58_secret().to_string(),
        derivation_path,
    }
}

fn keypair_for_account(seed: &[u8], account: u32) -> Result<Keypair, WalletError> {
    let path = DerivationScheme::default().path(account);
    hd_derivation::derive_keypair(&backend(), seed, &path)
}

// ─── UniFFI-exported functions ───────────────────────────────────────
// UniFFI passes owned String/Vec<u8> across FFI, so all functions accept
// owned types. Secret inputs are wiped before returning.

/// Generate a new 12-word BIP-39 mnemonic.
#[uniffi::export]
pub fn generate_mnemonic() -> Result<String, WalletError> {
    let mnemonic = mnemonic::generate_mnemonic()?;
    Ok(String::from(&*mnemonic))
}

/// Check word count and word-list membership of a split mnemonic.
#[uniffi::export]
pub fn validate_mnemonic_words(words: Vec<String>) -> Result<(), MnemonicValidationError> {
    let result = mnemonic::validate_mnemonics(&words);
    for mut word in words {
        word.zeroize();
    }
    result
}

/// Full BIP-39 validation, checksum included.
#[uniffi::export]
pub fn validate_mnemonic(phrase: String) -> bool {
    let phrase = ZeroizingString::from(phrase);
    mnemonic::validate_mnemonic(&phrase)
}

/// Classify a partially typed mnemonic word.
#[uniffi::export]
pub fn check_mnemonic_word(word: String) -> WordMatch {
    mnemonic::validate_mnemonic_word(&word)
}

/// Derive the 64-byte seed from a mnemonic and passphrase.
#[uniffi::export]
pub fn mnemonic_to_seed(mnemonic_phrase: String, passphrase: String) -> Result<Vec<u8>, WalletError> {
    let phrase = ZeroizingString::from(mnemonic_phrase);
    let passphrase = ZeroizingString::from(passphrase);
    let seed = mnemonic::mnemonic_to_seed(&phrase, &passphrase)?;
    Ok(seed.to_vec())
}

/// Derive account `account_index` at `m/44'/501'/{account_index}'/0'`.
#[uniffi::export]
pub fn derive_keypair(mnemonic_phrase: String, account_index: u32) -> Result<DerivedAccount, WalletError> {
    derive_account(mnemonic_phrase, String::new(), account_index, DerivationScheme::default())
}

/// Derive an account under an explicit passphrase and derivation scheme.
#[uniffi::export]
pub fn derive_account(
    mnemonic_phrase: String,
    passphrase: String,
    account_index: u32,
    scheme: DerivationScheme,
) -> Result<DerivedAccount, WalletError> {
    let phrase = ZeroizingString::from(mnemonic_phrase);
    let passphrase = ZeroizingString::from(passphrase);
    let seed = mnemonic::mnemonic_to_seed(&phrase, &passphrase)?;

    let path = scheme.path(account_index);
    let keypair = hd_derivation::derive_keypair(&backend(), &seed, &path)?;
    Ok(derived_account(&keypair, path))
}

/// Base58 public key of a 64-byte secret key.
#[uniffi::export]
pub fn public_key_from_secret(secret_key: Vec<u8>) -> Result<String, WalletError> {
    let secret_key = ZeroizingBytes::from(secret_key);
    Ok(keypair_from_secret(&secret_key)?.pubkey().to_base58())
}

/// Whether `address` is Base58 text of exactly 32 bytes.
#[uniffi::export]
pub fn validate_address(address: String) -> bool {
    chain_sol::validate_address(&address)
}

/// Search for the program-derived address of `seeds` under `program_id`.
#[uniffi::export]
pub fn find_program_address(seeds: Vec<Vec<u8>>, program_id: String) -> Result<ProgramAddress, WalletError> {
    let program = parse_address(&program_id)?;
    let seed_refs: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
    let (address, bump) = chain_sol::find_program_address(&backend(), &seed_refs, &program)?;
    Ok(ProgramAddress {
        address: address.to_base58(),
        bump,
    })
}

/// Associated token account of `owner_address` for `mint_address`.
#[uniffi::export]
pub fn find_associated_token_address(
    owner_address: String,
    mint_address: String,
) -> Result<String, WalletError> {
    let owner = parse_address(&owner_address)?;
    let mint = parse_address(&mint_address)?;
    let ata = chain_sol::find_associated_token_address(&backend(), &owner, &mint)?;
    Ok(ata.to_base58())
}

/// Compile and sign host-built instructions.
///
/// `signer_secret_keys` are 64-byte secrets; their order fixes the signature
/// order. Returns the wire bytes, ready for Base64 and `sendTransaction`.
#[uniffi::export]
pub fn build_and_sign(
    instructions: Vec<InstructionData>,
    signer_secret_keys: Vec<Vec<u8>>,
    recent_blockhash: String,
) -> Result<Vec<u8>, WalletError> {
    let secrets: Vec<ZeroizingBytes> = signer_secret_keys.into_iter().map(ZeroizingBytes::from).collect();
    let signers = secrets
        .iter()
        .map(|secret| keypair_from_secret(secret))
        .collect::<Result<Vec<_>, _>>()?;

    let instructions = instructions
        .iter()
        .map(instruction_from_data)
        .collect::<Result<Vec<_>, _>>()?;

    let signer_refs: Vec<&Keypair> = signers.iter().collect();
    let signed = chain_sol::build_and_sign(&backend(), &instructions, &signer_refs, &recent_blockhash)?;
    Ok(signed.to_bytes()?)
}

/// Add our signature to a Base64 transaction built elsewhere (quote/order
/// APIs, dApps). The signature lands in the slot matching our public key.
#[uniffi::export]
pub fn sign_external_transaction(
    base64_transaction: String,
    secret_key: Vec<u8>,
) -> Result<String, WalletError> {
    let secret_key = ZeroizingBytes::from(secret_key);
    let keypair = keypair_from_secret(&secret_key)?;

    Ok(chain_sol::sign_external_transaction(
        &backend(),
        &base64_transaction,
        &keypair,
    )?)
}

/// Detached Ed25519 signature over arbitrary bytes (off-chain message signing).
#[uniffi::export]
pub fn sign_message(secret_key: Vec<u8>, message: Vec<u8>) -> Result<Vec<u8>, WalletError> {
    let secret_key = ZeroizingBytes::from(secret_key);
    let signature = keypair_from_secret(&secret_key)?.sign_message(&backend(), &message)?;
    Ok(signature.to_vec())
}

/// Sign a native SOL transfer from account `account` of `seed`.
#[uniffi::export]
pub fn sign_sol_transfer(
    seed: Vec<u8>,
    account: u32,
    to_address: String,
    lamports: u64,
    recent_blockhash: String,
) -> Result<Vec<u8>, WalletError> {
    let seed = ZeroizingBytes::from(seed);
    let keypair = keypair_for_account(&seed, account)?;

    let to = parse_address(&to_address)?;
    let ix = chain_sol::system_transfer(&keypair.pubkey(), &to, lamports);
    let signed = chain_sol::build_and_sign(&backend(), &[ix], &[&keypair], &recent_blockhash)?;
    Ok(signed.to_bytes()?)
}

/// Sign an SPL token transfer from account `account` of `seed`.
///
/// `to_address` is the recipient's wallet; both token accounts are the
/// associated ones for `mint_address`. Set `create_recipient_account` when
/// the recipient's token account does not exist yet; the sender pays for it.
#[uniffi::export]
pub fn sign_spl_transfer(
    seed: Vec<u8>,
    account: u32,
    to_address: String,
    mint_address: String,
    amount: u64,
    create_recipient_account: bool,
    recent_blockhash: String,
) -> Result<Vec<u8>, WalletError> {
    let seed = ZeroizingBytes::from(seed);
    let keypair = keypair_for_account(&seed, account)?;

    let backend = backend();
    let sender = keypair.pubkey();
    let recipient = parse_address(&to_address)?;
    let mint = parse_address(&mint_address)?;

    let source = chain_sol::find_associated_token_address(&backend, &sender, &mint)?;
    let destination = chain_sol::find_associated_token_address(&backend, &recipient, &mint)?;

    let mut instructions = Vec::with_capacity(2);
    if create_recipient_account {
        instructions.push(chain_sol::create_associated_token_account(
            &backend, &sender, &recipient, &mint,
        )?);
    }
    instructions.push(chain_sol::token_transfer(&source, &destination, &sender, amount));

    let signed = chain_sol::build_and_sign(&backend, &instructions, &[&keypair], &recent_blockhash)?;
    Ok(signed.to_bytes()?)
}
