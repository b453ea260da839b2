//! Legacy Solana transaction wire format and signing.
//!
//! Transactions are assembled by hand; there is no `solana-sdk` dependency.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8   (always 0 here)
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```
//!
//! Account keys are ordered signers first (in the order given), then, per
//! instruction, each referenced account followed by the program id. The first
//! occurrence of a key wins. Compiled instructions refer to accounts purely by
//! position in that list.
//!
//! Keys are not regrouped by access. `num_readonly_unsigned` counts the keys
//! that only ever appear read-only in a meta, but the runtime applies it to the
//! last keys of the list. A writable key compiled after a read-only one (the
//! source token account when an account creation precedes the transfer) is
//! then read as read-only, and the network rejects the transaction.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::base58;
use crate::ed25519::{Ed25519Backend, SIGNATURE_LEN};
use crate::error::SolError;
use crate::instruction::Instruction;
use crate::keypair::Keypair;
use crate::pubkey::PublicKey;

/// One-byte account indices cap the key list.
const MAX_ACCOUNT_KEYS: usize = 256;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` in Solana's compact-u16 format.
///
/// - `0..0x80`       -> 1 byte
/// - `0x80..0x4000`  -> 2 bytes, low 7 bits first with the continuation bit set
/// - `0x4000..`      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 prefix of `data`.
///
/// Returns `(value, bytes_consumed)`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;

    for (i, &byte) in data.iter().take(3).enumerate() {
        value |= ((byte & 0x7f) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return u16::try_from(value)
                .map(|v| (v, i + 1))
                .map_err(|_| SolError::Serialization("compact-u16 value overflow".into()));
        }
    }

    if data.len() >= 3 {
        Err(SolError::Serialization(
            "compact-u16 continuation past third byte".into(),
        ))
    } else {
        Err(SolError::Serialization(
            "unexpected end of data while decoding compact-u16".into(),
        ))
    }
}

fn encode_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let value = u16::try_from(len)
        .map_err(|_| SolError::Serialization(format!("{what} count {len} exceeds u16")))?;
    Ok(encode_compact_u16(value))
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
}

/// An instruction with its keys replaced by indices into `account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// The signed portion of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

/// Decode a Base58 blockhash, which must be exactly 32 bytes.
pub fn parse_blockhash(text: &str) -> Result<[u8; 32], SolError> {
    let bytes =
        base58::decode(text).map_err(|e| SolError::InvalidBlockhash(format!("{text:?}: {e}")))?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidBlockhash(format!("expected 32 bytes, got {}", v.len()))
    })
}

fn push_unique(keys: &mut Vec<PublicKey>, key: PublicKey) {
    if !keys.contains(&key) {
        keys.push(key);
    }
}

fn index_of(keys: &[PublicKey], key: &PublicKey) -> Result<u8, SolError> {
    keys.iter()
        .position(|k| k == key)
        .and_then(|i| u8::try_from(i).ok())
        .ok_or_else(|| SolError::AccountNotFound(key.to_base58()))
}

impl Message {
    /// Compile `instructions` for `signers` against a Base58 blockhash.
    pub fn compile(
        instructions: &[Instruction],
        signers: &[PublicKey],
        recent_blockhash: &str,
    ) -> Result<Self, SolError> {
        let blockhash = parse_blockhash(recent_blockhash)?;
        Self::compile_with_blockhash(instructions, signers, blockhash)
    }

    pub fn compile_with_blockhash(
        instructions: &[Instruction],
        signers: &[PublicKey],
        recent_blockhash: [u8; 32],
    ) -> Result<Self, SolError> {
        let mut account_keys: Vec<PublicKey> = Vec::new();
        for signer in signers {
            push_unique(&mut account_keys, *signer);
        }
        let num_signers = account_keys.len();

        // Non-signer keys seen in account metas, and whether every reference
        // so far was read-only.
        let mut readonly: Vec<(PublicKey, bool)> = Vec::new();

        for ix in instructions {
            for meta in &ix.accounts {
                push_unique(&mut account_keys, meta.pubkey);

                if account_keys[..num_signers].contains(&meta.pubkey) {
                    continue;
                }
                if meta.is_signer {
                    tracing::warn!(
                        account = %meta.pubkey,
                        "instruction expects a signer that is not in the signer list"
                    );
                }

                let is_readonly = !meta.is_signer && !meta.is_writable;
                match readonly.iter_mut().find(|(k, _)| *k == meta.pubkey) {
                    Some((_, ro)) => *ro &= is_readonly,
                    None => readonly.push((meta.pubkey, is_readonly)),
                }
            }
            push_unique(&mut account_keys, ix.program_id);
        }

        if account_keys.len() > MAX_ACCOUNT_KEYS {
            return Err(SolError::InvalidInput(format!(
                "message references {} accounts, at most {MAX_ACCOUNT_KEYS} allowed",
                account_keys.len()
            )));
        }

        let num_required_signatures = u8::try_from(num_signers)
            .map_err(|_| SolError::InvalidInput(format!("too many signers: {num_signers}")))?;
        let readonly_count = readonly.iter().filter(|(_, ro)| *ro).count();
        let num_readonly_unsigned = u8::try_from(readonly_count).map_err(|_| {
            SolError::InvalidInput(format!("too many read-only accounts: {readonly_count}"))
        })?;

        let mut compiled = Vec::with_capacity(instructions.len());
        for ix in instructions {
            let account_indices = ix
                .accounts
                .iter()
                .map(|meta| index_of(&account_keys, &meta.pubkey))
                .collect::<Result<Vec<u8>, SolError>>()?;

            compiled.push(CompiledInstruction {
                program_id_index: index_of(&account_keys, &ix.program_id)?,
                account_indices,
                data: ix.data.clone(),
            });
        }

        tracing::debug!(
            signers = num_signers,
            accounts = account_keys.len(),
            instructions = compiled.len(),
            "compiled transaction message"
        );

        Ok(Self {
            header: MessageHeader {
                num_required_signatures,
                num_readonly_signed: 0,
                num_readonly_unsigned,
            },
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// The keys whose signatures this message requires, in slot order.
    pub fn signer_keys(&self) -> &[PublicKey] {
        let n = usize::from(self.header.num_required_signatures).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    /// Serialize the message: these are the bytes that get signed.
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let mut buf = Vec::with_capacity(256);

        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed);
        buf.push(self.header.num_readonly_unsigned);

        buf.extend_from_slice(&encode_len(self.account_keys.len(), "account key")?);
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }

        buf.extend_from_slice(&self.recent_blockhash);

        buf.extend_from_slice(&encode_len(self.instructions.len(), "instruction")?);
        for ix in &self.instructions {
            buf.push(ix.program_id_index);

            buf.extend_from_slice(&encode_len(ix.account_indices.len(), "instruction account")?);
            buf.extend_from_slice(&ix.account_indices);

            buf.extend_from_slice(&encode_len(ix.data.len(), "instruction data")?);
            buf.extend_from_slice(&ix.data);
        }

        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// A fully signed transaction ready for `sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// One signature per required signer, in account-key order.
    pub signatures: Vec<[u8; SIGNATURE_LEN]>,
    /// The serialized message the signatures cover.
    pub message: Vec<u8>,
}

impl SignedTransaction {
    /// Wire bytes: `compact-u16(n) || signatures || message`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SolError> {
        let mut wire = Vec::with_capacity(3 + self.signatures.len() * SIGNATURE_LEN + self.message.len());
        wire.extend_from_slice(&encode_len(self.signatures.len(), "signature")?);
        for sig in &self.signatures {
            wire.extend_from_slice(sig);
        }
        wire.extend_from_slice(&self.message);
        Ok(wire)
    }

    pub fn to_base64(&self) -> Result<String, SolError> {
        Ok(BASE64.encode(self.to_bytes()?))
    }
}

/// Everything needed to produce one signed transaction.
#[derive(Debug, Clone)]
pub struct UnsignedMessageInputs {
    /// Base58 text as returned by `getLatestBlockhash`.
    pub recent_blockhash: String,
    pub instructions: Vec<Instruction>,
    /// Must cover every account meta marked as signer; not enforced here.
    pub signers: Vec<Keypair>,
}

impl UnsignedMessageInputs {
    pub fn sign(&self, backend: &impl Ed25519Backend) -> Result<SignedTransaction, SolError> {
        let signers: Vec<&Keypair> = self.signers.iter().collect();
        build_and_sign(backend, &self.instructions, &signers, &self.recent_blockhash)
    }
}

/// Compile, serialize and sign a transaction.
///
/// Signers are de-duplicated by public key; the first keypair for a key signs.
pub fn build_and_sign(
    backend: &impl Ed25519Backend,
    instructions: &[Instruction],
    signers: &[&Keypair],
    recent_blockhash: &str,
) -> Result<SignedTransaction, SolError> {
    let mut unique: Vec<&Keypair> = Vec::with_capacity(signers.len());
    for kp in signers {
        if !unique.iter().any(|u| u.pubkey() == kp.pubkey()) {
            unique.push(kp);
        }
    }
    let signer_keys: Vec<PublicKey> = unique.iter().map(|kp| kp.pubkey()).collect();

    let message = Message::compile(instructions, &signer_keys, recent_blockhash)?;
    let message_bytes = message.serialize()?;

    let signatures = unique
        .iter()
        .map(|kp| {
            backend
                .sign_detached(&message_bytes, kp.secret_bytes())
                .map_err(|e| match e {
                    SolError::SignatureFailed(_) => e,
                    other => SolError::SignatureFailed(other.to_string()),
                })
        })
        .collect::<Result<Vec<_>, SolError>>()?;

    tracing::debug!(
        signatures = signatures.len(),
        message_len = message_bytes.len(),
        "signed transaction"
    );

    Ok(SignedTransaction {
        signatures,
        message: message_bytes,
    })
}

// ---------------------------------------------------------------------------
// Externally built transactions (quote/order APIs, dApps)
// ---------------------------------------------------------------------------

/// Sign a pre-built wire-format transaction with `keypair`.
///
/// The transaction's signature slots are located, the keypair's public key is
/// found among the message's required signers, and the new signature is
/// written into that slot. Every other byte is preserved, so a single-signer
/// input comes back as `[1] || signature || message`.
pub fn sign_external_transaction_bytes(
    backend: &impl Ed25519Backend,
    raw_tx: &[u8],
    keypair: &Keypair,
) -> Result<Vec<u8>, SolError> {
    let (num_sigs, sigs_start) = decode_compact_u16(raw_tx)?;
    if num_sigs == 0 {
        return Err(SolError::Serialization(
            "transaction has zero signatures".into(),
        ));
    }

    let sigs_end = sigs_start + usize::from(num_sigs) * SIGNATURE_LEN;
    if sigs_end > raw_tx.len() {
        return Err(SolError::Serialization(
            "transaction too short: signature slots exceed length".into(),
        ));
    }

    let message_bytes = &raw_tx[sigs_end..];
    if message_bytes.len() < 4 {
        return Err(SolError::Serialization(
            "transaction message too short".into(),
        ));
    }

    let num_required = usize::from(message_bytes[0]);
    let (num_accounts, accounts_len) = decode_compact_u16(&message_bytes[3..])?;
    let keys_start = 3 + accounts_len;
    let keys_end = keys_start + usize::from(num_accounts) * PublicKey::LEN;
    if keys_end > message_bytes.len() {
        return Err(SolError::Serialization(
            "transaction message too short for account keys".into(),
        ));
    }

    let our_key = keypair.pubkey();
    let slot = message_bytes[keys_start..keys_end]
        .chunks_exact(PublicKey::LEN)
        .take(num_required)
        .position(|key| key == our_key.as_bytes())
        .ok_or_else(|| {
            SolError::SignatureFailed(format!(
                "{our_key} is not among the transaction's required signers"
            ))
        })?;

    if slot >= usize::from(num_sigs) {
        return Err(SolError::Serialization(format!(
            "signer slot {slot} beyond {num_sigs} signature slots"
        )));
    }

    let signature = keypair.sign_message(backend, message_bytes)?;

    let mut signed = raw_tx.to_vec();
    let offset = sigs_start + slot * SIGNATURE_LEN;
    signed[offset..offset + SIGNATURE_LEN].copy_from_slice(&signature);

    tracing::debug!(slot, slots = num_sigs, "signed external transaction");
    Ok(signed)
}

/// Base64 in, Base64 out form of [`sign_external_transaction_bytes`].
pub fn sign_external_transaction(
    backend: &impl Ed25519Backend,
    base64_tx: &str,
    keypair: &Keypair,
) -> Result<String, SolError> {
    let raw = BASE64
        .decode(base64_tx.trim())
        .map_err(|e| SolError::InvalidInput(format!("base64 decode failed: {e}")))?;
    let signed = sign_external_transaction_bytes(backend, &raw, keypair)?;
    Ok(BASE64.encode(signed))
}
