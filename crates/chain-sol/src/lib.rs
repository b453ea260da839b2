//! Solana signing engine.
//!
//! Everything needed to turn instructions and keypairs into the exact bytes
//! the Solana network accepts: Base58 keys, program-derived addresses,
//! fixed-layout instruction encoders, and the legacy transaction wire format.
//! There is no `solana-sdk` dependency; the wire format is written by hand and
//! Ed25519 comes from `ed25519-dalek` behind the [`Ed25519Backend`] handle.

pub mod base58;
pub mod ed25519;
pub mod error;
pub mod instruction;
pub mod keypair;
pub mod pda;
pub mod pubkey;
pub mod spl_token;
pub mod transaction;

pub use ed25519::{verify_detached, DalekBackend, Ed25519Backend};
pub use error::SolError;
pub use instruction::{
    create_associated_token_account, system_transfer, token_transfer, AccountMeta, Instruction,
    InstructionKind, SYSTEM_PROGRAM_ID,
};
pub use keypair::Keypair;
pub use pda::{create_program_address, find_program_address};
pub use pubkey::{validate_address, PublicKey};
pub use spl_token::{find_associated_token_address, ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID};
pub use transaction::{
    build_and_sign, decode_compact_u16, encode_compact_u16, sign_external_transaction,
    sign_external_transaction_bytes, Message, SignedTransaction, UnsignedMessageInputs,
};
