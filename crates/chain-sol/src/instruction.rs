//! Instructions and the fixed byte layouts of the kinds this engine emits.
//!
//! ```text
//! SystemTransfer                 program: system
//!   data: u32 LE tag (2) | u64 LE lamports                   12 bytes
//!   accounts: [from (signer, writable), to (writable)]
//!
//! TokenTransfer                  program: SPL token
//!   data: u8 tag (3) | u64 LE amount                          9 bytes
//!   accounts: [source (writable), destination (writable), authority (signer)]
//!
//! CreateAssociatedTokenAccount   program: associated token
//!   data: empty
//!   accounts: [payer (signer, writable), new account (writable), owner,
//!              mint, system program, token program]
//! ```

use crate::ed25519::Ed25519Backend;
use crate::error::SolError;
use crate::pubkey::PublicKey;
use crate::spl_token::{find_associated_token_address, ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID};

/// The System Program: 32 zero bytes, `11111111111111111111111111111111`.
pub const SYSTEM_PROGRAM_ID: PublicKey = PublicKey::new([0u8; 32]);

const SYSTEM_TRANSFER_TAG: u32 = 2;
const TOKEN_TRANSFER_TAG: u8 = 3;

/// One account reference inside an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: PublicKey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A program invocation before it is compiled into a message.
///
/// `accounts` is positional: each program reads its accounts by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: PublicKey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    /// Interpret this instruction as one of the known kinds.
    pub fn kind(&self) -> Result<InstructionKind, SolError> {
        InstructionKind::decode(&self.program_id, &self.data)
    }
}

/// Every instruction kind this engine knows how to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    SystemTransfer { lamports: u64 },
    TokenTransfer { amount: u64 },
    CreateAssociatedTokenAccount,
}

impl InstructionKind {
    pub fn program_id(&self) -> PublicKey {
        match self {
            InstructionKind::SystemTransfer { .. } => SYSTEM_PROGRAM_ID,
            InstructionKind::TokenTransfer { .. } => TOKEN_PROGRAM_ID,
            InstructionKind::CreateAssociatedTokenAccount => ASSOCIATED_TOKEN_PROGRAM_ID,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match *self {
            InstructionKind::SystemTransfer { lamports } => {
                let mut data = Vec::with_capacity(12);
                data.extend_from_slice(&SYSTEM_TRANSFER_TAG.to_le_bytes());
                data.extend_from_slice(&lamports.to_le_bytes());
                data
            }
            InstructionKind::TokenTransfer { amount } => {
                let mut data = Vec::with_capacity(9);
                data.push(TOKEN_TRANSFER_TAG);
                data.extend_from_slice(&amount.to_le_bytes());
                data
            }
            InstructionKind::CreateAssociatedTokenAccount => Vec::new(),
        }
    }

    pub fn decode(program_id: &PublicKey, data: &[u8]) -> Result<Self, SolError> {
        if *program_id == SYSTEM_PROGRAM_ID {
            let (tag, rest) = split_array::<4>(data, "system instruction tag")?;
            if u32::from_le_bytes(tag) != SYSTEM_TRANSFER_TAG {
                return Err(SolError::InvalidInput(format!(
                    "unsupported system instruction {}",
                    u32::from_le_bytes(tag)
                )));
            }
            let lamports = read_u64_exact(rest, "system transfer")?;
            Ok(InstructionKind::SystemTransfer { lamports })
        } else if *program_id == TOKEN_PROGRAM_ID {
            let (tag, rest) = split_array::<1>(data, "token instruction tag")?;
            if tag[0] != TOKEN_TRANSFER_TAG {
                return Err(SolError::InvalidInput(format!(
                    "unsupported token instruction {}",
                    tag[0]
                )));
            }
            let amount = read_u64_exact(rest, "token transfer")?;
            Ok(InstructionKind::TokenTransfer { amount })
        } else if *program_id == ASSOCIATED_TOKEN_PROGRAM_ID {
            if !data.is_empty() {
                return Err(SolError::InvalidInput(format!(
                    "associated account creation carries no data, got {} bytes",
                    data.len()
                )));
            }
            Ok(InstructionKind::CreateAssociatedTokenAccount)
        } else {
            Err(SolError::InvalidInput(format!("unknown program {program_id}")))
        }
    }
}

fn split_array<'a, const N: usize>(
    data: &'a [u8],
    what: &str,
) -> Result<([u8; N], &'a [u8]), SolError> {
    if data.len() < N {
        return Err(SolError::InvalidInput(format!(
            "{what}: need {N} bytes, got {}",
            data.len()
        )));
    }
    let (head, rest) = data.split_at(N);
    let mut arr = [0u8; N];
    arr.copy_from_slice(head);
    Ok((arr, rest))
}

fn read_u64_exact(data: &[u8], what: &str) -> Result<u64, SolError> {
    let bytes: [u8; 8] = data.try_into().map_err(|_| {
        SolError::InvalidInput(format!("{what}: expected 8-byte amount, got {}", data.len()))
    })?;
    Ok(u64::from_le_bytes(bytes))
}

/// Move `lamports` of native SOL from `from` to `to`.
pub fn system_transfer(from: &PublicKey, to: &PublicKey, lamports: u64) -> Instruction {
    let kind = InstructionKind::SystemTransfer { lamports };
    Instruction {
        program_id: kind.program_id(),
        accounts: vec![
            AccountMeta::writable(*from, true),
            AccountMeta::writable(*to, false),
        ],
        data: kind.encode(),
    }
}

/// Move `amount` base units between two token accounts owned by `authority`.
pub fn token_transfer(
    source: &PublicKey,
    destination: &PublicKey,
    authority: &PublicKey,
    amount: u64,
) -> Instruction {
    let kind = InstructionKind::TokenTransfer { amount };
    Instruction {
        program_id: kind.program_id(),
        accounts: vec![
            AccountMeta::writable(*source, false),
            AccountMeta::writable(*destination, false),
            AccountMeta::readonly(*authority, true),
        ],
        data: kind.encode(),
    }
}

/// Create the associated token account of `owner` for `mint`, paid by `payer`.
pub fn create_associated_token_account(
    backend: &impl Ed25519Backend,
    payer: &PublicKey,
    owner: &PublicKey,
    mint: &PublicKey,
) -> Result<Instruction, SolError> {
    let new_account = find_associated_token_address(backend, owner, mint)?;
    let kind = InstructionKind::CreateAssociatedTokenAccount;
    Ok(Instruction {
        program_id: kind.program_id(),
        accounts: vec![
            AccountMeta::writable(*payer, true),
            AccountMeta::writable(new_account, false),
            AccountMeta::readonly(*owner, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: kind.encode(),
    })
}
