//! # crypto-utils
//!
//! Key stretching, memory hygiene, and secure random generation shared by the
//! Solana signing crates.

pub mod error;
pub mod kdf;
pub mod random;
pub mod zeroizing;

pub use error::CryptoError;
pub use zeroizing::{ZeroizingBytes, ZeroizingString};
