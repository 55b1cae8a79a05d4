//! Solbound Tx - Transaction envelope construction
//!
//! Builds the atomic instruction bundle returned to the requester:
//!
//! ```text
//! Instruction builders ─▶ V0Message::compile ─▶ VersionedTransaction
//!   (mpl-core create,        (account ordering,     (server signatures,
//!    token burn, fee)         header, indices)       requester slot open)
//! ```
//!
//! Only the parts of the wire format this service emits are implemented:
//! version-0 messages without address lookup tables.

pub mod short_vec;
pub mod instruction;
pub mod message;
pub mod transaction;
pub mod programs;

pub use instruction::*;
pub use message::*;
pub use transaction::*;

use solbound_crypto::CryptoError;
use solbound_types::{Pubkey, TypesError};
use thiserror::Error;

/// Errors that can occur while building or decoding a transaction
#[derive(Error, Debug)]
pub enum TxError {
    #[error("Too many accounts: {0} (max 256)")]
    TooManyAccounts(usize),

    #[error("Signer {0} is not a required signer of this message")]
    UnknownSigner(Pubkey),

    #[error("Malformed transaction: {0}")]
    Malformed(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Types error: {0}")]
    Types(#[from] TypesError),
}

pub type Result<T> = std::result::Result<T, TxError>;
