//! Solbound Crypto - Cryptographic primitives for the burn-to-mint action
//!
//! This crate provides:
//! - Keypair loading and generation (Ed25519)
//! - Transaction signing behind the [`TxSigner`] port
//! - Program-derived address derivation (SHA-256 + off-curve check)
//! - The inventory cipher (AES-256-CBC with SHA-512 derived key/IV)
//!
//! # Security Invariant
//!
//! **Secret keys and cipher keys are wiped on drop and never logged.**

pub mod keys;
pub mod signature;
pub mod hash;
pub mod cipher;

pub use keys::*;
pub use signature::*;
pub use hash::*;
pub use cipher::*;

use thiserror::Error;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("No viable bump seed for program address")]
    NoViableBump,

    #[error("Seed too long: {0} bytes (max 32)")]
    SeedTooLong(usize),

    #[error("Cipher configuration missing: {0}")]
    MissingCipherConfig(&'static str),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
