//! Transaction signing for Solbound
//!
//! Signing goes through the [`TxSigner`] port so the assembler can be driven
//! by server-held keypairs in production and by fixed keys in tests.

use crate::{CryptoError, CryptoResult, Keypair};
use ed25519_dalek::{Signature as Ed25519Signature, Signer, Verifier, VerifyingKey};
use solbound_types::{Pubkey, Signature};

/// A party that can sign a compiled transaction message
pub trait TxSigner: Send + Sync {
    /// Address whose signature slot this signer fills
    fn pubkey(&self) -> Pubkey;

    /// Sign the serialized message bytes
    fn sign_message(&self, message: &[u8]) -> CryptoResult<Signature>;
}

impl TxSigner for Keypair {
    fn pubkey(&self) -> Pubkey {
        Keypair::pubkey(self)
    }

    fn sign_message(&self, message: &[u8]) -> CryptoResult<Signature> {
        let signature = self
            .signing_key()
            .try_sign(message)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(Signature::new(signature.to_bytes()))
    }
}

/// Verify a signature against an address
pub fn verify(pubkey: &Pubkey, message: &[u8], signature: &Signature) -> CryptoResult<bool> {
    let verifying_key = VerifyingKey::from_bytes(pubkey.as_bytes())
        .map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))?;
    let signature = Ed25519Signature::from_bytes(signature.as_bytes());

    match verifying_key.verify(message, &signature) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}
