//! Key management for Solbound

use crate::{CryptoError, CryptoResult};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use solbound_types::{Pubkey, SecretKeyMaterial};

/// An ed25519 keypair for signing transactions
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Keypair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Create from a 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Create from secret key material
    ///
    /// 64-byte material must carry the public key matching its seed.
    pub fn from_secret(secret: &SecretKeyMaterial) -> CryptoResult<Self> {
        match secret.len() {
            64 => {
                let bytes: &[u8; 64] = secret
                    .expose()
                    .try_into()
                    .map_err(|_| CryptoError::InvalidKeyFormat("keypair must be 64 bytes".to_string()))?;
                let signing_key = SigningKey::from_keypair_bytes(bytes)
                    .map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))?;
                let verifying_key = signing_key.verifying_key();
                Ok(Self {
                    signing_key,
                    verifying_key,
                })
            }
            32 => Ok(Self::from_seed(&secret.seed())),
            n => Err(CryptoError::InvalidKeyFormat(format!(
                "secret must be 32 or 64 bytes, got {}",
                n
            ))),
        }
    }

    /// Parse a base58 secret (the `SIGNER_PK` format)
    pub fn from_base58(encoded: &str) -> CryptoResult<Self> {
        let secret = SecretKeyMaterial::from_base58(encoded)
            .map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))?;
        Self::from_secret(&secret)
    }

    /// Get the signing key (private - never expose!)
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Get the verifying key (public)
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// The account address of this keypair
    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.verifying_key.to_bytes())
    }

    /// Export as 64-byte `seed || public` base58 (for secure storage only!)
    pub fn to_base58(&self) -> String {
        bs58::encode(self.signing_key.to_keypair_bytes()).into_string()
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair").field("pubkey", &self.pubkey()).finish()
    }
}

/// Derive the public identity of secret key material
///
/// This is the correlation between an inventory entry and a registry record.
pub fn derive_public_identity(secret: &SecretKeyMaterial) -> CryptoResult<Pubkey> {
    Keypair::from_secret(secret).map(|kp| kp.pubkey())
}
