//! Inventory cipher
//!
//! The inventory is stored as `base64(hex(AES-256-CBC(plaintext)))` with
//! PKCS#7 padding. Key and IV come from two configured secrets: each is hashed
//! with SHA-512, hex-encoded, and truncated to 32 (key) and 16 (IV) hex
//! characters whose ASCII bytes are used directly.
//!
//! CBC carries no integrity tag, so a corrupted or tampered blob is only
//! detected when unpadding or UTF-8 decoding fails.

use crate::{sha512_hex, CryptoError, CryptoResult};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Length of the derived key in hex characters (= bytes)
pub const KEY_HEX_LEN: usize = 32;
/// Length of the derived IV in hex characters (= bytes)
pub const IV_HEX_LEN: usize = 16;

/// Symmetric cipher for the confidential inventory
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct InventoryCipher {
    key: [u8; KEY_HEX_LEN],
    iv: [u8; IV_HEX_LEN],
}

impl InventoryCipher {
    /// Derive the cipher from the configured secret and IV seed
    pub fn from_secrets(secret: &str, iv_seed: &str) -> CryptoResult<Self> {
        if secret.is_empty() {
            return Err(CryptoError::MissingCipherConfig("secret"));
        }
        if iv_seed.is_empty() {
            return Err(CryptoError::MissingCipherConfig("iv_seed"));
        }

        let mut key_hex = sha512_hex(secret.as_bytes());
        let mut iv_hex = sha512_hex(iv_seed.as_bytes());

        let mut key = [0u8; KEY_HEX_LEN];
        let mut iv = [0u8; IV_HEX_LEN];
        key.copy_from_slice(&key_hex.as_bytes()[..KEY_HEX_LEN]);
        iv.copy_from_slice(&iv_hex.as_bytes()[..IV_HEX_LEN]);

        key_hex.zeroize();
        iv_hex.zeroize();

        Ok(Self { key, iv })
    }

    /// Encrypt UTF-8 plaintext into the stored format
    pub fn encrypt(&self, plaintext: &str) -> CryptoResult<String> {
        let cipher = Aes256CbcEnc::new_from_slices(&self.key, &self.iv)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        Ok(STANDARD.encode(hex::encode(ciphertext)))
    }

    /// Decrypt the stored format back into UTF-8 plaintext
    pub fn decrypt(&self, encoded: &str) -> CryptoResult<String> {
        let outer = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::DecryptionFailed(format!("base64: {}", e)))?;
        let hex_text = std::str::from_utf8(&outer)
            .map_err(|e| CryptoError::DecryptionFailed(format!("hex layer: {}", e)))?;
        let ciphertext = hex::decode(hex_text.trim())
            .map_err(|e| CryptoError::DecryptionFailed(format!("hex: {}", e)))?;

        let cipher = Aes256CbcDec::new_from_slices(&self.key, &self.iv)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed("bad padding".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::DecryptionFailed("plaintext is not UTF-8".to_string()))
    }
}

impl std::fmt::Debug for InventoryCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("InventoryCipher(<redacted>)")
    }
}
