//! Inventory and registry types
//!
//! An [`InventoryItem`] is a pre-generated collectible whose private identity
//! is secret key material. Once issued, the registry reports it as an
//! [`IssuedAsset`] under the public identity derived from that key.

use crate::{Pubkey, Result, TypesError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret key material for an inventory item
///
/// Either a 32-byte ed25519 seed or a 64-byte `seed || public key` keypair.
/// Wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKeyMaterial(Vec<u8>);

impl SecretKeyMaterial {
    /// Wrap raw bytes, validating the length
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        match bytes.len() {
            32 | 64 => Ok(Self(bytes)),
            n => Err(TypesError::InvalidSecretLength(n)),
        }
    }

    /// Decode from base58 text
    pub fn from_base58(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s.trim())
            .into_vec()
            .map_err(|e| TypesError::InvalidBase58(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    /// Encode as base58 text
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    /// The 32-byte seed portion
    pub fn seed(&self) -> [u8; 32] {
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&self.0[..32]);
        seed
    }

    /// The embedded public key, when the material is a 64-byte keypair
    pub fn embedded_public(&self) -> Option<[u8; 32]> {
        (self.0.len() == 64).then(|| {
            let mut public = [0u8; 32];
            public.copy_from_slice(&self.0[32..]);
            public
        })
    }

    /// Raw byte length
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the raw bytes
    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKeyMaterial(<{} bytes redacted>)", self.0.len())
    }
}

impl Serialize for SecretKeyMaterial {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for SecretKeyMaterial {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}

/// A pre-generated allocatable collectible
///
/// The wire names (`pk`, `name`, `type`, `image`) match the stored inventory
/// document; the long names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Secret key of the asset account this item mints into
    #[serde(rename = "pk", alias = "privateIdentity")]
    pub private_identity: SecretKeyMaterial,
    /// Display name written into the asset and its metadata
    #[serde(rename = "name", alias = "displayName")]
    pub display_name: String,
    /// Rarity category, recorded as the `Rarity` attribute
    #[serde(rename = "type", alias = "category")]
    pub category: String,
    /// Image path relative to the asset directory
    #[serde(rename = "image", alias = "imageRef")]
    pub image_ref: String,
}

/// An asset the registry reports as already minted into the collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuedAsset {
    /// Asset account address (derived from an inventory item's secret)
    pub public_identity: Pubkey,
    /// Current owner
    pub owner: Pubkey,
    /// Collection recorded as the asset's update authority
    pub collection: Pubkey,
}
