//! Offer configuration
//!
//! Everything the transaction binds to comes from here, never from the
//! request: which collection is minted into, which token is burned and how
//! much of it.

use serde::{Deserialize, Serialize};
use solbound_types::Pubkey;
use std::path::PathBuf;

/// Configuration for the issuer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerConfig {
    /// Collection every asset is minted into
    pub collection: Pubkey,
    /// Fungible token burned as payment
    pub fungible_mint: Pubkey,
    /// Burn quantity in base units
    pub burn_amount: u64,
    /// Decimals asserted by `BurnChecked`
    pub burn_decimals: u8,
    /// Priority fee, micro-lamports per compute unit
    pub compute_unit_price: u64,
    /// Directory inventory image paths are relative to
    pub asset_dir: PathBuf,
    /// `description` written into every metadata document
    pub metadata_description: String,
    /// Filename the image is uploaded under
    pub image_filename: String,
    pub image_content_type: String,
    /// Attribute key the item category is recorded under
    pub category_attribute: String,
    /// Lease for a picked item while its transaction is outstanding; 0 disables
    pub reservation_ttl_secs: u64,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            collection: Pubkey::new(DEFAULT_COLLECTION),
            fungible_mint: Pubkey::new(DEFAULT_FUNGIBLE_MINT),
            burn_amount: 1_000_000_000,
            burn_decimals: 9,
            compute_unit_price: 100,
            asset_dir: PathBuf::from("public"),
            metadata_description: "Solbound OG Collection".to_string(),
            image_filename: "solbound.png".to_string(),
            image_content_type: "image/png".to_string(),
            category_attribute: "Rarity".to_string(),
            reservation_ttl_secs: 90,
        }
    }
}

// 8kMLNM2TGXRu9drhceN3ZxqoDPYWgcjZJBr9HiCUfxzn
const DEFAULT_COLLECTION: [u8; 32] = [
    0x73, 0x1c, 0xc6, 0x61, 0x6f, 0x4a, 0x79, 0x6f, 0x50, 0x04, 0x63, 0x7a, 0xe1, 0xc6, 0x10, 0xe6,
    0x48, 0x8b, 0xe1, 0x0d, 0x5d, 0x57, 0x08, 0x20, 0xad, 0xe4, 0xcd, 0x02, 0x18, 0x28, 0x4a, 0x93,
];

// DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263
const DEFAULT_FUNGIBLE_MINT: [u8; 32] = [
    0xbc, 0x07, 0xc5, 0x6e, 0x60, 0xad, 0x3d, 0x3f, 0x17, 0x73, 0x82, 0xea, 0xc6, 0x54, 0x8f, 0xba,
    0x1f, 0xd3, 0x2c, 0xfd, 0x90, 0xca, 0x02, 0xb3, 0xe7, 0xcf, 0xa1, 0x85, 0xfd, 0xce, 0x73, 0x98,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_addresses() {
        let config = IssuerConfig::default();
        assert_eq!(
            config.collection.to_string(),
            "8kMLNM2TGXRu9drhceN3ZxqoDPYWgcjZJBr9HiCUfxzn"
        );
        assert_eq!(
            config.fungible_mint.to_string(),
            "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263"
        );
    }
}
