//! Address types for Solbound
//!
//! Fixed-width byte strings that travel as base58 text: account addresses,
//! blockhashes and ed25519 signatures. Each is a strongly typed wrapper so an
//! address can never be passed where a blockhash is expected.

use crate::{Result, TypesError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Macro to generate base58 byte-string types with common implementations
macro_rules! define_base58_type {
    ($name:ident, $len:literal, $kind:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Byte length of this type
            pub const LEN: usize = $len;

            /// Create from raw bytes
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// All-zero value
            pub const fn zeroed() -> Self {
                Self([0u8; $len])
            }

            /// Create from a byte slice of exactly the right length
            pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
                let array: [u8; $len] =
                    bytes.try_into().map_err(|_| TypesError::InvalidLength {
                        kind: $kind,
                        expected: $len,
                        actual: bytes.len(),
                    })?;
                Ok(Self(array))
            }

            /// Get the inner bytes
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Copy out the inner bytes
            pub fn to_bytes(&self) -> [u8; $len] {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self> {
                let bytes = bs58::decode(s)
                    .into_vec()
                    .map_err(|e| TypesError::InvalidBase58(e.to_string()))?;
                Self::try_from_slice(&bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&bs58::encode(self.0).into_string())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

define_base58_type!(Pubkey, 32, "pubkey", "A 32-byte account address");
define_base58_type!(Hash, 32, "hash", "A 32-byte blockhash used as the transaction freshness anchor");
define_base58_type!(Signature, 64, "signature", "A 64-byte ed25519 signature");

impl Default for Pubkey {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Parse a requester-supplied address
///
/// Anything that is not base58 text decoding to exactly 32 bytes is rejected.
pub fn parse_address(input: &str) -> Result<Pubkey> {
    input.trim().parse()
}
