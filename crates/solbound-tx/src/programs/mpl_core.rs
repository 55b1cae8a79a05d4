//! Metaplex Core program
//!
//! Builds the `CreateV2` instruction that mints one asset into a collection,
//! and decodes the fixed-offset prefix of asset and collection accounts.

use super::BorshWriter;
use crate::message::Reader;
use crate::{AccountMeta, Instruction, Result, TxError};
use solbound_types::{Pubkey, MPL_CORE_PROGRAM_ID, SYSTEM_PROGRAM_ID};

const CREATE_V2: u8 = 20;
const DATA_STATE_ACCOUNT: u8 = 0;
const PLUGIN_ATTRIBUTES: u8 = 6;

/// Byte offset of the update-authority discriminant in an asset account
pub const ASSET_UPDATE_AUTHORITY_OFFSET: usize = 33;

/// Account discriminator stored in the first byte of every Core account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Key {
    Uninitialized = 0,
    AssetV1 = 1,
    HashedAssetV1 = 2,
    PluginHeaderV1 = 3,
    PluginRegistryV1 = 4,
    CollectionV1 = 5,
}

impl Key {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Uninitialized),
            1 => Some(Self::AssetV1),
            2 => Some(Self::HashedAssetV1),
            3 => Some(Self::PluginHeaderV1),
            4 => Some(Self::PluginRegistryV1),
            5 => Some(Self::CollectionV1),
            _ => None,
        }
    }
}

/// Who may update an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAuthority {
    None,
    Address(Pubkey),
    Collection(Pubkey),
}

impl UpdateAuthority {
    /// Borsh encoding, as matched by registry filters
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::None => vec![0],
            Self::Address(key) => [&[1u8][..], key.as_bytes()].concat(),
            Self::Collection(key) => [&[2u8][..], key.as_bytes()].concat(),
        }
    }
}

/// Decoded prefix of an `AssetV1` account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHeader {
    pub owner: Pubkey,
    pub update_authority: UpdateAuthority,
    pub name: String,
    pub uri: String,
}

impl AssetHeader {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        match Key::from_u8(reader.u8()?) {
            Some(Key::AssetV1) => {}
            other => {
                return Err(TxError::Malformed(format!("expected AssetV1 account, found {:?}", other)))
            }
        }

        let owner = Pubkey::try_from_slice(reader.take(32)?)?;
        let update_authority = match reader.u8()? {
            0 => UpdateAuthority::None,
            1 => UpdateAuthority::Address(Pubkey::try_from_slice(reader.take(32)?)?),
            2 => UpdateAuthority::Collection(Pubkey::try_from_slice(reader.take(32)?)?),
            n => return Err(TxError::Malformed(format!("unknown update authority variant {}", n))),
        };
        let name = read_string(&mut reader)?;
        let uri = read_string(&mut reader)?;

        Ok(Self {
            owner,
            update_authority,
            name,
            uri,
        })
    }
}

/// Decoded `CollectionV1` account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionHeader {
    pub update_authority: Pubkey,
    pub name: String,
    pub uri: String,
    pub num_minted: u32,
    pub current_size: u32,
}

impl CollectionHeader {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        match Key::from_u8(reader.u8()?) {
            Some(Key::CollectionV1) => {}
            other => {
                return Err(TxError::Malformed(format!(
                    "expected CollectionV1 account, found {:?}",
                    other
                )))
            }
        }

        let update_authority = Pubkey::try_from_slice(reader.take(32)?)?;
        let name = read_string(&mut reader)?;
        let uri = read_string(&mut reader)?;
        let num_minted = read_u32(&mut reader)?;
        let current_size = read_u32(&mut reader)?;

        Ok(Self {
            update_authority,
            name,
            uri,
            num_minted,
            current_size,
        })
    }
}

fn read_u32(reader: &mut Reader<'_>) -> Result<u32> {
    let bytes: [u8; 4] = reader
        .take(4)?
        .try_into()
        .map_err(|_| TxError::Malformed("u32".to_string()))?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_string(reader: &mut Reader<'_>) -> Result<String> {
    let len = read_u32(reader)? as usize;
    let bytes = reader.take(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| TxError::Malformed("string is not UTF-8".to_string()))
}

/// A key/value attribute recorded on the asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// Arguments for minting one asset into a collection
#[derive(Debug, Clone)]
pub struct CreateAssetArgs {
    /// New asset account (signs with the inventory item's key)
    pub asset: Pubkey,
    pub collection: Pubkey,
    /// Collection update authority (server signer)
    pub authority: Pubkey,
    pub payer: Pubkey,
    pub owner: Pubkey,
    pub name: String,
    pub uri: String,
    pub attributes: Vec<Attribute>,
}

/// `CreateV2` with an Attributes plugin and no external plugin adapters
///
/// Omitted optional accounts (update authority, log wrapper) are passed as
/// the program id.
pub fn create_v2(args: &CreateAssetArgs) -> Instruction {
    let accounts = vec![
        AccountMeta::new(args.asset, true),
        AccountMeta::new(args.collection, false),
        AccountMeta::new_readonly(args.authority, true),
        AccountMeta::new(args.payer, true),
        AccountMeta::new_readonly(args.owner, false),
        AccountMeta::new_readonly(MPL_CORE_PROGRAM_ID, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(MPL_CORE_PROGRAM_ID, false),
    ];

    let mut data = BorshWriter::new()
        .u8(CREATE_V2)
        .u8(DATA_STATE_ACCOUNT)
        .string(&args.name)
        .string(&args.uri);

    if args.attributes.is_empty() {
        // Some(vec![])
        data = data.u8(1).u32(0);
    } else {
        // Some(vec![PluginAuthorityPair { Attributes, authority: None }])
        data = data.u8(1).u32(1).u8(PLUGIN_ATTRIBUTES).u32(args.attributes.len() as u32);
        for attribute in &args.attributes {
            data = data.string(&attribute.key).string(&attribute.value);
        }
        data = data.u8(0);
    }

    // external plugin adapters: Some(vec![])
    data = data.u8(1).u32(0);

    Instruction::new(MPL_CORE_PROGRAM_ID, accounts, data.finish())
}

/// Whether a program id and payload encode a `CreateV2` instruction
pub fn is_create_v2(program_id: &Pubkey, data: &[u8]) -> bool {
    *program_id == MPL_CORE_PROGRAM_ID && data.first() == Some(&CREATE_V2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CreateAssetArgs {
        CreateAssetArgs {
            asset: Pubkey::new([1; 32]),
            collection: Pubkey::new([2; 32]),
            authority: Pubkey::new([3; 32]),
            payer: Pubkey::new([4; 32]),
            owner: Pubkey::new([4; 32]),
            name: "OG".to_string(),
            uri: "u".to_string(),
            attributes: vec![Attribute {
                key: "Rarity".to_string(),
                value: "Rare".to_string(),
            }],
        }
    }

    #[test]
    fn test_create_v2_data_layout() {
        let ix = create_v2(&args());
        let expected: Vec<u8> = [
            &[20u8, 0][..],
            &[2, 0, 0, 0, b'O', b'G'],
            &[1, 0, 0, 0, b'u'],
            &[1, 1, 0, 0, 0, 6, 1, 0, 0, 0],
            &[6, 0, 0, 0],
            b"Rarity",
            &[4, 0, 0, 0],
            b"Rare",
            &[0],
            &[1, 0, 0, 0, 0],
        ]
        .concat();
        assert_eq!(ix.data, expected);
        assert!(is_create_v2(&ix.program_id, &ix.data));
    }

    #[test]
    fn test_create_v2_accounts() {
        let ix = create_v2(&args());
        assert_eq!(ix.accounts.len(), 8);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
        assert!(ix.accounts[2].is_signer && !ix.accounts[2].is_writable);
        assert!(ix.accounts[3].is_signer && ix.accounts[3].is_writable);
        assert_eq!(ix.accounts[5].pubkey, MPL_CORE_PROGRAM_ID);
        assert_eq!(ix.accounts[6].pubkey, SYSTEM_PROGRAM_ID);
    }

    #[test]
    fn test_decode_asset_header() {
        let owner = Pubkey::new([8; 32]);
        let collection = Pubkey::new([9; 32]);
        let data: Vec<u8> = [
            &[1u8][..],
            owner.as_bytes(),
            &UpdateAuthority::Collection(collection).to_bytes(),
            &[2, 0, 0, 0, b'O', b'G'],
            &[0, 0, 0, 0],
            &[0],
        ]
        .concat();

        let header = AssetHeader::decode(&data).unwrap();
        assert_eq!(header.owner, owner);
        assert_eq!(header.update_authority, UpdateAuthority::Collection(collection));
        assert_eq!(header.name, "OG");
        assert_eq!(data[ASSET_UPDATE_AUTHORITY_OFFSET], 2);
    }

    #[test]
    fn test_decode_rejects_collection_as_asset() {
        let mut data = vec![5u8];
        data.extend_from_slice(&[0; 32]);
        assert!(AssetHeader::decode(&data).is_err());
    }

    #[test]
    fn test_decode_collection() {
        let authority = Pubkey::new([7; 32]);
        let data: Vec<u8> = [
            &[5u8][..],
            authority.as_bytes(),
            &[1, 0, 0, 0, b'C'],
            &[0, 0, 0, 0],
            &12u32.to_le_bytes(),
            &10u32.to_le_bytes(),
        ]
        .concat();

        let header = CollectionHeader::decode(&data).unwrap();
        assert_eq!(header.update_authority, authority);
        assert_eq!(header.num_minted, 12);
        assert_eq!(header.current_size, 10);
    }
}
