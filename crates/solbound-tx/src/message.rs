//! Version-0 message compilation
//!
//! Account keys are ordered payer first, then by category (writable signers,
//! read-only signers, writable non-signers, read-only non-signers), keeping
//! first-seen order inside each category. Program ids are read-only
//! non-signers unless an instruction also passes them with stronger flags.

use crate::short_vec::{decode_len, encode_len};
use crate::{Instruction, Result, TxError};
use serde::{Deserialize, Serialize};
use solbound_types::{Hash, Pubkey};

/// Prefix byte marking a versioned message (version 0)
pub const MESSAGE_VERSION_PREFIX: u8 = 0x80;

/// Signature and read-only counts for the account key list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

/// An instruction whose accounts are indices into the message key list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// A compiled version-0 message without address lookup tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V0Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

#[derive(Debug, Clone, Copy)]
struct KeyMeta {
    pubkey: Pubkey,
    is_signer: bool,
    is_writable: bool,
}

impl V0Message {
    /// Compile instructions with `payer` as fee payer and first signer
    pub fn compile(payer: &Pubkey, instructions: &[Instruction], recent_blockhash: Hash) -> Result<Self> {
        let mut metas: Vec<KeyMeta> = vec![KeyMeta {
            pubkey: *payer,
            is_signer: true,
            is_writable: true,
        }];

        let mut upsert = |pubkey: Pubkey, is_signer: bool, is_writable: bool| {
            match metas.iter_mut().find(|m| m.pubkey == pubkey) {
                Some(meta) => {
                    meta.is_signer |= is_signer;
                    meta.is_writable |= is_writable;
                }
                None => metas.push(KeyMeta {
                    pubkey,
                    is_signer,
                    is_writable,
                }),
            }
        };

        for ix in instructions {
            upsert(ix.program_id, false, false);
            for account in &ix.accounts {
                upsert(account.pubkey, account.is_signer, account.is_writable);
            }
        }

        let by_category = |signer: bool, writable: bool| {
            metas
                .iter()
                .filter(move |m| m.is_signer == signer && m.is_writable == writable)
                .map(|m| m.pubkey)
        };

        let writable_signers: Vec<Pubkey> = by_category(true, true).collect();
        let readonly_signers: Vec<Pubkey> = by_category(true, false).collect();
        let writable_unsigned: Vec<Pubkey> = by_category(false, true).collect();
        let readonly_unsigned: Vec<Pubkey> = by_category(false, false).collect();

        let header = MessageHeader {
            num_required_signatures: to_u8(writable_signers.len() + readonly_signers.len())?,
            num_readonly_signed_accounts: to_u8(readonly_signers.len())?,
            num_readonly_unsigned_accounts: to_u8(readonly_unsigned.len())?,
        };

        let account_keys: Vec<Pubkey> = writable_signers
            .into_iter()
            .chain(readonly_signers)
            .chain(writable_unsigned)
            .chain(readonly_unsigned)
            .collect();

        if account_keys.len() > 256 {
            return Err(TxError::TooManyAccounts(account_keys.len()));
        }

        let index_of = |key: &Pubkey| -> Result<u8> {
            let position = account_keys
                .iter()
                .position(|k| k == key)
                .ok_or_else(|| TxError::Malformed(format!("account {} missing from key list", key)))?;
            to_u8(position)
        };

        let compiled = instructions
            .iter()
            .map(|ix| {
                Ok(CompiledInstruction {
                    program_id_index: index_of(&ix.program_id)?,
                    accounts: ix
                        .accounts
                        .iter()
                        .map(|a| index_of(&a.pubkey))
                        .collect::<Result<Vec<u8>>>()?,
                    data: ix.data.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// The fee payer (first account key)
    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.account_keys.first()
    }

    /// Keys whose signatures are required, in signature-slot order
    pub fn signer_keys(&self) -> &[Pubkey] {
        let n = (self.header.num_required_signatures as usize).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    /// Program id of a compiled instruction
    pub fn program_id(&self, instruction: &CompiledInstruction) -> Option<&Pubkey> {
        self.account_keys.get(instruction.program_id_index as usize)
    }

    /// Whether the key at `index` is writable
    pub fn is_writable(&self, index: usize) -> bool {
        let h = &self.header;
        let signed = h.num_required_signatures as usize;
        if index < signed {
            index < signed - h.num_readonly_signed_accounts as usize
        } else {
            index < self.account_keys.len() - h.num_readonly_unsigned_accounts as usize
        }
    }

    /// Serialize to wire bytes (the bytes that get signed)
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(256);
        out.push(MESSAGE_VERSION_PREFIX);
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        encode_len(&mut out, self.account_keys.len())?;
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }

        out.extend_from_slice(self.recent_blockhash.as_bytes());

        encode_len(&mut out, self.instructions.len())?;
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_len(&mut out, ix.accounts.len())?;
            out.extend_from_slice(&ix.accounts);
            encode_len(&mut out, ix.data.len())?;
            out.extend_from_slice(&ix.data);
        }

        // address table lookups
        encode_len(&mut out, 0)?;

        Ok(out)
    }

    /// Parse wire bytes, returning the message and bytes consumed
    pub fn deserialize(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut reader = Reader::new(bytes);

        if reader.u8()? != MESSAGE_VERSION_PREFIX {
            return Err(TxError::Malformed("expected a version 0 message".to_string()));
        }

        let header = MessageHeader {
            num_required_signatures: reader.u8()?,
            num_readonly_signed_accounts: reader.u8()?,
            num_readonly_unsigned_accounts: reader.u8()?,
        };

        let key_count = reader.len()?;
        let mut account_keys = Vec::with_capacity(key_count);
        for _ in 0..key_count {
            account_keys.push(Pubkey::try_from_slice(reader.take(32)?)?);
        }

        let recent_blockhash = Hash::try_from_slice(reader.take(32)?)?;

        let ix_count = reader.len()?;
        let mut instructions = Vec::with_capacity(ix_count);
        for _ in 0..ix_count {
            let program_id_index = reader.u8()?;
            let n = reader.len()?;
            let accounts = reader.take(n)?.to_vec();
            let n = reader.len()?;
            let data = reader.take(n)?.to_vec();
            instructions.push(CompiledInstruction {
                program_id_index,
                accounts,
                data,
            });
        }

        if reader.len()? != 0 {
            return Err(TxError::Malformed("address table lookups are not supported".to_string()));
        }

        Ok((
            Self {
                header,
                account_keys,
                recent_blockhash,
                instructions,
            },
            reader.pos,
        ))
    }
}

fn to_u8(n: usize) -> Result<u8> {
    u8::try_from(n).map_err(|_| TxError::TooManyAccounts(n))
}

/// Cursor over wire bytes
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pub(crate) pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| TxError::Malformed("unexpected end of input".to_string()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn len(&mut self) -> Result<usize> {
        let (len, used) = decode_len(&self.bytes[self.pos..])?;
        self.pos += used;
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccountMeta;

    fn key(n: u8) -> Pubkey {
        Pubkey::new([n; 32])
    }

    #[test]
    fn test_account_ordering_and_header() {
        let payer = key(1);
        let program = key(9);
        let ix = Instruction::new(
            program,
            vec![
                AccountMeta::new_readonly(key(5), false),
                AccountMeta::new(key(4), false),
                AccountMeta::new_readonly(key(3), true),
                AccountMeta::new(key(2), true),
                AccountMeta::new(payer, true),
            ],
            vec![1, 2, 3],
        );

        let message = V0Message::compile(&payer, &[ix], Hash::new([7; 32])).unwrap();

        assert_eq!(
            message.account_keys,
            vec![key(1), key(2), key(3), key(4), key(9), key(5)]
        );
        assert_eq!(message.header.num_required_signatures, 3);
        assert_eq!(message.header.num_readonly_signed_accounts, 1);
        assert_eq!(message.header.num_readonly_unsigned_accounts, 2);
        assert_eq!(message.instructions[0].program_id_index, 4);
        assert_eq!(message.instructions[0].accounts, vec![5, 3, 2, 1, 0]);

        assert!(message.is_writable(0));
        assert!(message.is_writable(1));
        assert!(!message.is_writable(2));
        assert!(message.is_writable(3));
        assert!(!message.is_writable(4));
    }

    #[test]
    fn test_flags_are_merged_across_instructions() {
        let payer = key(1);
        let ix1 = Instruction::new(key(8), vec![AccountMeta::new_readonly(key(2), false)], vec![]);
        let ix2 = Instruction::new(key(8), vec![AccountMeta::new(key(2), true)], vec![]);

        let message = V0Message::compile(&payer, &[ix1, ix2], Hash::zeroed()).unwrap();
        assert_eq!(message.signer_keys(), &[key(1), key(2)]);
    }

    #[test]
    fn test_wire_layout() {
        let payer = key(1);
        let ix = Instruction::new(key(2), vec![], vec![0xaa]);
        let message = V0Message::compile(&payer, &[ix], Hash::new([3; 32])).unwrap();
        let bytes = message.serialize().unwrap();

        assert_eq!(bytes[0], MESSAGE_VERSION_PREFIX);
        assert_eq!(&bytes[1..4], &[1, 0, 1]);
        assert_eq!(bytes[4], 2);
        // prefix + header + len + 2 keys + blockhash + ix(1 + 1 + 1 + 1 + 1) + lookups
        assert_eq!(bytes.len(), 1 + 3 + 1 + 64 + 32 + 1 + 4 + 1);

        let (decoded, used) = V0Message::deserialize(&bytes).unwrap();
        assert_eq!(used, bytes.len());
        assert_eq!(decoded, message);
    }
}
