//! SPL Token and Associated Token Account programs

use super::BorshWriter;
use crate::{AccountMeta, Instruction, Result};
use solbound_crypto::find_program_address;
use solbound_types::{Pubkey, ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID};

const BURN_CHECKED: u8 = 15;

/// Address of `owner`'s associated token account for `mint`
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey> {
    let (address, _bump) = find_program_address(
        &[owner.as_bytes(), TOKEN_PROGRAM_ID.as_bytes(), mint.as_bytes()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    Ok(address)
}

/// Destroy `amount` base units from `account`, asserting the mint's decimals
pub fn burn_checked(account: &Pubkey, mint: &Pubkey, owner: &Pubkey, amount: u64, decimals: u8) -> Instruction {
    let data = BorshWriter::new()
        .u8(BURN_CHECKED)
        .u64(amount)
        .u8(decimals)
        .finish();

    Instruction::new(
        TOKEN_PROGRAM_ID,
        vec![
            AccountMeta::new(*account, false),
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data,
    )
}

/// Whether a program id and payload encode a `BurnChecked` instruction
pub fn is_burn_checked(program_id: &Pubkey, data: &[u8]) -> bool {
    *program_id == TOKEN_PROGRAM_ID && data.len() == 10 && data[0] == BURN_CHECKED
}

/// Decode `(amount, decimals)` from a `BurnChecked` payload
pub fn decode_burn_checked(data: &[u8]) -> Option<(u64, u8)> {
    if data.len() != 10 || data[0] != BURN_CHECKED {
        return None;
    }
    let amount = u64::from_le_bytes(data[1..9].try_into().ok()?);
    Some((amount, data[9]))
}
