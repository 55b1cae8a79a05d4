//! Compute Budget program

use super::BorshWriter;
use crate::Instruction;
use solbound_types::{Pubkey, COMPUTE_BUDGET_PROGRAM_ID};

const SET_COMPUTE_UNIT_PRICE: u8 = 3;

/// Set the priority fee in micro-lamports per compute unit
pub fn set_compute_unit_price(micro_lamports: u64) -> Instruction {
    let data = BorshWriter::new()
        .u8(SET_COMPUTE_UNIT_PRICE)
        .u64(micro_lamports)
        .finish();
    Instruction::new(COMPUTE_BUDGET_PROGRAM_ID, vec![], data)
}

/// Whether a program id and payload encode a compute-unit-price instruction
pub fn is_set_compute_unit_price(program_id: &Pubkey, data: &[u8]) -> bool {
    *program_id == COMPUTE_BUDGET_PROGRAM_ID && data.first() == Some(&SET_COMPUTE_UNIT_PRICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let ix = set_compute_unit_price(100);
        assert!(ix.accounts.is_empty());
        assert_eq!(ix.data, vec![3, 100, 0, 0, 0, 0, 0, 0, 0]);
        assert!(is_set_compute_unit_price(&ix.program_id, &ix.data));
    }
}
