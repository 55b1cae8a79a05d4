//! Picks the next unissued inventory item
//!
//! Allocation is a linear scan in inventory order, so for the same inventory
//! and the same issued set the answer never changes.

use crate::reservation::{Reservation, ReservationLedger};
use crate::{MintError, Result};
use solbound_inventory::{Inventory, InventoryEntry};
use solbound_registry::IssuedSet;

/// Whether an inventory item has already been minted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationDecision<'a> {
    pub entry: &'a InventoryEntry,
    pub already_issued: bool,
}

pub fn decide<'a>(entry: &'a InventoryEntry, issued: &IssuedSet) -> AllocationDecision<'a> {
    AllocationDecision {
        entry,
        already_issued: issued.contains(&entry.public_identity),
    }
}

/// First item whose identity is not in `issued`
pub fn allocate<'a>(inventory: &'a Inventory, issued: &IssuedSet) -> Result<&'a InventoryEntry> {
    inventory
        .iter()
        .map(|entry| decide(entry, issued))
        .find(|decision| !decision.already_issued)
        .map(|decision| decision.entry)
        .ok_or(MintError::InventoryExhausted {
            total: inventory.len(),
        })
}

/// First unissued item that can also be leased
///
/// Fails with `InventoryExhausted` when nothing is left at all, and with
/// `InventoryReserved` when every remaining item is leased to another request.
pub fn allocate_reserved<'a, 'l>(
    inventory: &'a Inventory,
    issued: &IssuedSet,
    ledger: &'l ReservationLedger,
) -> Result<(&'a InventoryEntry, Reservation<'l>)> {
    let mut unissued = 0usize;

    for entry in inventory.iter().filter(|e| !issued.contains(&e.public_identity)) {
        unissued += 1;
        if let Some(reservation) = ledger.try_reserve(entry.public_identity) {
            return Ok((entry, reservation));
        }
    }

    if unissued == 0 {
        Err(MintError::InventoryExhausted {
            total: inventory.len(),
        })
    } else {
        Err(MintError::InventoryReserved)
    }
}
