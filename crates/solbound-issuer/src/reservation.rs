//! Short-lived leases on picked inventory items
//!
//! The registry only learns about an issuance once the requester signs and
//! lands the transaction. Until then a concurrent request would pick the same
//! item. A lease holds the item back for `ttl`; it is dropped early when the
//! request fails before handing out a transaction.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use solbound_types::Pubkey;
use std::time::{Duration, Instant};

/// In-process lease table keyed by an item's public identity
#[derive(Debug)]
pub struct ReservationLedger {
    leases: DashMap<Pubkey, Instant>,
    ttl: Duration,
}

impl ReservationLedger {
    pub fn new(ttl: Duration) -> Self {
        Self {
            leases: DashMap::new(),
            ttl,
        }
    }

    /// A ledger that never holds anything back
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Lease `identity` unless another request holds an unexpired lease
    pub fn try_reserve(&self, identity: Pubkey) -> Option<Reservation<'_>> {
        if !self.is_enabled() {
            return Some(Reservation {
                ledger: self,
                identity,
                armed: false,
            });
        }

        let now = Instant::now();
        match self.leases.entry(identity) {
            Entry::Occupied(mut lease) => {
                if *lease.get() > now {
                    return None;
                }
                lease.insert(now + self.ttl);
            }
            Entry::Vacant(slot) => {
                slot.insert(now + self.ttl);
            }
        }

        Some(Reservation {
            ledger: self,
            identity,
            armed: true,
        })
    }

    pub fn is_reserved(&self, identity: &Pubkey) -> bool {
        self.leases
            .get(identity)
            .map(|expiry| *expiry > Instant::now())
            .unwrap_or(false)
    }

    pub fn release(&self, identity: &Pubkey) {
        self.leases.remove(identity);
    }

    /// Drop expired leases and return how many remain
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        self.leases.retain(|_, expiry| *expiry > now);
        self.leases.len()
    }
}

/// A held lease; released on drop unless [`Reservation::keep`] is called
#[derive(Debug)]
pub struct Reservation<'a> {
    ledger: &'a ReservationLedger,
    identity: Pubkey,
    armed: bool,
}

impl Reservation<'_> {
    pub fn identity(&self) -> &Pubkey {
        &self.identity
    }

    /// Keep the lease until it expires
    pub fn keep(mut self) {
        self.armed = false;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.ledger.release(&self.identity);
            tracing::debug!(identity = %self.identity, "Released reservation");
        }
    }
}
