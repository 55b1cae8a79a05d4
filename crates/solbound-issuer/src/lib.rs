//! Solbound Issuer - Burn-to-Mint Allocation and Assembly
//!
//! This crate turns a mint request into a transaction the requester only has
//! to countersign. It follows a few fixed rules:
//!
//! 1. The requester's address is validated before any external call
//! 2. The chain is the source of truth for what has been issued
//! 3. Allocation is deterministic: the first unissued item in inventory order
//! 4. Issuance and the token burn land in the same atomic transaction
//! 5. The burn amount comes from configuration, never from the request
//!
//! # Usage
//!
//! Build a [`MintService`] once at startup from the decrypted inventory, the
//! collection authority signer and the registry/chain/storage ports, then call
//! [`MintService::mint`] per request.

pub mod allocator;
pub mod assembler;
pub mod config;
pub mod error;
pub mod reservation;
pub mod service;

pub use allocator::{allocate, allocate_reserved, decide, AllocationDecision};
pub use assembler::{
    assemble, build_instructions, parse_requester, requester_excerpt, AssemblyInput, FeeParams, TransactionEnvelope,
};
pub use config::IssuerConfig;
pub use error::{MintError, Result, GENERIC_FAILURE_MESSAGE};
pub use reservation::{Reservation, ReservationLedger};
pub use service::{InventoryStatus, MintOutcome, MintService};
