//! Solbound Types - Canonical domain types for the burn-to-mint action
//!
//! This crate contains all foundational types for Solbound with zero dependencies
//! on other solbound crates. It defines:
//!
//! - Address types (Pubkey, Hash, Signature) with base58 wire encoding
//! - Inventory types (InventoryItem, SecretKeyMaterial)
//! - Registry types (IssuedAsset)
//! - Well-known program addresses
//!
//! # Invariants
//!
//! 1. Every issued asset's public identity derives from exactly one inventory
//!    item's private identity
//! 2. Private identities never appear in `Debug` output or logs
//! 3. The burn quantity is protocol configuration, never request input

pub mod address;
pub mod asset;
pub mod error;
pub mod programs;

pub use address::*;
pub use asset::*;
pub use error::*;
pub use programs::*;
