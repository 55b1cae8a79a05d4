pub mod chain;
pub mod inventory;
