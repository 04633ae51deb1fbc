//! Business logic services.
//!
//! Services contain the core ledger semantics separated from HTTP handlers:
//! the account registry, the balance resolver, and the ledger engine that
//! performs atomic money movement.

pub mod account;
pub mod balance;
pub mod ledger;
