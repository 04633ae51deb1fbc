//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the API request/response types derived from them.

/// Account registry model
pub mod account;
/// Append-only ledger entry model
pub mod ledger_entry;
/// Money-movement transaction model
pub mod transaction;
