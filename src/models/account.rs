//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: Database entity representing an account
//! - `AccountStatus` / `AccountType`: the closed set of status and type values
//! - `CreateAccountRequest`: Request body for registering accounts
//! - `AccountResponse`: Response body carrying the derived balance

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an account.
///
/// Accounts are created `Active` and may be soft-closed exactly once.
/// Rows are never deleted, so closed accounts keep their ledger history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Closed,
}

impl AccountStatus {
    /// String representation stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account category. The account model is flat; the type carries no
/// accounting semantics beyond classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    /// String representation stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `accounts` table. Note what is *not* here: a balance.
/// The balance of an account is always derived from its ledger entries
/// by the balance resolver, never stored and mutated in place.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Account {
    /// Unique identifier for this account
    pub id: Uuid,

    /// Reference to the owning party
    pub owner: String,

    /// Account category ("checking" or "savings")
    pub account_type: String,

    /// Currency code (ISO 4217, 3 letters)
    pub currency: String,

    /// Lifecycle status ("active" or "closed")
    pub status: String,

    /// Timestamp when the account was registered
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last status transition
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account may participate in money movement.
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active.as_str()
    }
}

/// Request body for registering a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "owner": "acme-corp",
///   "account_type": "checking",
///   "currency": "USD"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Owning party for the new account
    pub owner: String,

    /// Account category
    pub account_type: AccountType,

    /// Currency code (defaults to "USD" if not provided)
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Default currency value when not specified in the request.
fn default_currency() -> String {
    "USD".to_string()
}

/// Response body for account endpoints.
///
/// Pairs the account record with its balance, computed on demand from
/// the account's ledger entries.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "owner": "acme-corp",
///   "account_type": "checking",
///   "currency": "USD",
///   "status": "active",
///   "balance": "60.00",
///   "created_at": "2025-12-20T10:00:00Z",
///   "updated_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account unique identifier
    pub id: Uuid,

    /// Owning party
    pub owner: String,

    /// Account category
    pub account_type: String,

    /// Currency code
    pub currency: String,

    /// Lifecycle status
    pub status: String,

    /// Derived balance (credits minus debits over completed transactions)
    pub balance: Decimal,

    /// Registration timestamp
    pub created_at: DateTime<Utc>,

    /// Last status-transition timestamp
    pub updated_at: DateTime<Utc>,
}

impl AccountResponse {
    /// Combine an account row with its resolved balance.
    pub fn from_parts(account: Account, balance: Decimal) -> Self {
        Self {
            id: account.id,
            owner: account.owner,
            account_type: account.account_type,
            currency: account.currency,
            status: account.status,
            balance,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_type_map_to_database_strings() {
        assert_eq!(AccountStatus::Active.as_str(), "active");
        assert_eq!(AccountStatus::Closed.as_str(), "closed");
        assert_eq!(AccountType::Checking.as_str(), "checking");
        assert_eq!(AccountType::Savings.as_str(), "savings");
    }

    #[test]
    fn account_type_deserializes_lowercase() {
        let parsed: AccountType = serde_json::from_str("\"savings\"").unwrap();
        assert_eq!(parsed, AccountType::Savings);
    }

    #[test]
    fn is_active_tracks_status_string() {
        let account = Account {
            id: Uuid::new_v4(),
            owner: "alice".into(),
            account_type: "checking".into(),
            currency: "USD".into(),
            status: "active".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(account.is_active());

        let closed = Account {
            status: "closed".into(),
            ..account
        };
        assert!(!closed.is_active());
    }
}
