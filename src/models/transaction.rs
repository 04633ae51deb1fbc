//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: Database entity recording one money-movement attempt
//! - Request types for deposit, withdrawal, and transfer operations
//! - `TransactionResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of money movement a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionType {
    /// String representation stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction outcome.
///
/// A row is inserted `Pending` before any of its ledger entries exist and
/// moves at most once, to `Completed` or `Failed`. Only entries owned by a
/// `Completed` transaction count toward balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    /// String representation stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Each transaction:
/// - References one or two accounts depending on its type
/// - Stores the amount as an exact decimal (never floats)
/// - Is immutable once its status reaches a terminal state
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Transaction {
    /// Unique identifier for this transaction
    pub id: Uuid,

    /// Kind of movement ("deposit", "withdrawal", or "transfer")
    pub transaction_type: String,

    /// Source account (debited side)
    ///
    /// NULL for deposits, which are funded by an implicit external party.
    pub source_account_id: Option<Uuid>,

    /// Destination account (credited side)
    ///
    /// NULL for withdrawals, where funds leave the system.
    pub destination_account_id: Option<Uuid>,

    /// Amount moved (always positive)
    pub amount: Decimal,

    /// Currency code (ISO 4217)
    pub currency: String,

    /// Transaction status ("pending", "completed", or "failed")
    pub status: String,

    /// Human-readable description
    pub description: Option<String>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,
}

/// Request to deposit money into an account.
///
/// The deposit is funded externally, so there is no source account and no
/// funds check; the transaction currency is the account's currency.
///
/// # JSON Example
///
/// ```json
/// {
///   "account_id": "550e8400-e29b-41d4-a716-446655440000",
///   "amount": "100.00",
///   "description": "Initial deposit"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// Account to credit
    pub account_id: Uuid,

    /// Amount to add, as a decimal string
    pub amount: Decimal,

    /// Optional description
    pub description: Option<String>,
}

/// Request to withdraw money from an account.
///
/// Fails with `insufficient_funds` if the derived balance is below the
/// requested amount at the time the account lock is held.
#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    /// Account to debit
    pub account_id: Uuid,

    /// Amount to remove, as a decimal string
    pub amount: Decimal,

    /// Optional description
    pub description: Option<String>,
}

/// Request to transfer money between two accounts.
///
/// # JSON Example
///
/// ```json
/// {
///   "source_account_id": "550e8400-e29b-41d4-a716-446655440000",
///   "destination_account_id": "660e8400-e29b-41d4-a716-446655440001",
///   "amount": "40.00",
///   "currency": "USD",
///   "description": "Payment for services"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Account to debit
    pub source_account_id: Uuid,

    /// Account to credit
    pub destination_account_id: Uuid,

    /// Amount to move, as a decimal string
    pub amount: Decimal,

    /// Requested currency; must match both accounts
    pub currency: String,

    /// Optional description
    pub description: Option<String>,
}

/// Response returned for transaction operations.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub transaction_type: String,
    pub source_account_id: Option<Uuid>,
    pub destination_account_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            transaction_type: transaction.transaction_type,
            source_account_id: transaction.source_account_id,
            destination_account_id: transaction.destination_account_id,
            amount: transaction.amount,
            currency: transaction.currency,
            status: transaction.status,
            description: transaction.description,
            created_at: transaction.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_and_status_map_to_database_strings() {
        assert_eq!(TransactionType::Deposit.as_str(), "deposit");
        assert_eq!(TransactionType::Withdrawal.as_str(), "withdrawal");
        assert_eq!(TransactionType::Transfer.as_str(), "transfer");
        assert_eq!(TransactionStatus::Pending.as_str(), "pending");
        assert_eq!(TransactionStatus::Completed.as_str(), "completed");
        assert_eq!(TransactionStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn deposit_request_parses_decimal_string_amount() {
        let request: DepositRequest = serde_json::from_str(
            r#"{"account_id":"550e8400-e29b-41d4-a716-446655440000","amount":"100.25"}"#,
        )
        .unwrap();
        assert_eq!(request.amount, Decimal::new(10025, 2));
        assert!(request.description.is_none());
    }
}
