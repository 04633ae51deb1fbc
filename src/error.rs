//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Every failure the ledger engine or registry can raise is one of these
/// variants, so callers always receive a distinguishable error kind rather
/// than a raw storage error.
///
/// # Error Categories
///
/// - **Resource errors**: account or transaction id does not exist
/// - **Validation errors**: non-positive amount, self-transfer, currency mismatch
/// - **Business rule errors**: insufficient funds, closed account
/// - **Contention errors**: account lock could not be acquired in time
/// - **Storage errors**: any other `sqlx::Error` from the database
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Requested account does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Account not found")]
    AccountNotFound,

    /// Requested transaction does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// Request parameters violate a precondition (non-positive amount,
    /// source equals destination, currency mismatch).
    ///
    /// Returns HTTP 400 Bad Request with details in the message.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The account's derived balance is below the requested debit.
    ///
    /// Only detectable after lock acquisition and balance resolution, so it
    /// always rolls back the atomic unit. Returns HTTP 422 Unprocessable
    /// Entity.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// The account is closed and cannot take part in money movement.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Account is closed")]
    AccountClosed,

    /// An exclusive account lock could not be acquired within the bound.
    ///
    /// Returns HTTP 409 Conflict; the caller may retry.
    #[error("Timed out waiting for account lock")]
    LockTimeout,

    /// Underlying persistence failure.
    ///
    /// Returns HTTP 500 Internal Server Error (details hidden from clients).
    #[error("Storage error: {0}")]
    Storage(#[source] sqlx::Error),
}

/// Classify database errors, separating lock-wait timeouts from other
/// storage failures.
///
/// PostgreSQL reports a lock that could not be acquired within
/// `lock_timeout` as SQLSTATE `55P03` (lock_not_available); every engine
/// operation bounds its lock waits, so that code surfaces as `LockTimeout`.
impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("55P03") {
                return LedgerError::LockTimeout;
            }
        }
        LedgerError::Storage(err)
    }
}

/// Convert LedgerError into an HTTP response.
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            LedgerError::AccountNotFound => {
                (StatusCode::NOT_FOUND, "account_not_found", self.to_string())
            }
            LedgerError::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                "transaction_not_found",
                self.to_string(),
            ),
            LedgerError::InvalidArgument(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_argument", msg.clone())
            }
            LedgerError::InsufficientFunds => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "insufficient_funds",
                self.to_string(),
            ),
            LedgerError::AccountClosed => {
                (StatusCode::CONFLICT, "account_closed", self.to_string())
            }
            LedgerError::LockTimeout => {
                (StatusCode::CONFLICT, "lock_timeout", self.to_string())
            }
            LedgerError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_expected_status_codes() {
        let cases = [
            (LedgerError::AccountNotFound, StatusCode::NOT_FOUND),
            (LedgerError::TransactionNotFound, StatusCode::NOT_FOUND),
            (
                LedgerError::InvalidArgument("amount must be positive".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                LedgerError::InsufficientFunds,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (LedgerError::AccountClosed, StatusCode::CONFLICT),
            (LedgerError::LockTimeout, StatusCode::CONFLICT),
            (
                LedgerError::Storage(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn storage_errors_do_not_leak_details() {
        let error = LedgerError::Storage(sqlx::Error::PoolClosed);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn plain_sqlx_errors_become_storage() {
        let converted: LedgerError = sqlx::Error::RowNotFound.into();
        assert!(matches!(converted, LedgerError::Storage(_)));
    }
}
