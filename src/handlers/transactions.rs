//! Transaction HTTP handlers.
//!
//! This module implements the money-movement API endpoints:
//! - POST /api/v1/transactions/deposit - Add money to an account
//! - POST /api/v1/transactions/withdrawal - Remove money from an account
//! - POST /api/v1/transactions/transfer - Move money between accounts
//! - GET /api/v1/transactions/:id - Get transaction details
//!
//! Handlers only translate between HTTP and the ledger engine; every
//! invariant (funds check, lock ordering, atomic commit) lives in
//! `services::ledger`.

use crate::{
    db::DbPool,
    error::LedgerError,
    models::transaction::{
        DepositRequest, TransactionResponse, TransferRequest, WithdrawRequest,
    },
    services::ledger,
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

/// Deposit money into an account.
///
/// # Request Body
///
/// ```json
/// {
///   "account_id": "550e8400-...",
///   "amount": "100.00",
///   "description": "Initial deposit"
/// }
/// ```
///
/// # Response (200)
///
/// ```json
/// {
///   "id": "770e8400-...",
///   "transaction_type": "deposit",
///   "destination_account_id": "550e8400-...",
///   "amount": "100.00",
///   "status": "completed",
///   "created_at": "2025-12-21T16:00:00Z"
/// }
/// ```
pub async fn create_deposit(
    State(pool): State<DbPool>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<TransactionResponse>, LedgerError> {
    let transaction = ledger::deposit(
        &pool,
        request.account_id,
        request.amount,
        request.description,
    )
    .await?;

    Ok(Json(transaction.into()))
}

/// Withdraw money from an account.
///
/// # Endpoint
///
/// `POST /api/v1/transactions/withdrawal`
///
/// Fails with 422 `insufficient_funds` if the derived balance is below the
/// requested amount; the failed attempt leaves the ledger untouched.
pub async fn create_withdrawal(
    State(pool): State<DbPool>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<TransactionResponse>, LedgerError> {
    let transaction = ledger::withdraw(
        &pool,
        request.account_id,
        request.amount,
        request.description,
    )
    .await?;

    Ok(Json(transaction.into()))
}

/// Transfer money between accounts.
///
/// # Atomicity
///
/// The funds check, the transaction record, and both ledger entries commit
/// as one unit; on any failure none of them survive.
pub async fn create_transfer(
    State(pool): State<DbPool>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransactionResponse>, LedgerError> {
    let transaction = ledger::transfer(
        &pool,
        request.source_account_id,
        request.destination_account_id,
        request.amount,
        &request.currency,
        request.description,
    )
    .await?;

    Ok(Json(transaction.into()))
}

/// Get a transaction by ID.
pub async fn get_transaction(
    State(pool): State<DbPool>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, LedgerError> {
    let transaction = ledger::get_transaction(&pool, transaction_id).await?;

    Ok(Json(transaction.into()))
}
