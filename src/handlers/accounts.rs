//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /api/v1/accounts - Register a new account
//! - GET /api/v1/accounts - List all accounts
//! - GET /api/v1/accounts/:id - Get account with derived balance
//! - POST /api/v1/accounts/:id/close - Soft-close an account
//! - GET /api/v1/accounts/:id/ledger - List an account's ledger entries

use crate::{
    db::DbPool,
    error::LedgerError,
    models::{
        account::{Account, AccountResponse, CreateAccountRequest},
        ledger_entry::LedgerEntry,
    },
    services::account as account_service,
};
use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Register a new account.
///
/// # Endpoint
///
/// `POST /api/v1/accounts`
///
/// # Request Body
///
/// ```json
/// {
///   "owner": "acme-corp",
///   "account_type": "checking",
///   "currency": "USD"  // optional, defaults to USD
/// }
/// ```
///
/// # Response
///
/// - **Success (200)**: the new account with balance `"0"`
/// - **Error (400)**: empty owner or malformed currency
/// - **Error (500)**: database error
pub async fn create_account(
    State(pool): State<DbPool>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, LedgerError> {
    let account = account_service::create_account(
        &pool,
        &request.owner,
        request.account_type,
        &request.currency,
    )
    .await?;

    // A fresh account has no ledger entries yet.
    Ok(Json(AccountResponse::from_parts(account, Decimal::ZERO)))
}

/// Get a specific account with its derived balance.
///
/// # Endpoint
///
/// `GET /api/v1/accounts/{id}`
///
/// # Response
///
/// - **Success (200)**: account record plus balance folded from its ledger
/// - **Error (404)**: unknown account id
pub async fn get_account(
    State(pool): State<DbPool>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<AccountResponse>, LedgerError> {
    let (account, balance) =
        account_service::get_account_with_balance(&pool, account_id).await?;

    Ok(Json(AccountResponse::from_parts(account, balance)))
}

/// List all registered accounts, newest first.
///
/// Balance is omitted here; it is a per-account derived value and the list
/// endpoint stays a cheap registry read.
pub async fn list_accounts(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<Account>>, LedgerError> {
    let accounts = account_service::list_accounts(&pool).await?;

    Ok(Json(accounts))
}

/// Soft-close an account.
///
/// # Endpoint
///
/// `POST /api/v1/accounts/{id}/close`
///
/// # Response
///
/// - **Success (200)**: the closed account with its final balance
/// - **Error (404)**: unknown account id
/// - **Error (409)**: account already closed
pub async fn close_account(
    State(pool): State<DbPool>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<AccountResponse>, LedgerError> {
    let account = account_service::close_account(&pool, account_id).await?;
    let (_, balance) = account_service::get_account_with_balance(&pool, account_id).await?;

    Ok(Json(AccountResponse::from_parts(account, balance)))
}

/// List an account's ledger entries, creation time ascending.
///
/// # Endpoint
///
/// `GET /api/v1/accounts/{id}/ledger`
pub async fn list_ledger_entries(
    State(pool): State<DbPool>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Vec<LedgerEntry>>, LedgerError> {
    let entries = account_service::list_ledger_entries(&pool, account_id).await?;

    Ok(Json(entries))
}
