//! Account registry - account identity, status, and read paths.
//!
//! The registry owns account rows but never their balances; every balance
//! it reports comes from the balance resolver. The only mutation it
//! exposes is the soft close (`active` -> `closed`).

use crate::{
    db::DbPool,
    error::LedgerError,
    models::{
        account::{Account, AccountType},
        ledger_entry::LedgerEntry,
    },
    services::balance,
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Register a new account. Accounts start active with an empty ledger,
/// so their initial balance is zero by construction.
///
/// # Errors
///
/// - `InvalidArgument`: empty owner or malformed currency code
/// - `Storage`: database failure
pub async fn create_account(
    pool: &DbPool,
    owner: &str,
    account_type: AccountType,
    currency: &str,
) -> Result<Account, LedgerError> {
    if owner.trim().is_empty() {
        return Err(LedgerError::InvalidArgument(
            "owner must not be empty".to_string(),
        ));
    }
    let currency = currency.to_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(LedgerError::InvalidArgument(
            "currency must be a 3-letter code".to_string(),
        ));
    }

    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (owner, account_type, currency)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(owner)
    .bind(account_type.as_str())
    .bind(&currency)
    .fetch_one(pool)
    .await?;

    tracing::info!(account_id = %account.id, %account_type, "account created");
    Ok(account)
}

/// Look up an account by id.
///
/// # Errors
///
/// - `AccountNotFound` if the id is unknown
pub async fn get_account(pool: &DbPool, account_id: Uuid) -> Result<Account, LedgerError> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_optional(pool)
        .await?
        .ok_or(LedgerError::AccountNotFound)
}

/// Look up an account together with its derived balance.
pub async fn get_account_with_balance(
    pool: &DbPool,
    account_id: Uuid,
) -> Result<(Account, Decimal), LedgerError> {
    let mut conn = pool.acquire().await?;

    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(LedgerError::AccountNotFound)?;

    let balance = balance::resolve_balance(&mut conn, account_id).await?;

    Ok((account, balance))
}

/// List all registered accounts, newest first.
pub async fn list_accounts(pool: &DbPool) -> Result<Vec<Account>, LedgerError> {
    let accounts =
        sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;

    Ok(accounts)
}

/// Soft-close an account.
///
/// Closed accounts keep their ledger history and remain readable; they can
/// no longer take part in money movement. The transition happens at most
/// once.
///
/// # Errors
///
/// - `AccountNotFound` if the id is unknown
/// - `AccountClosed` if the account was already closed
pub async fn close_account(pool: &DbPool, account_id: Uuid) -> Result<Account, LedgerError> {
    let updated = sqlx::query_as::<_, Account>(
        r#"
        UPDATE accounts
        SET status = 'closed', updated_at = NOW()
        WHERE id = $1 AND status = 'active'
        RETURNING *
        "#,
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(account) => {
            tracing::info!(%account_id, "account closed");
            Ok(account)
        }
        // No active row matched: unknown id or already closed.
        None => {
            get_account(pool, account_id).await?;
            Err(LedgerError::AccountClosed)
        }
    }
}

/// List an account's ledger entries, ordered by creation time ascending.
///
/// # Errors
///
/// - `AccountNotFound` if the id is unknown
pub async fn list_ledger_entries(
    pool: &DbPool,
    account_id: Uuid,
) -> Result<Vec<LedgerEntry>, LedgerError> {
    get_account(pool, account_id).await?;

    let entries = sqlx::query_as::<_, LedgerEntry>(
        r#"
        SELECT * FROM ledger_entries
        WHERE account_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
