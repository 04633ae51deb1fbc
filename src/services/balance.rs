//! Balance resolver.
//!
//! Balances are never stored. An account's balance is the signed sum of its
//! ledger entries (credit positive, debit negative), counting only entries
//! whose owning transaction completed. An account with no entries has
//! balance zero.

use crate::error::LedgerError;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

/// Compute the current balance of an account.
///
/// Takes an explicit connection rather than the pool so the caller decides
/// which snapshot the fold runs against: engine operations pass their own
/// open database transaction, after locking the account row, so the value
/// they act on cannot be invalidated by a concurrent writer. Read-only
/// callers pass a pooled connection.
///
/// # Errors
///
/// - `AccountNotFound` if the account id is not registered
/// - `Storage` on database failure
pub async fn resolve_balance(
    conn: &mut PgConnection,
    account_id: Uuid,
) -> Result<Decimal, LedgerError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
        .bind(account_id)
        .fetch_one(&mut *conn)
        .await?;

    if !exists {
        return Err(LedgerError::AccountNotFound);
    }

    let balance: Decimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(CASE WHEN e.entry_type = 'credit' THEN e.amount ELSE -e.amount END), 0)
        FROM ledger_entries e
        JOIN transactions t ON t.id = e.transaction_id
        WHERE e.account_id = $1
          AND t.status = 'completed'
        "#,
    )
    .bind(account_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(balance)
}
