//! Ledger engine - core business logic for money movement.
//!
//! Each operation (deposit, withdrawal, transfer) runs as one atomic unit:
//!
//! 1. Start a database transaction with a bounded lock wait
//! 2. Lock the participating account rows with `SELECT ... FOR UPDATE`
//! 3. Resolve the derived balance under the lock (where a debit is involved)
//! 4. Insert the transaction record as `pending`
//! 5. Append the debit/credit ledger entries
//! 6. Promote the transaction to `completed` and commit
//!
//! # Atomicity Guarantees
//!
//! All writes happen inside one PostgreSQL transaction. An error on any
//! step rolls back every write made so far, either explicitly or when the
//! uncommitted `sqlx::Transaction` is dropped on an early return - no
//! partial transaction/entry state is ever visible to other operations.
//! A failed attempt leaves no transaction row behind.
//!
//! # Lock Ordering
//!
//! Transfers lock both account rows before reading either balance, always
//! in ascending account-id order regardless of transfer direction, so two
//! transfers over the same pair of accounts can never deadlock each other.

use crate::{
    db::DbPool,
    error::LedgerError,
    models::{
        account::Account,
        ledger_entry::EntryType,
        transaction::{Transaction, TransactionType},
    },
    services::balance,
};
use rust_decimal::Decimal;
use sqlx::{PgConnection, Postgres, Transaction as PgTransaction};
use uuid::Uuid;

/// Bound on how long an operation may wait for an account row lock.
/// Exceeding it surfaces as `LedgerError::LockTimeout` (SQLSTATE 55P03).
const LOCK_TIMEOUT: &str = "5s";

/// Deposit money into an account.
///
/// Deposits are funded by an implicit external counterparty, so once the
/// account is valid there is no funds check: the engine records a
/// `deposit` transaction and a single credit entry. The transaction
/// currency is the account's currency.
///
/// # Errors
///
/// - `InvalidArgument`: amount is zero or negative (checked before any write)
/// - `AccountNotFound` / `AccountClosed`: account invalid
/// - `LockTimeout` / `Storage`: contention or database failure
#[tracing::instrument(skip(pool, description), fields(%account_id, %amount))]
pub async fn deposit(
    pool: &DbPool,
    account_id: Uuid,
    amount: Decimal,
    description: Option<String>,
) -> Result<Transaction, LedgerError> {
    validate_amount(amount)?;

    let mut tx = begin(pool).await?;

    let account = lock_account(&mut tx, account_id).await?;

    let transaction = insert_pending(
        &mut tx,
        TransactionType::Deposit,
        None,
        Some(account.id),
        amount,
        &account.currency,
        description,
    )
    .await?;
    append_entry(&mut tx, account.id, transaction.id, EntryType::Credit, amount).await?;
    let transaction = mark_completed(&mut tx, transaction.id).await?;

    tx.commit().await?;

    tracing::info!(transaction_id = %transaction.id, "deposit completed");
    Ok(transaction)
}

/// Withdraw money from an account.
///
/// The balance check and the debit entry happen under the same exclusive
/// account lock, so no concurrent withdrawal can interleave between check
/// and write.
///
/// # Errors
///
/// - `InvalidArgument`: amount is zero or negative (checked before any write)
/// - `AccountNotFound` / `AccountClosed`: account invalid
/// - `InsufficientFunds`: derived balance below the requested amount; the
///   whole unit rolls back and no transaction row is kept
/// - `LockTimeout` / `Storage`: contention or database failure
#[tracing::instrument(skip(pool, description), fields(%account_id, %amount))]
pub async fn withdraw(
    pool: &DbPool,
    account_id: Uuid,
    amount: Decimal,
    description: Option<String>,
) -> Result<Transaction, LedgerError> {
    validate_amount(amount)?;

    let mut tx = begin(pool).await?;

    let account = lock_account(&mut tx, account_id).await?;

    let current = balance::resolve_balance(&mut tx, account_id).await?;
    if current < amount {
        tx.rollback().await?;
        return Err(LedgerError::InsufficientFunds);
    }

    let transaction = insert_pending(
        &mut tx,
        TransactionType::Withdrawal,
        Some(account.id),
        None,
        amount,
        &account.currency,
        description,
    )
    .await?;
    append_entry(&mut tx, account.id, transaction.id, EntryType::Debit, amount).await?;
    let transaction = mark_completed(&mut tx, transaction.id).await?;

    tx.commit().await?;

    tracing::info!(transaction_id = %transaction.id, "withdrawal completed");
    Ok(transaction)
}

/// Transfer money between two accounts.
///
/// Both account rows are locked before either balance is read, in ascending
/// id order (see module docs). On success the transaction owns exactly one
/// debit entry against the source and one credit entry against the
/// destination, both for `amount`.
///
/// # Errors
///
/// - `InvalidArgument`: non-positive amount, source equals destination, or
///   the requested currency does not match both accounts
/// - `AccountNotFound` / `AccountClosed`: either account invalid
/// - `InsufficientFunds`: source balance below the requested amount
/// - `LockTimeout` / `Storage`: contention or database failure
#[tracing::instrument(
    skip(pool, description),
    fields(%source_account_id, %destination_account_id, %amount)
)]
pub async fn transfer(
    pool: &DbPool,
    source_account_id: Uuid,
    destination_account_id: Uuid,
    amount: Decimal,
    currency: &str,
    description: Option<String>,
) -> Result<Transaction, LedgerError> {
    validate_amount(amount)?;
    if source_account_id == destination_account_id {
        return Err(LedgerError::InvalidArgument(
            "source and destination accounts must differ".to_string(),
        ));
    }

    let mut tx = begin(pool).await?;

    let (first, second) = lock_order(source_account_id, destination_account_id);
    let first_account = lock_account(&mut tx, first).await?;
    let second_account = lock_account(&mut tx, second).await?;

    let (source, destination) = if first == source_account_id {
        (first_account, second_account)
    } else {
        (second_account, first_account)
    };

    if source.currency != currency || destination.currency != currency {
        tx.rollback().await?;
        return Err(LedgerError::InvalidArgument(format!(
            "currency {currency} does not match both accounts"
        )));
    }

    let current = balance::resolve_balance(&mut tx, source.id).await?;
    if current < amount {
        tx.rollback().await?;
        return Err(LedgerError::InsufficientFunds);
    }

    let transaction = insert_pending(
        &mut tx,
        TransactionType::Transfer,
        Some(source.id),
        Some(destination.id),
        amount,
        currency,
        description,
    )
    .await?;
    append_entry(&mut tx, source.id, transaction.id, EntryType::Debit, amount).await?;
    append_entry(
        &mut tx,
        destination.id,
        transaction.id,
        EntryType::Credit,
        amount,
    )
    .await?;
    let transaction = mark_completed(&mut tx, transaction.id).await?;

    tx.commit().await?;

    tracing::info!(transaction_id = %transaction.id, "transfer completed");
    Ok(transaction)
}

/// Get a transaction by ID.
///
/// # Errors
///
/// - `TransactionNotFound` if the id is unknown
pub async fn get_transaction(
    pool: &DbPool,
    transaction_id: Uuid,
) -> Result<Transaction, LedgerError> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
        .bind(transaction_id)
        .fetch_optional(pool)
        .await?
        .ok_or(LedgerError::TransactionNotFound)
}

/// Reject non-positive amounts before any storage access.
fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidArgument(
            "amount must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Canonical total order for acquiring a pair of account locks.
fn lock_order(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Start the atomic unit for one engine operation.
///
/// `SET LOCAL` scopes the lock-wait bound to this database transaction.
async fn begin(pool: &DbPool) -> Result<PgTransaction<'static, Postgres>, LedgerError> {
    let mut tx = pool.begin().await?;
    sqlx::query(&format!("SET LOCAL lock_timeout = '{LOCK_TIMEOUT}'"))
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Acquire the exclusive row lock for an account and verify it can move
/// money. Blocks until the lock is granted or `lock_timeout` expires.
async fn lock_account(
    conn: &mut PgConnection,
    account_id: Uuid,
) -> Result<Account, LedgerError> {
    let account =
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1 FOR UPDATE")
            .bind(account_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(LedgerError::AccountNotFound)?;

    if !account.is_active() {
        return Err(LedgerError::AccountClosed);
    }

    Ok(account)
}

/// Insert the transaction record for this attempt, status `pending`.
///
/// The row exists before any of its ledger entries do, so an entry can
/// never be observed without its owning transaction.
async fn insert_pending(
    conn: &mut PgConnection,
    transaction_type: TransactionType,
    source_account_id: Option<Uuid>,
    destination_account_id: Option<Uuid>,
    amount: Decimal,
    currency: &str,
    description: Option<String>,
) -> Result<Transaction, LedgerError> {
    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (
            transaction_type,
            source_account_id,
            destination_account_id,
            amount,
            currency,
            status,
            description
        )
        VALUES ($1, $2, $3, $4, $5, 'pending', $6)
        RETURNING *
        "#,
    )
    .bind(transaction_type.as_str())
    .bind(source_account_id)
    .bind(destination_account_id)
    .bind(amount)
    .bind(currency)
    .bind(description)
    .fetch_one(&mut *conn)
    .await?;

    Ok(transaction)
}

/// Append one immutable ledger entry.
async fn append_entry(
    conn: &mut PgConnection,
    account_id: Uuid,
    transaction_id: Uuid,
    entry_type: EntryType,
    amount: Decimal,
) -> Result<(), LedgerError> {
    sqlx::query(
        r#"
        INSERT INTO ledger_entries (account_id, transaction_id, entry_type, amount)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(account_id)
    .bind(transaction_id)
    .bind(entry_type.as_str())
    .bind(amount)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Promote a pending transaction to `completed`, the last write of the unit.
async fn mark_completed(
    conn: &mut PgConnection,
    transaction_id: Uuid,
) -> Result<Transaction, LedgerError> {
    let transaction = sqlx::query_as::<_, Transaction>(
        "UPDATE transactions SET status = 'completed' WHERE id = $1 RETURNING *",
    )
    .bind(transaction_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(transaction)
}
