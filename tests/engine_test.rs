//! Ledger engine integration tests.
//!
//! These exercise the service layer against a real PostgreSQL and are
//! `#[ignore]`d by default; run with `cargo test -- --ignored` and a
//! `TEST_DATABASE_URL`/`DATABASE_URL` pointing at a disposable database.

mod common;

use anyhow::Result;
use common::{balance_of, dec, open_account, test_pool};
use ledger_service::error::LedgerError;
use ledger_service::models::ledger_entry::LedgerEntry;
use ledger_service::services::{account as account_service, ledger};
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn deposit_transfer_withdraw_scenario() -> Result<()> {
    let pool = test_pool().await?;

    // Create account A (balance 0); deposit 100.
    let a = open_account(&pool, "scenario-a").await?;
    assert_eq!(balance_of(&pool, a.id).await?, dec("0"));

    ledger::deposit(&pool, a.id, dec("100.00"), Some("seed".into())).await?;
    assert_eq!(balance_of(&pool, a.id).await?, dec("100.00"));

    // Create account B; transfer 40 from A to B.
    let b = open_account(&pool, "scenario-b").await?;
    let transfer = ledger::transfer(&pool, a.id, b.id, dec("40.00"), "USD", None).await?;

    assert_eq!(balance_of(&pool, a.id).await?, dec("60.00"));
    assert_eq!(balance_of(&pool, b.id).await?, dec("40.00"));
    assert_eq!(transfer.status, "completed");

    // The transfer owns exactly one debit(A, 40) and one credit(B, 40).
    let entries: Vec<LedgerEntry> =
        sqlx::query_as("SELECT * FROM ledger_entries WHERE transaction_id = $1")
            .bind(transfer.id)
            .fetch_all(&pool)
            .await?;
    assert_eq!(entries.len(), 2);
    let debit = entries.iter().find(|e| e.entry_type == "debit").unwrap();
    let credit = entries.iter().find(|e| e.entry_type == "credit").unwrap();
    assert_eq!(debit.account_id, a.id);
    assert_eq!(credit.account_id, b.id);
    assert_eq!(debit.amount, credit.amount);

    // Withdraw 100 from A: fails, balance unchanged.
    let result = ledger::withdraw(&pool, a.id, dec("100.00"), None).await;
    assert!(matches!(result, Err(LedgerError::InsufficientFunds)));
    assert_eq!(balance_of(&pool, a.id).await?, dec("60.00"));

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn balance_equals_signed_entry_sum() -> Result<()> {
    let pool = test_pool().await?;
    let a = open_account(&pool, "fold-a").await?;
    let b = open_account(&pool, "fold-b").await?;

    ledger::deposit(&pool, a.id, dec("250.00"), None).await?;
    ledger::withdraw(&pool, a.id, dec("30.00"), None).await?;
    ledger::transfer(&pool, a.id, b.id, dec("70.00"), "USD", None).await?;
    ledger::deposit(&pool, b.id, dec("5.50"), None).await?;

    for account_id in [a.id, b.id] {
        let entries = account_service::list_ledger_entries(&pool, account_id).await?;
        let folded: rust_decimal::Decimal = entries.iter().map(|e| e.signed_amount()).sum();
        assert_eq!(balance_of(&pool, account_id).await?, folded);
    }

    assert_eq!(balance_of(&pool, a.id).await?, dec("150.00"));
    assert_eq!(balance_of(&pool, b.id).await?, dec("75.50"));

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn failed_withdrawal_leaves_no_trace() -> Result<()> {
    let pool = test_pool().await?;
    let a = open_account(&pool, "no-trace").await?;
    ledger::deposit(&pool, a.id, dec("10.00"), None).await?;

    let before = account_service::list_ledger_entries(&pool, a.id).await?;

    let result = ledger::withdraw(&pool, a.id, dec("11.00"), None).await;
    assert!(matches!(result, Err(LedgerError::InsufficientFunds)));

    // No new entries and no leftover transaction row for the attempt.
    let after = account_service::list_ledger_entries(&pool, a.id).await?;
    assert_eq!(before.len(), after.len());
    assert_eq!(balance_of(&pool, a.id).await?, dec("10.00"));

    let attempts: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM transactions WHERE source_account_id = $1 AND status <> 'completed'",
    )
    .bind(a.id)
    .fetch_one(&pool)
    .await?;
    assert_eq!(attempts, 0);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn resolve_balance_is_idempotent_between_writes() -> Result<()> {
    let pool = test_pool().await?;
    let a = open_account(&pool, "idempotent").await?;
    ledger::deposit(&pool, a.id, dec("42.42"), None).await?;

    let first = balance_of(&pool, a.id).await?;
    let second = balance_of(&pool, a.id).await?;
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn non_positive_amounts_are_rejected_without_writes() -> Result<()> {
    let pool = test_pool().await?;
    let a = open_account(&pool, "validation").await?;

    for amount in [dec("0"), dec("-5.00")] {
        assert!(matches!(
            ledger::deposit(&pool, a.id, amount, None).await,
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            ledger::withdraw(&pool, a.id, amount, None).await,
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    assert!(account_service::list_ledger_entries(&pool, a.id)
        .await?
        .is_empty());

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn self_transfer_and_currency_mismatch_are_rejected() -> Result<()> {
    let pool = test_pool().await?;
    let a = open_account(&pool, "rules-a").await?;
    let b = open_account(&pool, "rules-b").await?;
    ledger::deposit(&pool, a.id, dec("50.00"), None).await?;

    assert!(matches!(
        ledger::transfer(&pool, a.id, a.id, dec("1.00"), "USD", None).await,
        Err(LedgerError::InvalidArgument(_))
    ));
    assert!(matches!(
        ledger::transfer(&pool, a.id, b.id, dec("1.00"), "EUR", None).await,
        Err(LedgerError::InvalidArgument(_))
    ));

    // Neither rejection moved money.
    assert_eq!(balance_of(&pool, a.id).await?, dec("50.00"));
    assert_eq!(balance_of(&pool, b.id).await?, dec("0"));

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn unknown_accounts_yield_not_found() -> Result<()> {
    let pool = test_pool().await?;
    let ghost = Uuid::new_v4();

    assert!(matches!(
        ledger::deposit(&pool, ghost, dec("1.00"), None).await,
        Err(LedgerError::AccountNotFound)
    ));
    assert!(matches!(
        balance_of(&pool, ghost)
            .await
            .unwrap_err()
            .downcast::<LedgerError>()?,
        LedgerError::AccountNotFound
    ));
    assert!(matches!(
        ledger::get_transaction(&pool, ghost).await,
        Err(LedgerError::TransactionNotFound)
    ));

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn closed_accounts_reject_money_movement() -> Result<()> {
    let pool = test_pool().await?;
    let a = open_account(&pool, "closing-a").await?;
    let b = open_account(&pool, "closing-b").await?;
    ledger::deposit(&pool, a.id, dec("20.00"), None).await?;

    let closed = account_service::close_account(&pool, a.id).await?;
    assert_eq!(closed.status, "closed");

    assert!(matches!(
        ledger::deposit(&pool, a.id, dec("1.00"), None).await,
        Err(LedgerError::AccountClosed)
    ));
    assert!(matches!(
        ledger::withdraw(&pool, a.id, dec("1.00"), None).await,
        Err(LedgerError::AccountClosed)
    ));
    assert!(matches!(
        ledger::transfer(&pool, b.id, a.id, dec("1.00"), "USD", None).await,
        Err(LedgerError::AccountClosed)
    ));

    // Closing twice is a conflict; history stays readable.
    assert!(matches!(
        account_service::close_account(&pool, a.id).await,
        Err(LedgerError::AccountClosed)
    ));
    assert_eq!(balance_of(&pool, a.id).await?, dec("20.00"));

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn ledger_entries_are_listed_in_creation_order() -> Result<()> {
    let pool = test_pool().await?;
    let a = open_account(&pool, "ordering").await?;

    ledger::deposit(&pool, a.id, dec("1.00"), None).await?;
    ledger::deposit(&pool, a.id, dec("2.00"), None).await?;
    ledger::withdraw(&pool, a.id, dec("0.50"), None).await?;

    let entries = account_service::list_ledger_entries(&pool, a.id).await?;
    assert_eq!(entries.len(), 3);
    assert!(entries.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    assert_eq!(entries[0].amount, dec("1.00"));
    assert_eq!(entries[2].entry_type, "debit");

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn account_lookup_includes_derived_balance() -> Result<()> {
    let pool = test_pool().await?;
    let a = open_account(&pool, "lookup").await?;
    ledger::deposit(&pool, a.id, dec("12.34"), None).await?;

    let (account, balance) = account_service::get_account_with_balance(&pool, a.id).await?;
    assert_eq!(account.id, a.id);
    assert_eq!(balance, dec("12.34"));

    Ok(())
}
