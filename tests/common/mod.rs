// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use ledger_service::db::{self, DbPool};
use ledger_service::models::account::{Account, AccountType};
use ledger_service::services::{account as account_service, balance};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Connect to the test database and apply migrations.
///
/// Reads `TEST_DATABASE_URL`, falling back to `DATABASE_URL`. Tests that
/// call this are `#[ignore]`d by default; run them with
/// `cargo test -- --ignored` against a disposable PostgreSQL.
pub async fn test_pool() -> Result<DbPool> {
    dotenvy::dotenv().ok();
    let url = std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))?;
    let pool = db::create_pool(&url, 10).await?;
    db::run_migrations(&pool).await?;
    Ok(pool)
}

/// Register a fresh USD checking account. Each test works against its own
/// accounts, so suites can share one database.
pub async fn open_account(pool: &DbPool, owner: &str) -> Result<Account> {
    let account =
        account_service::create_account(pool, owner, AccountType::Checking, "USD").await?;
    Ok(account)
}

/// Resolve an account's balance on a pooled connection.
pub async fn balance_of(pool: &DbPool, account_id: Uuid) -> Result<Decimal> {
    let mut conn = pool.acquire().await?;
    let balance = balance::resolve_balance(&mut conn, account_id).await?;
    Ok(balance)
}

/// Parse a decimal literal for test amounts.
pub fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}
