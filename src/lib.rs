//! Double-entry ledger service.
//!
//! Money movements (deposits, withdrawals, transfers) are recorded as
//! balanced, immutable ledger entries; account balances are derived from
//! that history rather than stored. The crate is organized as:
//!
//! - [`models`] - row types and API request/response types
//! - [`services`] - account registry, balance resolver, ledger engine
//! - [`handlers`] - axum handlers over the services
//! - [`config`] / [`db`] / [`error`] - ambient plumbing

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    Router,
    routing::{get, post},
};
use db::DbPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router over a database pool.
///
/// Shared between the binary and integration tests so both serve the same
/// surface.
pub fn router(pool: DbPool) -> Router {
    Router::new()
        // Public health route
        .route("/health", get(handlers::health::health_check))
        // Account registry routes
        .route("/api/v1/accounts", post(handlers::accounts::create_account))
        .route("/api/v1/accounts", get(handlers::accounts::list_accounts))
        .route(
            "/api/v1/accounts/{id}",
            get(handlers::accounts::get_account),
        )
        .route(
            "/api/v1/accounts/{id}/close",
            post(handlers::accounts::close_account),
        )
        .route(
            "/api/v1/accounts/{id}/ledger",
            get(handlers::accounts::list_ledger_entries),
        )
        // Money-movement routes
        .route(
            "/api/v1/transactions/deposit",
            post(handlers::transactions::create_deposit),
        )
        .route(
            "/api/v1/transactions/withdrawal",
            post(handlers::transactions::create_withdrawal),
        )
        .route(
            "/api/v1/transactions/transfer",
            post(handlers::transactions::create_transfer),
        )
        .route(
            "/api/v1/transactions/{id}",
            get(handlers::transactions::get_transaction),
        )
        // Request tracing for observability
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Share the database pool with all handlers via State extraction
        .with_state(pool)
}
