//! HTTP API layer with Axum routes and extractors.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - The `X-Tenant-Id` tenant extractor
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;

use axum::Router;
use expensa_core::LedgerPolicy;
use expensa_db::{
    AccountRepository, CategoryRepository, PaymentSourceRepository, ReportRepository,
    VoucherRepository,
};
use expensa_shared::LedgerConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use extractors::TenantContext;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Ledger policy and formatting settings.
    pub ledger: Arc<LedgerConfig>,
}

impl AppState {
    /// Creates the state from a connection and the ledger settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, ledger: LedgerConfig) -> Self {
        Self {
            db: Arc::new(db),
            ledger: Arc::new(ledger),
        }
    }

    fn policy(&self) -> LedgerPolicy {
        LedgerPolicy::from(self.ledger.as_ref())
    }

    /// Category repository over the shared pool.
    #[must_use]
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new((*self.db).clone(), self.policy())
    }

    /// Voucher repository over the shared pool.
    #[must_use]
    pub fn vouchers(&self) -> VoucherRepository {
        VoucherRepository::new((*self.db).clone(), self.policy())
    }

    /// Payment source repository over the shared pool.
    #[must_use]
    pub fn payment_sources(&self) -> PaymentSourceRepository {
        PaymentSourceRepository::new((*self.db).clone(), self.policy())
    }

    /// Account repository over the shared pool.
    #[must_use]
    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new((*self.db).clone(), self.policy())
    }

    /// Report repository over the shared pool.
    #[must_use]
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new((*self.db).clone(), self.policy())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
