//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod categories;
pub mod health;
pub mod payment_sources;
pub mod reports;
pub mod vouchers;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(categories::routes())
        .merge(vouchers::routes())
        .merge(payment_sources::routes())
        .merge(accounts::routes())
        .merge(reports::routes())
}
