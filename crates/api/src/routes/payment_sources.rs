//! Vault and bank routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use expensa_core::voucher::NewPaymentSource;
use serde_json::json;

use crate::{AppState, TenantContext, error::ApiResult};

/// Creates the payment source routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/payment-sources",
        get(list_payment_sources).post(create_payment_source),
    )
}

/// GET `/payment-sources` - Vaults and banks by name.
async fn list_payment_sources(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
) -> ApiResult<impl IntoResponse> {
    let sources = state.payment_sources().list(tenant_id).await?;
    Ok(Json(json!({ "payment_sources": sources })))
}

/// POST `/payment-sources` - Register a vault or bank.
async fn create_payment_source(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Json(payload): Json<NewPaymentSource>,
) -> ApiResult<impl IntoResponse> {
    let source = state.payment_sources().create(tenant_id, payload).await?;
    Ok((StatusCode::CREATED, Json(source)))
}
