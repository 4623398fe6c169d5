//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use expensa_core::account::NewAccount;
use expensa_shared::types::AccountId;
use serde_json::json;

use crate::{AppState, TenantContext, error::ApiResult};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{id}/balance", get(account_balance))
}

/// GET `/accounts` - Accounts ordered by code.
async fn list_accounts(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
) -> ApiResult<impl IntoResponse> {
    let accounts = state.accounts().list(tenant_id).await?;
    Ok(Json(json!({ "accounts": accounts })))
}

/// POST `/accounts` - Add an account to the chart.
async fn create_account(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Json(payload): Json<NewAccount>,
) -> ApiResult<impl IntoResponse> {
    let account = state.accounts().create(tenant_id, payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET `/accounts/{id}/balance` - Balance rolled up over descendants.
async fn account_balance(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<AccountId>,
) -> ApiResult<impl IntoResponse> {
    let rollup = state.accounts().balance(tenant_id, id).await?;
    Ok(Json(rollup))
}
