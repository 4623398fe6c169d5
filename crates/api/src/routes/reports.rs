//! Expense report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use expensa_core::reports::{DateRange, ExportRequest};
use expensa_shared::types::CategoryId;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, TenantContext, error::ApiResult};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/monthly", get(monthly_report))
        .route("/reports/cost-centers", get(cost_center_report))
        .route("/reports/suppliers", get(supplier_report))
        .route("/reports/heatmap", get(heatmap_report))
        .route("/reports/budget-comparison", get(budget_comparison))
        .route("/reports/category-ledger/{id}", get(category_ledger))
        .route("/reports/export", post(export_report))
}

/// Query for the heatmap.
#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    /// Last day of the window; today when absent.
    pub as_of: Option<NaiveDate>,
}

/// GET `/reports/monthly` - Month-over-month comparison.
async fn monthly_report(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Query(range): Query<DateRange>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.reports().monthly(tenant_id, range).await?))
}

/// GET `/reports/cost-centers` - Breakdown by cost center.
async fn cost_center_report(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Query(range): Query<DateRange>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.reports().cost_centers(tenant_id, range).await?))
}

/// GET `/reports/suppliers` - Breakdown by supplier.
async fn supplier_report(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Query(range): Query<DateRange>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.reports().suppliers(tenant_id, range).await?))
}

/// GET `/reports/heatmap` - Trailing daily spend.
async fn heatmap_report(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Query(query): Query<HeatmapQuery>,
) -> ApiResult<impl IntoResponse> {
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(state.reports().heatmap(tenant_id, as_of).await?))
}

/// GET `/reports/budget-comparison` - Budget against actual per category.
async fn budget_comparison(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
) -> ApiResult<impl IntoResponse> {
    let rows = state.reports().budget_comparison(tenant_id).await?;
    Ok(Json(json!({ "rows": rows })))
}

/// GET `/reports/category-ledger/{id}` - One category's confirmed vouchers.
async fn category_ledger(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<CategoryId>,
    Query(range): Query<DateRange>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state.reports().category_ledger(tenant_id, id, range).await?,
    ))
}

/// POST `/reports/export` - Aggregated rows for the export collaborator.
async fn export_report(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Json(request): Json<ExportRequest>,
) -> ApiResult<impl IntoResponse> {
    let symbol = state.ledger.currency_symbol.clone();
    let payload = state.reports().export(tenant_id, request, symbol).await?;
    Ok(Json(payload))
}
