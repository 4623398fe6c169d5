//! Expense voucher routes.
//!
//! Drafts are created and edited freely; confirm posts them to the ledger
//! and cancel reverses a confirmed posting.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use expensa_core::book::VoucherFilter;
use expensa_core::voucher::{PaymentMethod, VoucherInput, VoucherStatus};
use expensa_shared::types::{
    CategoryId, CostCenterId, PageRequest, SupplierId, VoucherId,
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, TenantContext, error::ApiResult};

/// Creates the expense voucher routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expense-vouchers", get(list_vouchers).post(create_voucher))
        .route(
            "/expense-vouchers/{id}",
            get(get_voucher).put(update_voucher).delete(delete_voucher),
        )
        .route("/expense-vouchers/{id}/preview", get(preview_voucher))
        .route("/expense-vouchers/{id}/confirm", post(confirm_voucher))
        .route("/expense-vouchers/{id}/cancel", post(cancel_voucher))
        .route("/expense-vouchers/{id}/journal", get(voucher_journal))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing vouchers.
#[derive(Debug, Default, Deserialize)]
pub struct ListVouchersQuery {
    /// Status filter.
    pub status: Option<VoucherStatus>,
    /// Category filter.
    pub category_id: Option<CategoryId>,
    /// Payment method filter.
    pub payment_method: Option<PaymentMethod>,
    /// Supplier filter.
    pub supplier_id: Option<SupplierId>,
    /// Cost center filter.
    pub cost_center_id: Option<CostCenterId>,
    /// First day included.
    pub date_from: Option<NaiveDate>,
    /// Last day included.
    pub date_to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl ListVouchersQuery {
    fn split(self) -> (VoucherFilter, PageRequest) {
        let defaults = PageRequest::default();
        let page = PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        };
        let filter = VoucherFilter {
            status: self.status,
            category_id: self.category_id,
            payment_method: self.payment_method,
            supplier_id: self.supplier_id,
            cost_center_id: self.cost_center_id,
            date_from: self.date_from,
            date_to: self.date_to,
        };
        (filter, page)
    }
}

/// Request body for cancelling a voucher.
#[derive(Debug, Default, Deserialize)]
pub struct CancelVoucherRequest {
    /// Why the voucher is cancelled.
    #[serde(default)]
    pub reason: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/expense-vouchers` - Filtered, paginated list, newest first.
async fn list_vouchers(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Query(query): Query<ListVouchersQuery>,
) -> ApiResult<impl IntoResponse> {
    let (filter, page) = query.split();
    let vouchers = state.vouchers().list(tenant_id, filter, page).await?;
    Ok(Json(vouchers))
}

/// GET `/expense-vouchers/{id}` - One voucher.
async fn get_voucher(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<VoucherId>,
) -> ApiResult<impl IntoResponse> {
    let voucher = state.vouchers().find(tenant_id, id).await?;
    Ok(Json(voucher))
}

/// POST `/expense-vouchers` - Create a draft.
async fn create_voucher(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Json(payload): Json<VoucherInput>,
) -> ApiResult<impl IntoResponse> {
    let draft = state.vouchers().create(tenant_id, payload).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// PUT `/expense-vouchers/{id}` - Replace the fields of a draft.
async fn update_voucher(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<VoucherId>,
    Json(payload): Json<VoucherInput>,
) -> ApiResult<impl IntoResponse> {
    let draft = state.vouchers().update(tenant_id, id, payload).await?;
    Ok(Json(draft))
}

/// DELETE `/expense-vouchers/{id}` - Delete a draft.
async fn delete_voucher(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<VoucherId>,
) -> ApiResult<impl IntoResponse> {
    state.vouchers().delete(tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/expense-vouchers/{id}/preview` - Journal and balances a confirm would write.
async fn preview_voucher(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<VoucherId>,
) -> ApiResult<impl IntoResponse> {
    let posting = state.vouchers().preview(tenant_id, id).await?;
    Ok(Json(posting))
}

/// POST `/expense-vouchers/{id}/confirm` - Post a draft to the ledger.
async fn confirm_voucher(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<VoucherId>,
) -> ApiResult<impl IntoResponse> {
    let posted = state.vouchers().confirm(tenant_id, id).await?;
    Ok(Json(posted))
}

/// POST `/expense-vouchers/{id}/cancel` - Reverse a confirmed voucher.
async fn cancel_voucher(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<VoucherId>,
    payload: Option<Json<CancelVoucherRequest>>,
) -> ApiResult<impl IntoResponse> {
    let reason = payload.and_then(|Json(body)| body.reason);
    let posted = state.vouchers().cancel(tenant_id, id, reason).await?;
    Ok(Json(posted))
}

/// GET `/expense-vouchers/{id}/journal` - Posting and reversal entries.
async fn voucher_journal(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<VoucherId>,
) -> ApiResult<impl IntoResponse> {
    let entries = state.vouchers().journal(tenant_id, id).await?;
    Ok(Json(json!({ "voucher_id": id, "entries": entries })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults_to_first_page() {
        let (filter, page) = ListVouchersQuery::default().split();
        assert!(filter.status.is_none());
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 20);
    }

    #[test]
    fn test_list_query_carries_filters() {
        let query = ListVouchersQuery {
            status: Some(VoucherStatus::Confirmed),
            payment_method: Some(PaymentMethod::Check),
            page: Some(3),
            ..ListVouchersQuery::default()
        };
        let (filter, page) = query.split();
        assert_eq!(filter.status, Some(VoucherStatus::Confirmed));
        assert_eq!(filter.payment_method, Some(PaymentMethod::Check));
        assert_eq!(page.page, 3);
    }
}
