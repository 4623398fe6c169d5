//! Expense category routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use expensa_core::category::{CategoryPatch, NewCategory};
use expensa_shared::types::CategoryId;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, TenantContext, error::ApiResult};

/// Creates the expense category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/expense-categories",
            get(list_categories).post(create_category),
        )
        .route("/expense-categories/tree", get(category_tree))
        .route(
            "/expense-categories/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .route("/expense-categories/{id}/next-due", get(next_due))
}

/// Query for upcoming due dates.
#[derive(Debug, Deserialize)]
pub struct NextDueQuery {
    /// Start date; today when absent.
    pub from: Option<NaiveDate>,
    /// How many dates to return.
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

/// GET `/expense-categories` - Flat list ordered by code.
async fn list_categories(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
) -> ApiResult<impl IntoResponse> {
    let categories = state.categories().list(tenant_id).await?;
    Ok(Json(json!({ "categories": categories })))
}

/// GET `/expense-categories/tree` - Nested tree with rolled-up figures.
async fn category_tree(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
) -> ApiResult<impl IntoResponse> {
    let tree = state.categories().tree(tenant_id).await?;
    Ok(Json(json!({ "tree": tree })))
}

/// GET `/expense-categories/{id}` - One category with its path from the root.
async fn get_category(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<CategoryId>,
) -> ApiResult<impl IntoResponse> {
    let repo = state.categories();
    let category = repo.find(tenant_id, id).await?;
    let path = repo.path(tenant_id, id).await?;
    Ok(Json(json!({ "category": category, "path": path })))
}

/// POST `/expense-categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Json(payload): Json<NewCategory>,
) -> ApiResult<impl IntoResponse> {
    let category = state.categories().create(tenant_id, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PATCH `/expense-categories/{id}` - Partial update.
async fn update_category(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<CategoryId>,
    Json(payload): Json<CategoryPatch>,
) -> ApiResult<impl IntoResponse> {
    let category = state.categories().update(tenant_id, id, payload).await?;
    Ok(Json(category))
}

/// DELETE `/expense-categories/{id}` - Delete an unused leaf.
async fn delete_category(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<CategoryId>,
) -> ApiResult<impl IntoResponse> {
    state.categories().delete(tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/expense-categories/{id}/next-due` - Upcoming due dates of a recurring category.
async fn next_due(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(id): Path<CategoryId>,
    Query(query): Query<NextDueQuery>,
) -> ApiResult<impl IntoResponse> {
    let from = query.from.unwrap_or_else(|| Utc::now().date_naive());
    let dates = state
        .categories()
        .next_due(tenant_id, id, from, query.count)
        .await?;
    Ok(Json(json!({
        "category_id": id,
        "from": from,
        "next_due": dates,
    })))
}
