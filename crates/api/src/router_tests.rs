use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use expensa_core::ExpenseError;
use expensa_core::voucher::{VoucherAction, VoucherStatus};
use expensa_db::RepositoryError;
use http_body_util::BodyExt;
use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

use crate::error::ApiError;
use expensa_shared::types::{PaymentSourceId, VoucherId};

/// Router over a pool that was never connected; any route reaching the
/// database fails with a database error.
fn app() -> Router {
    create_router(AppState::new(
        DatabaseConnection::Disconnected,
        LedgerConfig::default(),
    ))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(
        Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[rstest]
#[case("/api/v1/expense-categories")]
#[case("/api/v1/expense-vouchers")]
#[case("/api/v1/payment-sources")]
#[case("/api/v1/reports/monthly")]
#[tokio::test]
async fn test_tenant_header_is_required(#[case] uri: &str) {
    let (status, body) = send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_TENANT");
    assert_eq!(body["field"], "X-Tenant-Id");
}

#[tokio::test]
async fn test_malformed_tenant_header() {
    let (status, body) = send(
        Request::builder()
            .uri("/api/v1/expense-categories/tree")
            .header("X-Tenant-Id", "acme")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_TENANT");
}

#[tokio::test]
async fn test_database_failure_hides_details() {
    let (status, body) = send(
        Request::builder()
            .uri("/api/v1/expense-categories")
            .header("X-Tenant-Id", "0190e2c4-7d1e-7a3c-9e4b-1f2a3b4c5d6e")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "DATABASE_ERROR");
    assert_eq!(body["message"], "An internal error occurred");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = send(
        Request::builder()
            .uri("/api/v1/ledgers")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn test_validation_error_carries_field() {
    let err = ApiError::from(ExpenseError::validation("amount", "must be positive"));
    let body = err.body();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "VALIDATION_ERROR");
    assert_eq!(body.field, Some("amount"));
    assert!(body.message.contains("must be positive"));
}

#[rstest]
#[case(
    ExpenseError::InvalidTransition { from: VoucherStatus::Cancelled, action: VoucherAction::Confirm },
    StatusCode::CONFLICT,
    "INVALID_TRANSITION"
)]
#[case(
    ExpenseError::InsufficientFunds {
        source_id: PaymentSourceId::new(),
        available: dec!(10),
        required: dec!(25),
    },
    StatusCode::UNPROCESSABLE_ENTITY,
    "INSUFFICIENT_FUNDS"
)]
#[case(
    ExpenseError::VoucherNotFound(VoucherId::new()),
    StatusCode::NOT_FOUND,
    "VOUCHER_NOT_FOUND"
)]
fn test_domain_error_mapping(
    #[case] err: ExpenseError,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let api = ApiError::from(err);
    assert_eq!(api.status(), status);
    assert_eq!(api.body().error, code);
}

#[test]
fn test_conflict_maps_to_409() {
    let api = ApiError::from(RepositoryError::Conflict(VoucherId::new()));
    assert_eq!(api.status(), StatusCode::CONFLICT);
    assert_eq!(api.body().error, "CONCURRENT_MODIFICATION");
}

#[tokio::test]
async fn test_readiness_reports_unavailable_database() {
    let (status, body) = send(
        Request::builder()
            .uri("/api/v1/health/ready")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}
