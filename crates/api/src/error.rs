//! JSON error responses.
//!
//! Every failure renders as `{"error": CODE, "message": text, "field"?: name}`.
//! Database and internal failures are logged and their details withheld.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use expensa_core::ExpenseError;
use expensa_db::RepositoryError;
use serde::Serialize;
use tracing::error;

/// Errors returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Ledger or persistence failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The `X-Tenant-Id` header is absent.
    #[error("X-Tenant-Id header is required")]
    MissingTenant,

    /// The `X-Tenant-Id` header is not a UUID.
    #[error("X-Tenant-Id header must be a UUID")]
    InvalidTenant,
}

impl From<ExpenseError> for ApiError {
    fn from(e: ExpenseError) -> Self {
        Self::Repository(RepositoryError::Domain(e))
    }
}

/// Body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine readable code.
    pub error: &'static str,
    /// Human readable message.
    pub message: String,
    /// Offending field for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Repository(e) => StatusCode::from_u16(e.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::MissingTenant | Self::InvalidTenant => StatusCode::BAD_REQUEST,
        }
    }

    /// Builds the response body.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::Repository(e) if self.status().is_server_error() => ErrorBody {
                error: e.error_code(),
                message: "An internal error occurred".to_string(),
                field: None,
            },
            Self::Repository(e) => ErrorBody {
                error: e.error_code(),
                message: e.to_string(),
                field: match e {
                    RepositoryError::Domain(domain) => domain.field(),
                    _ => None,
                },
            },
            Self::MissingTenant => ErrorBody {
                error: "MISSING_TENANT",
                message: self.to_string(),
                field: Some("X-Tenant-Id"),
            },
            Self::InvalidTenant => ErrorBody {
                error: "INVALID_TENANT",
                message: self.to_string(),
                field: Some("X-Tenant-Id"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;
