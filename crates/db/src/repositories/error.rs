//! Repository error type.

use expensa_core::ExpenseError;
use expensa_shared::types::VoucherId;
use sea_orm::DbErr;

/// Errors raised while loading or persisting a tenant's book.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The ledger rejected the operation.
    #[error(transparent)]
    Domain(#[from] ExpenseError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The voucher row changed underneath this write.
    #[error("Voucher {0} was modified concurrently")]
    Conflict(VoucherId),

    /// A stored row cannot be represented in the domain.
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => e.http_status_code(),
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::InvalidData(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.error_code(),
            Self::Conflict(_) => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::InvalidData(_) => "INVALID_STORED_DATA",
        }
    }
}
