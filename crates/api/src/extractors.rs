//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use expensa_shared::types::TenantId;

use crate::error::ApiError;

/// Header naming the tenant every ledger route operates on.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Tenant the request operates on, taken from the `X-Tenant-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext(pub TenantId);

impl TenantContext {
    /// Returns the tenant ID.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.0
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(TENANT_HEADER)
            .ok_or(ApiError::MissingTenant)?;

        value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<TenantId>().ok())
            .map(TenantContext)
            .ok_or(ApiError::InvalidTenant)
    }
}
