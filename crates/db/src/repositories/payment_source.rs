//! Vault and bank repository.

use expensa_core::LedgerPolicy;
use expensa_core::voucher::{NewPaymentSource, PaymentSource};
use expensa_shared::types::TenantId;
use sea_orm::DatabaseConnection;
use tracing::info;

use super::error::RepositoryError;
use super::store::BookStore;

/// Payment source persistence.
#[derive(Debug, Clone)]
pub struct PaymentSourceRepository {
    store: BookStore,
}

impl PaymentSourceRepository {
    /// Creates a new payment source repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerPolicy) -> Self {
        Self {
            store: BookStore::new(db, policy),
        }
    }

    /// Lists vaults and banks by name.
    pub async fn list(&self, tenant_id: TenantId) -> Result<Vec<PaymentSource>, RepositoryError> {
        self.store
            .read(tenant_id, |book| Ok(book.payment_sources()))
            .await
    }

    /// Registers a vault or bank with its asset account.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        input: NewPaymentSource,
    ) -> Result<PaymentSource, RepositoryError> {
        let source = self
            .store
            .write(tenant_id, |book| book.register_payment_source(input))
            .await?;

        info!(
            tenant_id = %tenant_id,
            source_id = %source.id,
            kind = %source.kind,
            "Payment source registered"
        );
        Ok(source)
    }
}
