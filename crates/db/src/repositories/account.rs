//! Chart of accounts repository.

use expensa_core::LedgerPolicy;
use expensa_core::account::{Account, AccountRollup, NewAccount};
use expensa_shared::types::{AccountId, TenantId};
use sea_orm::DatabaseConnection;
use tracing::info;

use super::error::RepositoryError;
use super::store::BookStore;

/// Account persistence and balance queries.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    store: BookStore,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerPolicy) -> Self {
        Self {
            store: BookStore::new(db, policy),
        }
    }

    /// Lists accounts ordered by code.
    pub async fn list(&self, tenant_id: TenantId) -> Result<Vec<Account>, RepositoryError> {
        self.store.read(tenant_id, |book| Ok(book.accounts())).await
    }

    /// Adds an account to the chart.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        input: NewAccount,
    ) -> Result<Account, RepositoryError> {
        let account = self
            .store
            .write(tenant_id, |book| book.register_account(input))
            .await?;

        info!(
            tenant_id = %tenant_id,
            account_id = %account.id,
            code = %account.code,
            "Account created"
        );
        Ok(account)
    }

    /// Balance of an account including its descendants.
    pub async fn balance(
        &self,
        tenant_id: TenantId,
        id: AccountId,
    ) -> Result<AccountRollup, RepositoryError> {
        self.store
            .read(tenant_id, |book| book.account_balance(id))
            .await
    }
}
