//! Expense category repository.

use chrono::{NaiveDate, Utc};
use expensa_core::LedgerPolicy;
use expensa_core::book::CategoryNode;
use expensa_core::category::{CategoryPatch, ExpenseCategory, NewCategory};
use expensa_shared::types::{CategoryId, TenantId};
use sea_orm::DatabaseConnection;
use tracing::info;

use super::error::RepositoryError;
use super::store::BookStore;

/// Category tree persistence.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    store: BookStore,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerPolicy) -> Self {
        Self {
            store: BookStore::new(db, policy),
        }
    }

    /// Lists categories ordered by code.
    pub async fn list(&self, tenant_id: TenantId) -> Result<Vec<ExpenseCategory>, RepositoryError> {
        self.store.read(tenant_id, |book| Ok(book.categories())).await
    }

    /// Returns the nested tree with rolled-up figures.
    pub async fn tree(&self, tenant_id: TenantId) -> Result<Vec<CategoryNode>, RepositoryError> {
        self.store.read(tenant_id, |book| Ok(book.category_tree())).await
    }

    /// Finds a category.
    pub async fn find(
        &self,
        tenant_id: TenantId,
        id: CategoryId,
    ) -> Result<ExpenseCategory, RepositoryError> {
        self.store
            .read(tenant_id, |book| book.category(id).cloned())
            .await
    }

    /// Returns the chain from the root down to the category.
    pub async fn path(
        &self,
        tenant_id: TenantId,
        id: CategoryId,
    ) -> Result<Vec<ExpenseCategory>, RepositoryError> {
        self.store
            .read(tenant_id, |book| book.category_path(id))
            .await
    }

    /// Creates a category, allocating its code and linking its account.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        input: NewCategory,
    ) -> Result<ExpenseCategory, RepositoryError> {
        let now = Utc::now();
        let category = self
            .store
            .write(tenant_id, |book| book.create_category(input, now))
            .await?;

        info!(
            tenant_id = %tenant_id,
            category_id = %category.id,
            code = %category.code,
            "Expense category created"
        );
        Ok(category)
    }

    /// Applies a partial update.
    pub async fn update(
        &self,
        tenant_id: TenantId,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<ExpenseCategory, RepositoryError> {
        let now = Utc::now();
        let category = self
            .store
            .write(tenant_id, |book| book.update_category(id, patch, now))
            .await?;

        info!(tenant_id = %tenant_id, category_id = %id, "Expense category updated");
        Ok(category)
    }

    /// Deletes an unused leaf category.
    pub async fn delete(&self, tenant_id: TenantId, id: CategoryId) -> Result<(), RepositoryError> {
        self.store
            .write(tenant_id, |book| book.delete_category(id))
            .await?;

        info!(tenant_id = %tenant_id, category_id = %id, "Expense category deleted");
        Ok(())
    }

    /// Upcoming due dates of a recurring category.
    pub async fn next_due(
        &self,
        tenant_id: TenantId,
        id: CategoryId,
        from: NaiveDate,
        count: usize,
    ) -> Result<Vec<NaiveDate>, RepositoryError> {
        self.store
            .read(tenant_id, |book| book.next_due(id, from, count))
            .await
    }
}
