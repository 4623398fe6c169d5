//! Expense report repository.
//!
//! Every report is computed from one consistent snapshot of the book.

use chrono::NaiveDate;
use expensa_core::LedgerPolicy;
use expensa_core::reports::{
    BudgetComparisonRow, CategoryLedgerReport, CostCenterReport, DateRange, ExportPayload,
    ExportRequest, HeatmapReport, MonthlyComparisonReport, SupplierReport,
};
use expensa_shared::types::{CategoryId, TenantId};
use sea_orm::DatabaseConnection;

use super::error::RepositoryError;
use super::store::BookStore;

/// Read-only report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    store: BookStore,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerPolicy) -> Self {
        Self {
            store: BookStore::new(db, policy),
        }
    }

    /// Month-over-month comparison.
    pub async fn monthly(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<MonthlyComparisonReport, RepositoryError> {
        self.store
            .read(tenant_id, |book| Ok(book.monthly_report(range)))
            .await
    }

    /// Breakdown by cost center.
    pub async fn cost_centers(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<CostCenterReport, RepositoryError> {
        self.store
            .read(tenant_id, |book| Ok(book.cost_center_report(range)))
            .await
    }

    /// Breakdown by supplier.
    pub async fn suppliers(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<SupplierReport, RepositoryError> {
        self.store
            .read(tenant_id, |book| Ok(book.supplier_report(range)))
            .await
    }

    /// Trailing heatmap ending at `as_of`.
    pub async fn heatmap(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<HeatmapReport, RepositoryError> {
        self.store
            .read(tenant_id, |book| Ok(book.heatmap(as_of)))
            .await
    }

    /// Budget against actual for every category.
    pub async fn budget_comparison(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<BudgetComparisonRow>, RepositoryError> {
        self.store
            .read(tenant_id, |book| Ok(book.budget_comparison()))
            .await
    }

    /// Confirmed vouchers of one category with a running total.
    pub async fn category_ledger(
        &self,
        tenant_id: TenantId,
        id: CategoryId,
        range: DateRange,
    ) -> Result<CategoryLedgerReport, RepositoryError> {
        self.store
            .read(tenant_id, |book| book.category_ledger(id, range))
            .await
    }

    /// Aggregates the rows of an export.
    pub async fn export(
        &self,
        tenant_id: TenantId,
        request: ExportRequest,
        currency_symbol: String,
    ) -> Result<ExportPayload, RepositoryError> {
        self.store
            .read(tenant_id, |book| book.export(&request, &currency_symbol))
            .await
    }
}
