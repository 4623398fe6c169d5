//! Read-only report views over the book.

use chrono::NaiveDate;
use expensa_shared::types::CategoryId;

use crate::book::ExpenseBook;
use crate::error::ExpenseError;
use crate::reports::{
    BudgetComparisonRow, CategoryLedgerReport, CostCenterReport, DateRange, ExportPayload,
    ExportRequest, HeatmapReport, MonthlyComparisonReport, ReportService, SupplierReport,
};
use crate::voucher::ExpenseVoucher;

impl ExpenseBook {
    /// Vouchers in number order.
    fn ordered_vouchers(&self) -> Vec<ExpenseVoucher> {
        let mut all: Vec<ExpenseVoucher> = self.vouchers.values().cloned().collect();
        all.sort_by_key(|v| v.sequence);
        all
    }

    /// Month-over-month spend.
    #[must_use]
    pub fn monthly_report(&self, range: DateRange) -> MonthlyComparisonReport {
        ReportService::monthly_comparison(&self.ordered_vouchers(), range)
    }

    /// Spend per cost center.
    #[must_use]
    pub fn cost_center_report(&self, range: DateRange) -> CostCenterReport {
        ReportService::cost_center_report(&self.ordered_vouchers(), range)
    }

    /// Spend per supplier.
    #[must_use]
    pub fn supplier_report(&self, range: DateRange) -> SupplierReport {
        ReportService::supplier_report(&self.ordered_vouchers(), range)
    }

    /// Daily spend over the 90 days ending on `as_of`.
    #[must_use]
    pub fn heatmap(&self, as_of: NaiveDate) -> HeatmapReport {
        ReportService::heatmap(&self.ordered_vouchers(), as_of)
    }

    /// Budget against actual for every category.
    #[must_use]
    pub fn budget_comparison(&self) -> Vec<BudgetComparisonRow> {
        ReportService::budget_comparison(&self.tree)
    }

    /// One category's confirmed vouchers with a running total.
    pub fn category_ledger(
        &self,
        id: CategoryId,
        range: DateRange,
    ) -> Result<CategoryLedgerReport, ExpenseError> {
        ReportService::category_ledger(&self.tree, &self.ordered_vouchers(), id, range)
    }

    /// Aggregated rows for the export collaborator.
    pub fn export(
        &self,
        request: &ExportRequest,
        currency_symbol: &str,
    ) -> Result<ExportPayload, ExpenseError> {
        ReportService::export(request, &self.tree, &self.ordered_vouchers(), currency_symbol)
    }
}
