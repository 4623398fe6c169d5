//! Report data types.

use chrono::{DateTime, NaiveDate, Utc};
use expensa_shared::types::{CategoryId, CostCenterId, SupplierId, VoucherId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::voucher::types::{PaymentMethod, VoucherStatus};

/// Optional inclusive date window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Last day included.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl DateRange {
    /// True if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }
}

/// Spend of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// `YYYY-MM`.
    pub period: String,
    /// Confirmed spend in the month.
    pub total: Decimal,
    /// Confirmed vouchers in the month.
    pub voucher_count: u32,
    /// `total - previous month total`; zero for the first month.
    pub change_from_previous: Decimal,
    /// Change as a percentage of the previous month; zero when that month is zero.
    pub change_percentage: Decimal,
}

/// Month-over-month comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyComparisonReport {
    /// Months in order, gaps filled with zero months.
    pub months: Vec<MonthlyTotal>,
    /// Sum of all months.
    pub grand_total: Decimal,
}

/// Spend of one cost center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenterTotal {
    /// Cost center; `None` buckets vouchers without one.
    pub cost_center_id: Option<CostCenterId>,
    /// Confirmed spend.
    pub total: Decimal,
    /// Confirmed vouchers.
    pub voucher_count: u32,
    /// Share of the grand total.
    pub percentage: Decimal,
}

/// Breakdown by cost center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenterReport {
    /// Rows, largest first.
    pub rows: Vec<CostCenterTotal>,
    /// Sum of all rows.
    pub grand_total: Decimal,
}

/// Spend with one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierTotal {
    /// Supplier; `None` buckets vouchers without one.
    pub supplier_id: Option<SupplierId>,
    /// Confirmed spend.
    pub total: Decimal,
    /// Confirmed vouchers.
    pub voucher_count: u32,
    /// Share of the grand total.
    pub percentage: Decimal,
}

/// Breakdown by supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierReport {
    /// Rows, largest first.
    pub rows: Vec<SupplierTotal>,
    /// Sum of all rows.
    pub grand_total: Decimal,
}

/// One day of the heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// Calendar day.
    pub date: NaiveDate,
    /// ISO week-numbering year.
    pub iso_year: i32,
    /// ISO week number.
    pub iso_week: u32,
    /// Monday = 0 .. Sunday = 6.
    pub day_of_week: u32,
    /// Confirmed spend on the day.
    pub amount: Decimal,
    /// Confirmed vouchers on the day.
    pub voucher_count: u32,
    /// `amount / max amount in window`, within 0..=1.
    pub intensity: Decimal,
}

/// Trailing 90-day spend heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapReport {
    /// First day of the window.
    pub from: NaiveDate,
    /// Last day of the window.
    pub to: NaiveDate,
    /// Largest daily amount in the window.
    pub max_amount: Decimal,
    /// One cell per day, oldest first.
    pub cells: Vec<HeatmapCell>,
}

/// Budget against rolled-up spend for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetComparisonRow {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Depth in the tree, roots at 0.
    pub depth: usize,
    /// Group flag.
    pub is_group: bool,
    /// Rolled-up budget.
    pub budget_amount: Option<Decimal>,
    /// Rolled-up spend.
    pub actual: Decimal,
    /// `budget - actual` when budgeted.
    pub variance: Option<Decimal>,
    /// `actual / budget * 100`.
    pub utilization_percent: Decimal,
    /// Spend exceeds budget.
    pub is_over_budget: bool,
}

/// One voucher line of a category ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLedgerRow {
    /// Voucher ID.
    pub voucher_id: VoucherId,
    /// Voucher number.
    pub voucher_number: String,
    /// Voucher date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Amount.
    pub amount: Decimal,
    /// Sum of this and all earlier rows.
    pub running_total: Decimal,
}

/// Confirmed vouchers of one category with a running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLedgerReport {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Rows in date order.
    pub rows: Vec<CategoryLedgerRow>,
    /// Final running total.
    pub total: Decimal,
}

/// Flattened tree node for exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTreeRow {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Depth in the tree, roots at 0.
    pub depth: usize,
    /// Group flag.
    pub is_group: bool,
    /// Rolled-up spend.
    pub total_spent: Decimal,
    /// Rolled-up budget.
    pub budget_amount: Option<Decimal>,
}

/// Voucher listing row for exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherListRow {
    /// Voucher number.
    pub voucher_number: String,
    /// Voucher date.
    pub date: NaiveDate,
    /// Category code.
    pub category_code: String,
    /// Description.
    pub description: String,
    /// Amount.
    pub amount: Decimal,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Status.
    pub status: VoucherStatus,
    /// Cost center.
    pub cost_center_id: Option<CostCenterId>,
    /// Supplier.
    pub supplier_id: Option<SupplierId>,
}

/// Reports the export collaborator can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Every voucher in the window.
    VouchersList,
    /// Flattened category tree.
    ExpenseTree,
    /// Budget against actual per category.
    BudgetComparison,
    /// Breakdown by cost center.
    CostCenterReport,
    /// Breakdown by supplier.
    SupplierReport,
    /// Month-over-month comparison.
    MonthlyComparison,
    /// One category's ledger.
    CategoryLedger,
}

impl ReportType {
    /// Returns the string representation of the report type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VouchersList => "vouchers_list",
            Self::ExpenseTree => "expense_tree",
            Self::BudgetComparison => "budget_comparison",
            Self::CostCenterReport => "cost_center_report",
            Self::SupplierReport => "supplier_report",
            Self::MonthlyComparison => "monthly_comparison",
            Self::CategoryLedger => "category_ledger",
        }
    }
}

/// Output file format requested from the export collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Spreadsheet.
    Excel,
    /// Printable document.
    Pdf,
    /// Comma separated values.
    Csv,
}

impl ExportFormat {
    /// File extension for the format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Excel => "xlsx",
            Self::Pdf => "pdf",
            Self::Csv => "csv",
        }
    }
}

/// Export request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Which report.
    pub report_type: ReportType,
    /// Output format.
    pub format: ExportFormat,
    /// Window start.
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Window end.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// Row ordering key for voucher listings: `category`, `cost_center`, `supplier` or `month`.
    #[serde(default)]
    pub group_by: Option<String>,
    /// Required for `category_ledger`.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// Rows of an export payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportRows {
    /// Voucher listing.
    Vouchers(Vec<VoucherListRow>),
    /// Tree listing.
    Tree(Vec<ExpenseTreeRow>),
    /// Budget comparison.
    Budget(Vec<BudgetComparisonRow>),
    /// Cost centers.
    CostCenters(Vec<CostCenterTotal>),
    /// Suppliers.
    Suppliers(Vec<SupplierTotal>),
    /// Months.
    Months(Vec<MonthlyTotal>),
    /// Category ledger.
    Ledger(Vec<CategoryLedgerRow>),
}

/// Aggregated data handed to the export collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPayload {
    /// Report type.
    pub report_type: ReportType,
    /// Output format.
    pub format: ExportFormat,
    /// Suggested file name.
    pub file_name: String,
    /// Currency symbol for amount columns.
    pub currency_symbol: String,
    /// When the payload was built.
    pub generated_at: DateTime<Utc>,
    /// Window start.
    pub date_from: Option<NaiveDate>,
    /// Window end.
    pub date_to: Option<NaiveDate>,
    /// Report rows.
    pub rows: ExportRows,
}
