//! Budget aggregation types.

use expensa_shared::types::CategoryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Variance calculation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceResult {
    /// Budgeted amount.
    pub budgeted: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// Variance amount (budgeted - actual).
    pub variance: Decimal,
    /// Variance percentage.
    pub variance_percent: Decimal,
    /// Utilization percentage.
    pub utilization_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Spent less than budgeted.
    Favorable,
    /// Spent more than budgeted.
    Unfavorable,
    /// Spent exactly the budget.
    OnBudget,
}

/// Rolled-up figures for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRollup {
    /// Category ID.
    pub category_id: CategoryId,
    /// Direct spend plus the spend of every descendant.
    pub total_spent: Decimal,
    /// Own budget for leaves, sum of descendant budgets for groups.
    /// `None` when nothing in the subtree is budgeted.
    pub budget_amount: Option<Decimal>,
    /// Variance against `budget_amount`.
    pub variance: Option<VarianceResult>,
    /// True when `total_spent` exceeds `budget_amount`.
    pub is_over_budget: bool,
}

/// Advisory raised when a voucher would push a category past its budget.
///
/// Never blocks the operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetOverrun {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category code.
    pub category_code: String,
    /// Ceiling.
    pub budget_amount: Decimal,
    /// Spend before the voucher.
    pub total_spent: Decimal,
    /// Voucher amount.
    pub amount: Decimal,
    /// `total_spent + amount`.
    pub projected_total: Decimal,
    /// `projected_total - budget_amount`.
    pub overage: Decimal,
}
