//! Budget rollups, variance and overrun checks.

use std::collections::HashMap;

use expensa_shared::types::CategoryId;
use rust_decimal::Decimal;

use crate::budget::types::{BudgetOverrun, CategoryRollup, VarianceResult, VarianceStatus};
use crate::category::{CategoryTree, ExpenseCategory};

/// Stateless budget aggregator.
pub struct BudgetAggregator;

impl BudgetAggregator {
    /// Calculate expense variance between budgeted and actual amounts.
    ///
    /// Variance is `budgeted - actual`; positive is favorable. Percentages are
    /// rounded to two places and are zero when nothing was budgeted.
    #[must_use]
    pub fn calculate_variance(budgeted: Decimal, actual: Decimal) -> VarianceResult {
        let variance = budgeted - actual;

        let status = match variance.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => VarianceStatus::Favorable,
            std::cmp::Ordering::Less => VarianceStatus::Unfavorable,
            std::cmp::Ordering::Equal => VarianceStatus::OnBudget,
        };

        let variance_percent = if budgeted.is_zero() {
            Decimal::ZERO
        } else {
            (variance / budgeted * Decimal::ONE_HUNDRED).round_dp(2)
        };

        VarianceResult {
            budgeted,
            actual,
            variance,
            variance_percent,
            utilization_percent: Self::utilization(budgeted, actual),
            status,
        }
    }

    /// `actual / budgeted * 100`, rounded to two places; zero for a zero budget.
    #[must_use]
    pub fn utilization(budgeted: Decimal, actual: Decimal) -> Decimal {
        if budgeted.is_zero() {
            Decimal::ZERO
        } else {
            (actual / budgeted * Decimal::ONE_HUNDRED).round_dp(2)
        }
    }

    /// Rolls spend and budgets up from the leaves to every ancestor.
    #[must_use]
    pub fn rollup(tree: &CategoryTree) -> HashMap<CategoryId, CategoryRollup> {
        let mut out: HashMap<CategoryId, CategoryRollup> = HashMap::with_capacity(tree.len());

        for id in tree.post_order() {
            let Some(category) = tree.get(id) else {
                continue;
            };
            let mut total_spent = category.total_spent;
            let mut budget = if category.is_group {
                None
            } else {
                category.budget_amount
            };

            for child in tree.children(id) {
                if let Some(child_rollup) = out.get(child) {
                    total_spent += child_rollup.total_spent;
                    if let Some(child_budget) = child_rollup.budget_amount {
                        budget = Some(budget.unwrap_or(Decimal::ZERO) + child_budget);
                    }
                }
            }

            let variance = budget.map(|b| Self::calculate_variance(b, total_spent));
            out.insert(
                id,
                CategoryRollup {
                    category_id: id,
                    total_spent,
                    budget_amount: budget,
                    is_over_budget: budget.is_some_and(|b| total_spent > b),
                    variance,
                },
            );
        }

        out
    }

    /// Advisory check for spending `amount` more on `category`.
    #[must_use]
    pub fn check_overrun(category: &ExpenseCategory, amount: Decimal) -> Option<BudgetOverrun> {
        let budget_amount = category.budget_amount?;
        let projected_total = category.total_spent + amount;
        (projected_total > budget_amount).then(|| BudgetOverrun {
            category_id: category.id,
            category_code: category.code.clone(),
            budget_amount,
            total_spent: category.total_spent,
            amount,
            projected_total,
            overage: projected_total - budget_amount,
        })
    }
}
