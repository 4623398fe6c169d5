//! Unit and property-based tests for the budget module.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::BudgetAggregator;
use super::types::VarianceStatus;
use crate::category::CategoryTree;
use crate::test_support::category;

#[test]
fn test_overrun_overage() {
    let mut fuel = category("5101", None);
    fuel.budget_amount = Some(dec!(1000));
    fuel.total_spent = dec!(900);

    let overrun = BudgetAggregator::check_overrun(&fuel, dec!(200)).unwrap();
    assert_eq!(overrun.projected_total, dec!(1100));
    assert_eq!(overrun.overage, dec!(100));
}

#[test]
fn test_no_overrun_at_exact_budget() {
    let mut fuel = category("5101", None);
    fuel.budget_amount = Some(dec!(1000));
    fuel.total_spent = dec!(800);
    assert!(BudgetAggregator::check_overrun(&fuel, dec!(200)).is_none());
}

#[test]
fn test_no_overrun_without_budget() {
    let mut fuel = category("5101", None);
    fuel.total_spent = dec!(1_000_000);
    assert!(BudgetAggregator::check_overrun(&fuel, dec!(1)).is_none());
}

#[test]
fn test_rollup_sums_children() {
    let root = category("51", None);
    let mut rent = category("5101", Some(root.id));
    rent.total_spent = dec!(500);
    rent.budget_amount = Some(dec!(400));
    let mut power = category("5102", Some(root.id));
    power.total_spent = dec!(120);
    power.budget_amount = Some(dec!(300));
    let mut misc = category("5103", Some(root.id));
    misc.total_spent = dec!(30);

    let tree = CategoryTree::from_categories(vec![root.clone(), rent.clone(), power, misc]).unwrap();
    let rollup = BudgetAggregator::rollup(&tree);

    let top = &rollup[&root.id];
    assert_eq!(top.total_spent, dec!(650));
    assert_eq!(top.budget_amount, Some(dec!(700)));
    assert!(!top.is_over_budget);

    let rent_rollup = &rollup[&rent.id];
    assert!(rent_rollup.is_over_budget);
    let variance = rent_rollup.variance.as_ref().unwrap();
    assert_eq!(variance.variance, dec!(-100));
    assert_eq!(variance.utilization_percent, dec!(125));
    assert_eq!(variance.status, VarianceStatus::Unfavorable);
}

#[test]
fn test_rollup_unbudgeted_subtree() {
    let root = category("51", None);
    let mut leaf = category("5101", Some(root.id));
    leaf.total_spent = dec!(10);
    let tree = CategoryTree::from_categories(vec![root.clone(), leaf]).unwrap();
    let rollup = BudgetAggregator::rollup(&tree);
    assert_eq!(rollup[&root.id].budget_amount, None);
    assert!(rollup[&root.id].variance.is_none());
}

#[test]
fn test_variance_zero_budget() {
    let result = BudgetAggregator::calculate_variance(Decimal::ZERO, dec!(50));
    assert_eq!(result.variance_percent, Decimal::ZERO);
    assert_eq!(result.utilization_percent, Decimal::ZERO);
    assert_eq!(result.status, VarianceStatus::Unfavorable);
}

proptest! {
    /// variance = budgeted - actual, favorable if positive
    #[test]
    fn prop_variance_sign(
        budgeted in 0i64..1_000_000_000,
        actual in 0i64..1_000_000_000,
    ) {
        let budgeted = Decimal::from(budgeted);
        let actual = Decimal::from(actual);
        let result = BudgetAggregator::calculate_variance(budgeted, actual);

        prop_assert_eq!(result.variance, budgeted - actual);
        if result.variance > Decimal::ZERO {
            prop_assert_eq!(result.status, VarianceStatus::Favorable);
        } else if result.variance < Decimal::ZERO {
            prop_assert_eq!(result.status, VarianceStatus::Unfavorable);
        } else {
            prop_assert_eq!(result.status, VarianceStatus::OnBudget);
        }
    }

    /// A group's rolled-up spend equals the sum of its children's rolled-up spend.
    #[test]
    fn prop_group_total_is_sum_of_children(
        spends in prop::collection::vec(0i64..1_000_000, 1..15),
        split in 0usize..15,
    ) {
        let root = category("51", None);
        let mid = category("5101", Some(root.id));
        let mut rows = vec![root.clone(), mid.clone()];
        for (i, cents) in spends.iter().enumerate() {
            let parent = if i < split { mid.id } else { root.id };
            let mut leaf = category(&format!("5{:03}", 200 + i), Some(parent));
            leaf.total_spent = Decimal::new(*cents, 2);
            rows.push(leaf);
        }
        let tree = CategoryTree::from_categories(rows).unwrap();
        let rollup = BudgetAggregator::rollup(&tree);

        for node in tree.iter().filter(|c| c.is_group) {
            let children_sum: Decimal = tree
                .children(node.id)
                .iter()
                .map(|c| rollup[c].total_spent)
                .sum();
            prop_assert_eq!(rollup[&node.id].total_spent, node.total_spent + children_sum);
        }
        let all: Decimal = spends.iter().map(|c| Decimal::new(*c, 2)).sum();
        prop_assert_eq!(rollup[&root.id].total_spent, all);
    }
}
