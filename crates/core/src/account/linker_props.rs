//! Property-based tests for AccountLinker.

use std::collections::HashMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::account::linker::AccountLinker;
use crate::account::types::AccountType;

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Posting a line and then its mirror leaves the balance unchanged.
    #[test]
    fn prop_mirror_lines_cancel(opening in arb_amount(), amount in arb_amount()) {
        for account_type in [AccountType::Asset, AccountType::Expense, AccountType::Liability] {
            let mut account = crate::account::Account::new("9", "x", account_type, None);
            account.balance = opening;
            account.balance = AccountLinker::balance_after(&account, amount, Decimal::ZERO);
            account.balance = AccountLinker::balance_after(&account, Decimal::ZERO, amount);
            prop_assert_eq!(account.balance, opening);
        }
    }

    /// The root rollup equals the sum of every leaf balance under it.
    #[test]
    fn prop_root_rollup_is_sum_of_leaves(balances in prop::collection::vec(arb_amount(), 1..20)) {
        let root = AccountLinker::expense_root();
        let mut accounts = HashMap::new();
        accounts.insert(root.id, root.clone());
        for (i, balance) in balances.iter().enumerate() {
            let mut leaf = AccountLinker::auto_account(&format!("5{i:03}"), "leaf", Some(root.id));
            leaf.balance = *balance;
            accounts.insert(leaf.id, leaf);
        }
        let expected: Decimal = balances.iter().copied().sum();
        let rollup = AccountLinker::rollup_balance(&accounts, root.id).unwrap();
        prop_assert_eq!(rollup.balance, expected);
    }
}
