//! Category-to-account linking and balance rollups.

use std::collections::{HashMap, HashSet};

use expensa_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::types::{Account, AccountType};
use crate::error::ExpenseError;

/// Code of the per-tenant group account that auto-created category accounts hang under.
pub const EXPENSE_ROOT_CODE: &str = "5";

/// Rolled-up balance of an account and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRollup {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// True for group accounts.
    pub is_group: bool,
    /// Own balance plus all descendant balances.
    pub balance: Decimal,
}

/// Stateless service tying expense categories to ledger accounts.
pub struct AccountLinker;

impl AccountLinker {
    /// Checks that `account` may back a category.
    ///
    /// `owner_code` is the code of the category currently bound to the
    /// account, if any.
    pub fn bind_account(account: &Account, owner_code: Option<&str>) -> Result<(), ExpenseError> {
        if account.account_type != AccountType::Expense {
            return Err(ExpenseError::AccountTypeMismatch {
                account_id: account.id,
                expected: AccountType::Expense,
                actual: account.account_type,
            });
        }
        if let Some(code) = owner_code {
            return Err(ExpenseError::AccountAlreadyBound {
                account_id: account.id,
                category_code: code.to_string(),
            });
        }
        Ok(())
    }

    /// Builds the expense account auto-created alongside a category.
    #[must_use]
    pub fn auto_account(code: &str, name: &str, parent_id: Option<AccountId>) -> Account {
        Account::new(code, name, AccountType::Expense, parent_id)
    }

    /// Builds the tenant's expense root group account.
    #[must_use]
    pub fn expense_root() -> Account {
        let mut root = Account::new(EXPENSE_ROOT_CODE, "Expenses", AccountType::Expense, None);
        root.is_group = true;
        root
    }

    /// Balance the account would carry after one journal line, using its
    /// normal-balance rule.
    #[must_use]
    pub fn balance_after(account: &Account, debit: Decimal, credit: Decimal) -> Decimal {
        account.balance
            + account
                .account_type
                .normal_balance()
                .balance_change(debit, credit)
    }

    /// Sums an account's balance with the balances of all its descendants.
    ///
    /// Computed on read; group balances are never stored.
    pub fn rollup_balance(
        accounts: &HashMap<AccountId, Account>,
        account_id: AccountId,
    ) -> Result<AccountRollup, ExpenseError> {
        let account = accounts
            .get(&account_id)
            .ok_or(ExpenseError::AccountNotFound(account_id))?;

        let mut children: HashMap<AccountId, Vec<AccountId>> = HashMap::new();
        for acc in accounts.values() {
            if let Some(parent) = acc.parent_id {
                children.entry(parent).or_default().push(acc.id);
            }
        }

        let mut total = Decimal::ZERO;
        let mut seen = HashSet::new();
        let mut stack = vec![account_id];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(acc) = accounts.get(&id) {
                total += acc.balance;
            }
            if let Some(kids) = children.get(&id) {
                stack.extend(kids.iter().copied());
            }
        }

        Ok(AccountRollup {
            account_id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            is_group: account.is_group,
            balance: total,
        })
    }
}
