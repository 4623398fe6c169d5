//! Category store operations of the expense book.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use expensa_shared::types::{AccountId, CategoryId};
use rust_decimal::Decimal;

use crate::account::{Account, AccountLinker};
use crate::book::types::{CategoryNode, ChangeSet, Outcome};
use crate::book::ExpenseBook;
use crate::budget::BudgetAggregator;
use crate::category::{
    CategoryCodes, CategoryPatch, ExpenseCategory, NewCategory, RecurringFrequency,
};
use crate::error::ExpenseError;
use crate::recurrence::{MAX_RECURRING_DAY, RecurrenceScheduler};

/// Most due dates a single `next_due` call returns.
pub const MAX_UPCOMING: usize = 60;

/// Resolved recurrence settings.
type Recurrence = (bool, Option<RecurringFrequency>, Option<u32>);

fn normalize_recurrence(
    is_recurring: bool,
    frequency: Option<RecurringFrequency>,
    day: Option<u32>,
) -> Result<Recurrence, ExpenseError> {
    if !is_recurring {
        return Ok((false, None, None));
    }
    let Some(frequency) = frequency else {
        return Err(ExpenseError::validation(
            "recurring_frequency",
            "is required for recurring categories",
        ));
    };
    if let Some(day) = day {
        if !(1..=MAX_RECURRING_DAY).contains(&day) {
            return Err(ExpenseError::validation(
                "recurring_day",
                format!("must be between 1 and {MAX_RECURRING_DAY}"),
            ));
        }
    }
    Ok((true, Some(frequency), day))
}

fn check_budget(budget: Option<Decimal>) -> Result<(), ExpenseError> {
    if budget.is_some_and(|b| b < Decimal::ZERO) {
        return Err(ExpenseError::validation(
            "budget_amount",
            "must not be negative",
        ));
    }
    Ok(())
}

fn required_name(name: &str) -> Result<String, ExpenseError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ExpenseError::validation("name_ar", "is required"));
    }
    Ok(name.to_string())
}

impl ExpenseBook {
    /// Looks up a category.
    pub fn category(&self, id: CategoryId) -> Result<&ExpenseCategory, ExpenseError> {
        self.tree.require(id)
    }

    /// Every category ordered by code.
    #[must_use]
    pub fn categories(&self) -> Vec<ExpenseCategory> {
        self.tree.sorted_by_code().into_iter().cloned().collect()
    }

    /// Root to `id` breadcrumb.
    pub fn category_path(&self, id: CategoryId) -> Result<Vec<ExpenseCategory>, ExpenseError> {
        Ok(self.tree.path(id)?.into_iter().cloned().collect())
    }

    /// The whole tree with rolled-up figures on every node.
    #[must_use]
    pub fn category_tree(&self) -> Vec<CategoryNode> {
        let rollup = BudgetAggregator::rollup(&self.tree);
        let mut built: HashMap<CategoryId, CategoryNode> = HashMap::with_capacity(self.tree.len());

        for id in self.tree.post_order() {
            let (Some(category), Some(figures)) = (self.tree.get(id), rollup.get(&id)) else {
                continue;
            };
            let children = self
                .tree
                .children(id)
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(
                id,
                CategoryNode {
                    category: category.clone(),
                    rolled_up_spent: figures.total_spent,
                    rolled_up_budget: figures.budget_amount,
                    variance: figures.variance.clone(),
                    is_over_budget: figures.is_over_budget,
                    children,
                },
            );
        }

        self.tree
            .roots()
            .iter()
            .filter_map(|id| built.remove(id))
            .collect()
    }

    /// True when any voucher, in any status, points at `id`.
    pub(crate) fn has_vouchers(&self, id: CategoryId) -> bool {
        self.vouchers.values().any(|v| v.category_id == id)
    }

    /// Creates a category, allocating its code and linking its account.
    pub fn create_category(
        &mut self,
        input: NewCategory,
        now: DateTime<Utc>,
    ) -> Result<Outcome<ExpenseCategory>, ExpenseError> {
        let name_ar = required_name(&input.name_ar)?;
        check_budget(input.budget_amount)?;
        let (is_recurring, recurring_frequency, recurring_day) = normalize_recurrence(
            input.is_recurring,
            input.recurring_frequency,
            input.recurring_day,
        )?;

        let (code, parent_account) = match input.parent_id {
            Some(parent_id) => {
                let parent = self.tree.require(parent_id)?;
                if parent.total_spent != Decimal::ZERO || self.has_vouchers(parent_id) {
                    return Err(ExpenseError::CategoryInUse {
                        code: parent.code.clone(),
                        reason: "vouchers are already recorded against it".to_string(),
                    });
                }
                (
                    CategoryCodes::child_code(&parent.code, parent.next_child_seq)?,
                    parent.account_id,
                )
            }
            None => (
                CategoryCodes::root_code(
                    self.policy.root_code_base,
                    self.sequences.next_root_seq,
                )?,
                self.expense_root,
            ),
        };
        if self.tree.code_taken(&code) {
            return Err(ExpenseError::validation(
                "code",
                format!("category code {code} is already used"),
            ));
        }

        let display_name = input
            .name_en
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&name_ar)
            .to_string();
        let (account_id, new_account) = if input.create_account_automatically {
            if self.accounts.values().any(|a| a.code == code) {
                return Err(ExpenseError::validation(
                    "code",
                    format!("account code {code} is already used"),
                ));
            }
            let account = AccountLinker::auto_account(&code, &display_name, Some(parent_account));
            (account.id, Some(account))
        } else {
            let account_id = input.existing_account_id.ok_or_else(|| {
                ExpenseError::validation(
                    "existing_account_id",
                    "is required when the account is not created automatically",
                )
            })?;
            self.check_bindable(account_id, parent_account)?;
            (account_id, None)
        };

        let category = ExpenseCategory {
            id: CategoryId::new(),
            tenant_id: self.tenant_id,
            code,
            name_ar,
            name_en: input.name_en.filter(|n| !n.trim().is_empty()),
            description: input.description,
            parent_id: input.parent_id,
            is_group: false,
            expense_type: input.expense_type,
            budget_amount: input.budget_amount,
            is_recurring,
            recurring_frequency,
            recurring_day,
            default_supplier_id: input.default_supplier_id,
            default_cost_center_id: input.default_cost_center_id,
            account_id,
            owns_account: new_account.is_some(),
            total_spent: Decimal::ZERO,
            next_child_seq: 1,
            created_at: now,
            updated_at: now,
        };

        // validated; mutate
        let mut changes = ChangeSet::default();
        if let Some(parent) = self.mark_group(parent_account) {
            changes.accounts_updated.push(parent);
        }
        match new_account {
            Some(account) => {
                self.accounts.insert(account.id, account.clone());
                changes.accounts_created.push(account);
            }
            None => changes
                .accounts_updated
                .extend(self.attach_account(account_id, parent_account)),
        }
        match input.parent_id {
            Some(parent_id) => {
                let parent = self.tree.require_mut(parent_id)?;
                parent.next_child_seq += 1;
                // groups aggregate their children's budgets
                parent.budget_amount = None;
                parent.updated_at = now;
            }
            None => {
                self.sequences.next_root_seq += 1;
                changes.sequences = Some(self.sequences);
            }
        }
        self.tree.insert(category.clone())?;
        if let Some(parent_id) = input.parent_id {
            changes
                .categories_updated
                .push(self.tree.require(parent_id)?.clone());
        }
        changes.categories_created.push(category.clone());

        Ok(Outcome {
            value: category,
            changes,
        })
    }

    /// Checks that `account_id` may back a new category whose account will
    /// hang under `parent_account`.
    fn check_bindable(
        &self,
        account_id: AccountId,
        parent_account: AccountId,
    ) -> Result<(), ExpenseError> {
        if account_id == self.expense_root || account_id == parent_account {
            return Err(ExpenseError::validation(
                "existing_account_id",
                "a parent account cannot back a child category",
            ));
        }
        let account = self.account(account_id)?;
        let owner = self.tree.find_by_account(account_id).map(|c| c.code.as_str());
        AccountLinker::bind_account(account, owner)?;
        if account.is_group {
            return Err(ExpenseError::validation(
                "existing_account_id",
                format!("account {} is a group account", account.code),
            ));
        }
        Ok(())
    }

    /// Moves a leaf account under `parent`, so its balance rolls up through
    /// the category's ancestors. Returns every account whose row changed.
    fn attach_account(&mut self, account_id: AccountId, parent: AccountId) -> Vec<Account> {
        let mut touched = Vec::new();
        let Some(account) = self.accounts.get_mut(&account_id) else {
            return touched;
        };
        let previous = account.parent_id;
        if previous == Some(parent) {
            return touched;
        }
        account.parent_id = Some(parent);
        touched.push(account.clone());
        if let Some(old) = previous.and_then(|p| self.unmark_group_if_empty(p)) {
            touched.push(old);
        }
        if let Some(new) = self.mark_group(parent) {
            touched.push(new);
        }
        touched
    }

    /// Edits names, budget, classification and recurrence of a category.
    pub fn update_category(
        &mut self,
        id: CategoryId,
        patch: CategoryPatch,
        now: DateTime<Utc>,
    ) -> Result<Outcome<ExpenseCategory>, ExpenseError> {
        let current = self.tree.require(id)?;
        if patch.code.as_ref().is_some_and(|c| *c != current.code) {
            return Err(ExpenseError::validation("code", "cannot be changed"));
        }
        if patch.parent_id.is_some_and(|p| p != current.parent_id) {
            return Err(ExpenseError::validation("parent_id", "cannot be changed"));
        }
        if current.is_group && matches!(patch.budget_amount, Some(Some(_))) {
            return Err(ExpenseError::validation(
                "budget_amount",
                "can only be set on leaf categories",
            ));
        }

        let mut updated = current.clone();
        if let Some(name_ar) = patch.name_ar {
            updated.name_ar = required_name(&name_ar)?;
        }
        if let Some(name_en) = patch.name_en {
            updated.name_en = name_en.filter(|n| !n.trim().is_empty());
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(expense_type) = patch.expense_type {
            updated.expense_type = expense_type;
        }
        if let Some(budget) = patch.budget_amount {
            check_budget(budget)?;
            updated.budget_amount = budget;
        }
        let (is_recurring, recurring_frequency, recurring_day) = normalize_recurrence(
            patch.is_recurring.unwrap_or(updated.is_recurring),
            patch
                .recurring_frequency
                .unwrap_or(updated.recurring_frequency),
            patch.recurring_day.unwrap_or(updated.recurring_day),
        )?;
        updated.is_recurring = is_recurring;
        updated.recurring_frequency = recurring_frequency;
        updated.recurring_day = recurring_day;
        if let Some(supplier) = patch.default_supplier_id {
            updated.default_supplier_id = supplier;
        }
        if let Some(cost_center) = patch.default_cost_center_id {
            updated.default_cost_center_id = cost_center;
        }
        updated.updated_at = now;

        let mut changes = ChangeSet::default();
        if updated.owns_account {
            let name = updated.display_name().to_string();
            if let Some(account) = self.accounts.get_mut(&updated.account_id) {
                if account.name != name {
                    account.name = name;
                    changes.accounts_updated.push(account.clone());
                }
            }
        }
        *self.tree.require_mut(id)? = updated.clone();
        changes.categories_updated.push(updated.clone());

        Ok(Outcome {
            value: updated,
            changes,
        })
    }

    /// Deletes a category nobody depends on.
    ///
    /// An account created with the category goes with it; a bound account
    /// is only released.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<Outcome<()>, ExpenseError> {
        let category = self.tree.require(id)?;
        let in_use = |reason: &str| ExpenseError::CategoryInUse {
            code: category.code.clone(),
            reason: reason.to_string(),
        };
        if !self.tree.children(id).is_empty() {
            return Err(in_use("it still has child categories"));
        }
        if category.total_spent != Decimal::ZERO {
            return Err(in_use("it has recorded spend"));
        }
        if self.has_vouchers(id) {
            return Err(in_use("vouchers reference it"));
        }
        if category.owns_account
            && self
                .accounts
                .values()
                .any(|a| a.parent_id == Some(category.account_id))
        {
            return Err(in_use("other accounts hang under its account"));
        }

        let removed = self.tree.remove(id)?;
        let mut changes = ChangeSet {
            categories_deleted: vec![id],
            ..ChangeSet::default()
        };
        if let Some(parent) = removed.parent_id.and_then(|p| self.tree.get(p)) {
            changes.categories_updated.push(parent.clone());
        }
        if removed.owns_account {
            if let Some(account) = self.accounts.remove(&removed.account_id) {
                changes.accounts_deleted.push(account.id);
                if let Some(parent) = account
                    .parent_id
                    .and_then(|p| self.unmark_group_if_empty(p))
                {
                    changes.accounts_updated.push(parent);
                }
            }
        } else {
            // released accounts stay in the chart, directly under the expense root
            let root = self.expense_root;
            changes
                .accounts_updated
                .extend(self.attach_account(removed.account_id, root));
        }

        Ok(Outcome { value: (), changes })
    }

    /// The next `count` due dates of a recurring category after `from`.
    ///
    /// Non-recurring categories have none.
    pub fn next_due(
        &self,
        id: CategoryId,
        from: NaiveDate,
        count: usize,
    ) -> Result<Vec<NaiveDate>, ExpenseError> {
        if count == 0 || count > MAX_UPCOMING {
            return Err(ExpenseError::validation(
                "count",
                format!("must be between 1 and {MAX_UPCOMING}"),
            ));
        }
        let category = self.tree.require(id)?;
        Ok(RecurrenceScheduler::upcoming(category, from, count))
    }
}
