//! Inputs, outputs and change sets of the expense book.

use chrono::NaiveDate;
use expensa_shared::types::{
    AccountId, CategoryId, CostCenterId, SupplierId, TenantId, VoucherId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::budget::{BudgetOverrun, VarianceResult};
use crate::category::ExpenseCategory;
use crate::policy::LedgerPolicy;
use crate::voucher::{ExpenseVoucher, JournalEntry, PaymentMethod, PaymentSource, VoucherStatus};

/// Per-tenant counters. Both only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSequences {
    /// Sequence the next voucher number will use.
    pub next_voucher_seq: u32,
    /// Sequence the next root category code will use.
    pub next_root_seq: u32,
}

impl Default for TenantSequences {
    fn default() -> Self {
        Self {
            next_voucher_seq: 1,
            next_root_seq: 1,
        }
    }
}

/// Everything stored for one tenant, as loaded from persistence.
#[derive(Debug, Clone)]
pub struct BookSnapshot {
    /// Tenant the rows belong to.
    pub tenant_id: TenantId,
    /// Policy to apply.
    pub policy: LedgerPolicy,
    /// Chart of accounts, including the expense root.
    pub accounts: Vec<Account>,
    /// Category rows.
    pub categories: Vec<ExpenseCategory>,
    /// Vaults and banks.
    pub sources: Vec<PaymentSource>,
    /// Vouchers in any status.
    pub vouchers: Vec<ExpenseVoucher>,
    /// Posting and reversal entries.
    pub journals: Vec<JournalEntry>,
    /// Counters.
    pub sequences: TenantSequences,
}

/// Rows an operation created, changed or removed.
///
/// Persistence applies a change set as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// New accounts.
    pub accounts_created: Vec<Account>,
    /// Accounts with a new balance, name or group flag.
    pub accounts_updated: Vec<Account>,
    /// Removed accounts.
    pub accounts_deleted: Vec<AccountId>,
    /// New categories.
    pub categories_created: Vec<ExpenseCategory>,
    /// Changed categories.
    pub categories_updated: Vec<ExpenseCategory>,
    /// Removed categories.
    pub categories_deleted: Vec<CategoryId>,
    /// New vaults and banks.
    pub sources_created: Vec<PaymentSource>,
    /// New vouchers.
    pub vouchers_created: Vec<ExpenseVoucher>,
    /// Changed vouchers; `version` is already bumped.
    pub vouchers_updated: Vec<ExpenseVoucher>,
    /// Removed drafts.
    pub vouchers_deleted: Vec<VoucherId>,
    /// New journal entries.
    pub journals_created: Vec<JournalEntry>,
    /// New counter values, when they moved.
    pub sequences: Option<TenantSequences>,
}

impl ChangeSet {
    /// True when nothing needs to be written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of a mutating operation together with the rows to persist.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    /// Operation result.
    pub value: T,
    /// Rows to persist.
    pub changes: ChangeSet,
}

/// A draft as created or edited, with the advisory budget check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherDraft {
    /// The stored draft.
    pub voucher: ExpenseVoucher,
    /// Set when confirming the draft would exceed the category budget.
    pub budget_check: Option<BudgetOverrun>,
}

/// A voucher after a confirm or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherPosted {
    /// The voucher in its new status.
    pub voucher: ExpenseVoucher,
    /// Entry that was written.
    pub journal: JournalEntry,
    /// Advisory warning, confirmations only.
    pub budget_warning: Option<BudgetOverrun>,
}

/// Filters for voucher listings. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoucherFilter {
    /// Status.
    #[serde(default)]
    pub status: Option<VoucherStatus>,
    /// Category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Payment method.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Supplier.
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    /// Cost center.
    #[serde(default)]
    pub cost_center_id: Option<CostCenterId>,
    /// Earliest voucher date.
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Latest voucher date.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

/// A category with the figures rolled up from its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    /// The stored category.
    #[serde(flatten)]
    pub category: ExpenseCategory,
    /// Own spend plus the spend of every descendant.
    pub rolled_up_spent: Decimal,
    /// Own budget for leaves, sum of child budgets for groups.
    pub rolled_up_budget: Option<Decimal>,
    /// Variance against the rolled-up budget.
    pub variance: Option<VarianceResult>,
    /// Spend exceeds the rolled-up budget.
    pub is_over_budget: bool,
    /// Children ordered by code.
    pub children: Vec<CategoryNode>,
}
