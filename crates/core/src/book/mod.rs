//! In-memory expense book of one tenant.
//!
//! `ExpenseBook` composes the category tree, the accounts, the payment
//! sources and the vouchers of a tenant. Every mutating operation validates
//! completely before it touches any state, so a failed call leaves the book
//! unchanged. Successful calls return an [`Outcome`] whose [`ChangeSet`]
//! lists the rows persistence has to write.

mod categories;
pub mod types;
mod views;
mod vouchers;

#[cfg(test)]
mod book_props;

pub use types::{
    BookSnapshot, CategoryNode, ChangeSet, Outcome, TenantSequences, VoucherDraft, VoucherFilter,
    VoucherPosted,
};

use std::collections::HashMap;

use expensa_shared::types::{AccountId, PaymentSourceId, TenantId, VoucherId};
use rust_decimal::Decimal;

use crate::account::{
    Account, AccountLinker, AccountRollup, AccountType, EXPENSE_ROOT_CODE, NewAccount,
};
use crate::category::CategoryTree;
use crate::error::ExpenseError;
use crate::policy::LedgerPolicy;
use crate::voucher::{ExpenseVoucher, JournalEntry, NewPaymentSource, PaymentSource};

/// One tenant's expense ledger.
#[derive(Debug, Clone)]
pub struct ExpenseBook {
    tenant_id: TenantId,
    policy: LedgerPolicy,
    expense_root: AccountId,
    accounts: HashMap<AccountId, Account>,
    tree: CategoryTree,
    sources: HashMap<PaymentSourceId, PaymentSource>,
    vouchers: HashMap<VoucherId, ExpenseVoucher>,
    journals: HashMap<VoucherId, Vec<JournalEntry>>,
    sequences: TenantSequences,
}

impl ExpenseBook {
    /// Creates an empty book holding only the expense root account.
    #[must_use]
    pub fn new(tenant_id: TenantId, policy: LedgerPolicy) -> Self {
        let root = AccountLinker::expense_root();
        let expense_root = root.id;
        Self {
            tenant_id,
            policy,
            expense_root,
            accounts: HashMap::from([(root.id, root)]),
            tree: CategoryTree::new(),
            sources: HashMap::new(),
            vouchers: HashMap::new(),
            journals: HashMap::new(),
            sequences: TenantSequences::default(),
        }
    }

    /// Rebuilds a book from stored rows.
    ///
    /// Fails with `TreeCorrupted` when the expense root account is missing or
    /// the category rows do not form a tree.
    pub fn from_snapshot(snapshot: BookSnapshot) -> Result<Self, ExpenseError> {
        let expense_root = snapshot
            .accounts
            .iter()
            .find(|a| a.code == EXPENSE_ROOT_CODE && a.parent_id.is_none())
            .map(|a| a.id)
            .ok_or_else(|| {
                ExpenseError::TreeCorrupted(format!(
                    "tenant {} has no expense root account",
                    snapshot.tenant_id
                ))
            })?;

        let tree = CategoryTree::from_categories(snapshot.categories)?;

        let mut journals: HashMap<VoucherId, Vec<JournalEntry>> = HashMap::new();
        for entry in snapshot.journals {
            journals.entry(entry.voucher_id).or_default().push(entry);
        }
        for entries in journals.values_mut() {
            entries.sort_by_key(|e| e.created_at);
        }

        Ok(Self {
            tenant_id: snapshot.tenant_id,
            policy: snapshot.policy,
            expense_root,
            accounts: snapshot.accounts.into_iter().map(|a| (a.id, a)).collect(),
            tree,
            sources: snapshot.sources.into_iter().map(|s| (s.id, s)).collect(),
            vouchers: snapshot.vouchers.into_iter().map(|v| (v.id, v)).collect(),
            journals,
            sequences: snapshot.sequences,
        })
    }

    /// All rows of the book, in the shape `from_snapshot` accepts.
    #[must_use]
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            tenant_id: self.tenant_id,
            policy: self.policy,
            accounts: self.accounts(),
            categories: self.categories(),
            sources: self.payment_sources(),
            vouchers: self.vouchers.values().cloned().collect(),
            journals: self.journals.values().flatten().cloned().collect(),
            sequences: self.sequences,
        }
    }

    /// Tenant this book belongs to.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Policy in force.
    #[must_use]
    pub fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    /// Current counters.
    #[must_use]
    pub fn sequences(&self) -> TenantSequences {
        self.sequences
    }

    /// The category tree.
    #[must_use]
    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    /// The expense root group account.
    pub fn expense_root(&self) -> Result<&Account, ExpenseError> {
        self.account(self.expense_root)
    }

    /// Looks up an account.
    pub fn account(&self, id: AccountId) -> Result<&Account, ExpenseError> {
        self.accounts.get(&id).ok_or(ExpenseError::AccountNotFound(id))
    }

    /// Every account ordered by code.
    #[must_use]
    pub fn accounts(&self) -> Vec<Account> {
        let mut all: Vec<Account> = self.accounts.values().cloned().collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        all
    }

    /// Balance of an account including every descendant.
    pub fn account_balance(&self, id: AccountId) -> Result<AccountRollup, ExpenseError> {
        AccountLinker::rollup_balance(&self.accounts, id)
    }

    /// Adds an account to the chart.
    pub fn register_account(&mut self, input: NewAccount) -> Result<Outcome<Account>, ExpenseError> {
        let code = input.code.trim();
        let name = input.name.trim();
        self.check_account_code(code, "code")?;
        if name.is_empty() {
            return Err(ExpenseError::validation("name", "is required"));
        }
        let parent = input.parent_id.map(|id| self.account(id)).transpose()?;
        if let Some(parent) = parent {
            if parent.account_type != input.account_type {
                return Err(ExpenseError::AccountTypeMismatch {
                    account_id: parent.id,
                    expected: input.account_type,
                    actual: parent.account_type,
                });
            }
            if self.tree.find_by_account(parent.id).is_some_and(|c| !c.is_group) {
                return Err(ExpenseError::validation(
                    "parent_id",
                    format!("account {} backs a leaf category", parent.code),
                ));
            }
        }

        let account = Account::new(code, name, input.account_type, input.parent_id);
        let mut changes = ChangeSet::default();
        if let Some(parent_id) = input.parent_id {
            if let Some(parent) = self.mark_group(parent_id) {
                changes.accounts_updated.push(parent);
            }
        }
        self.accounts.insert(account.id, account.clone());
        changes.accounts_created.push(account.clone());

        Ok(Outcome {
            value: account,
            changes,
        })
    }

    /// Every vault and bank ordered by name.
    #[must_use]
    pub fn payment_sources(&self) -> Vec<PaymentSource> {
        let mut all: Vec<PaymentSource> = self.sources.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Registers a vault or bank together with its asset account.
    pub fn register_payment_source(
        &mut self,
        input: NewPaymentSource,
    ) -> Result<Outcome<PaymentSource>, ExpenseError> {
        let name = input.name.trim();
        let code = input.account_code.trim();
        if name.is_empty() {
            return Err(ExpenseError::validation("name", "is required"));
        }
        self.check_account_code(code, "account_code")?;
        if input.opening_balance < Decimal::ZERO {
            return Err(ExpenseError::validation(
                "opening_balance",
                "must not be negative",
            ));
        }

        let mut account = Account::new(code, name, AccountType::Asset, None);
        account.balance = input.opening_balance;
        let source = PaymentSource {
            id: PaymentSourceId::new(),
            tenant_id: self.tenant_id,
            kind: input.kind,
            name: name.to_string(),
            account_id: account.id,
        };

        self.accounts.insert(account.id, account.clone());
        self.sources.insert(source.id, source.clone());

        Ok(Outcome {
            value: source.clone(),
            changes: ChangeSet {
                accounts_created: vec![account],
                sources_created: vec![source],
                ..ChangeSet::default()
            },
        })
    }

    fn check_account_code(&self, code: &str, field: &'static str) -> Result<(), ExpenseError> {
        if code.is_empty() {
            return Err(ExpenseError::validation(field, "is required"));
        }
        if self.accounts.values().any(|a| a.code == code) {
            return Err(ExpenseError::validation(
                field,
                format!("account code {code} is already used"),
            ));
        }
        Ok(())
    }

    /// Flags an account as a group. Returns it when the flag changed.
    fn mark_group(&mut self, id: AccountId) -> Option<Account> {
        let account = self.accounts.get_mut(&id)?;
        if account.is_group {
            return None;
        }
        account.is_group = true;
        Some(account.clone())
    }

    /// Clears the group flag once an account has no children left.
    /// Returns it when the flag changed. The expense root stays a group.
    fn unmark_group_if_empty(&mut self, id: AccountId) -> Option<Account> {
        if id == self.expense_root || self.accounts.values().any(|a| a.parent_id == Some(id)) {
            return None;
        }
        let account = self.accounts.get_mut(&id)?;
        if !account.is_group {
            return None;
        }
        account.is_group = false;
        Some(account.clone())
    }
}
