//! Voucher lifecycle operations of the expense book.

use chrono::{DateTime, Utc};
use expensa_shared::types::VoucherId;

use crate::account::Account;
use crate::book::types::{ChangeSet, Outcome, VoucherDraft, VoucherPosted};
use crate::book::ExpenseBook;
use crate::category::ExpenseCategory;
use crate::error::ExpenseError;
use crate::voucher::{
    ExpenseVoucher, JournalEntry, JournalKind, PaymentSource, PaymentSourceKind, Posting,
    VoucherEngine, VoucherInput, VoucherNumbering, VoucherStatus, VoucherTransition,
    VoucherWorkflow,
};

impl ExpenseBook {
    /// Looks up a voucher.
    pub fn voucher(&self, id: VoucherId) -> Result<&ExpenseVoucher, ExpenseError> {
        self.vouchers.get(&id).ok_or(ExpenseError::VoucherNotFound(id))
    }

    /// Journal entries written for a voucher, oldest first.
    pub fn journal(&self, id: VoucherId) -> Result<Vec<JournalEntry>, ExpenseError> {
        self.voucher(id)?;
        Ok(self.journals.get(&id).cloned().unwrap_or_default())
    }

    /// Number of the confirmed voucher of `category` that was confirmed last.
    fn previous_voucher_number(&self, category: &ExpenseCategory) -> Option<String> {
        self.vouchers
            .values()
            .filter(|v| v.category_id == category.id && v.status == VoucherStatus::Confirmed)
            .max_by_key(|v| (v.confirmed_at, v.sequence))
            .map(|v| v.voucher_number.clone())
    }

    /// Records a draft. No balance or journal effect.
    pub fn create_voucher(
        &mut self,
        input: VoucherInput,
        now: DateTime<Utc>,
    ) -> Result<Outcome<VoucherDraft>, ExpenseError> {
        let (category, _) = VoucherEngine::validate(&input, &self.tree, &self.sources)?;
        let budget_check = VoucherEngine::budget_check(category, input.amount);
        let previous_voucher_number = self.previous_voucher_number(category);

        let sequence = self.sequences.next_voucher_seq;
        let next_sequence = sequence.checked_add(1).ok_or_else(|| {
            ExpenseError::validation("voucher_number", "voucher sequence exhausted")
        })?;

        let mut voucher = ExpenseVoucher {
            id: VoucherId::new(),
            tenant_id: self.tenant_id,
            voucher_number: VoucherNumbering::format(input.date, sequence),
            sequence,
            date: input.date,
            category_id: input.category_id,
            description: String::new(),
            amount: input.amount,
            payment_method: input.payment_method,
            vault_id: None,
            bank_id: None,
            check_number: None,
            check_date: None,
            supplier_id: None,
            cost_center_id: None,
            reference_number: None,
            notes: None,
            status: VoucherStatus::Draft,
            previous_voucher_number,
            version: 1,
            created_at: now,
            updated_at: now,
            confirmed_at: None,
            cancelled_at: None,
            cancel_reason: None,
        };
        voucher.apply_input(input);

        self.sequences.next_voucher_seq = next_sequence;
        self.vouchers.insert(voucher.id, voucher.clone());

        Ok(Outcome {
            value: VoucherDraft {
                voucher: voucher.clone(),
                budget_check,
            },
            changes: ChangeSet {
                vouchers_created: vec![voucher],
                sequences: Some(self.sequences),
                ..ChangeSet::default()
            },
        })
    }

    /// Replaces the fields of a draft. The voucher number stays.
    pub fn update_voucher(
        &mut self,
        id: VoucherId,
        input: VoucherInput,
        now: DateTime<Utc>,
    ) -> Result<Outcome<VoucherDraft>, ExpenseError> {
        let current = self.voucher(id)?;
        VoucherWorkflow::edit(current.status)?;
        let (category, _) = VoucherEngine::validate(&input, &self.tree, &self.sources)?;
        let budget_check = VoucherEngine::budget_check(category, input.amount);

        let mut updated = current.clone();
        updated.apply_input(input);
        updated.version += 1;
        updated.updated_at = now;
        self.vouchers.insert(id, updated.clone());

        Ok(Outcome {
            value: VoucherDraft {
                voucher: updated.clone(),
                budget_check,
            },
            changes: ChangeSet {
                vouchers_updated: vec![updated],
                ..ChangeSet::default()
            },
        })
    }

    /// Drops a draft.
    pub fn delete_voucher(&mut self, id: VoucherId) -> Result<Outcome<()>, ExpenseError> {
        VoucherWorkflow::delete(self.voucher(id)?.status)?;
        self.vouchers.remove(&id);
        Ok(Outcome {
            value: (),
            changes: ChangeSet {
                vouchers_deleted: vec![id],
                ..ChangeSet::default()
            },
        })
    }

    /// Resolves the category, source and both accounts a draft posts to.
    fn posting_targets(
        &self,
        voucher: &ExpenseVoucher,
    ) -> Result<(&ExpenseCategory, &Account, &PaymentSource, &Account), ExpenseError> {
        let category = self.tree.require(voucher.category_id)?;
        if category.is_group {
            return Err(ExpenseError::CategoryIsGroup {
                code: category.code.clone(),
            });
        }
        let source_id = voucher
            .source_id()
            .ok_or(ExpenseError::MissingPaymentSource {
                method: voucher.payment_method,
                field: match voucher.payment_method.source_kind() {
                    PaymentSourceKind::Vault => "vault_id",
                    PaymentSourceKind::Bank => "bank_id",
                },
            })?;
        let source = self
            .sources
            .get(&source_id)
            .ok_or(ExpenseError::PaymentSourceNotFound(source_id))?;
        let category_account = self.account(category.account_id)?;
        let source_account = self.account(source.account_id)?;
        Ok((category, category_account, source, source_account))
    }

    /// The posting a confirm at `now` would write. Changes nothing.
    pub fn preview_voucher(
        &self,
        id: VoucherId,
        now: DateTime<Utc>,
    ) -> Result<Posting, ExpenseError> {
        let voucher = self.voucher(id)?;
        VoucherWorkflow::confirm(voucher.status, now)?;
        self.plan_confirm(voucher, now)
    }

    fn plan_confirm(
        &self,
        voucher: &ExpenseVoucher,
        now: DateTime<Utc>,
    ) -> Result<Posting, ExpenseError> {
        let (category, category_account, source, source_account) =
            self.posting_targets(voucher)?;
        VoucherEngine::plan_confirm(
            voucher,
            category,
            category_account,
            source,
            source_account,
            self.policy,
            now,
        )
    }

    /// Posts a draft: journal entry, balances, category spend and status in one step.
    pub fn confirm_voucher(
        &mut self,
        id: VoucherId,
        now: DateTime<Utc>,
    ) -> Result<Outcome<VoucherPosted>, ExpenseError> {
        let voucher = self.voucher(id)?;
        let transition = VoucherWorkflow::confirm(voucher.status, now)?;
        let posting = self.plan_confirm(voucher, now)?;

        let mut confirmed = voucher.clone();
        if let VoucherTransition::Confirm { confirmed_at, .. } = &transition {
            confirmed.confirmed_at = Some(*confirmed_at);
        }
        confirmed.status = transition.new_status();
        confirmed.version += 1;
        confirmed.updated_at = now;

        let changes = self.apply_posting(&posting, confirmed.clone(), now)?;
        Ok(Outcome {
            value: VoucherPosted {
                voucher: confirmed,
                journal: posting.journal,
                budget_warning: posting.budget_warning,
            },
            changes,
        })
    }

    /// Reverses a confirmed voucher and marks it cancelled.
    pub fn cancel_voucher(
        &mut self,
        id: VoucherId,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Outcome<VoucherPosted>, ExpenseError> {
        let voucher = self.voucher(id)?;
        let transition = VoucherWorkflow::cancel(voucher.status, reason, now)?;
        let original = self
            .journals
            .get(&id)
            .and_then(|entries| entries.iter().find(|e| e.kind == JournalKind::Posting))
            .ok_or_else(|| {
                ExpenseError::TreeCorrupted(format!(
                    "confirmed voucher {} has no posting entry",
                    voucher.voucher_number
                ))
            })?;

        let debited = original.lines.iter().find(|l| !l.debit.is_zero());
        let credited = original.lines.iter().find(|l| !l.credit.is_zero());
        let (Some(debited), Some(credited)) = (debited, credited) else {
            return Err(ExpenseError::TreeCorrupted(format!(
                "posting of voucher {} is not a two-line entry",
                voucher.voucher_number
            )));
        };
        let category_account = self.account(debited.account_id)?;
        let source_account = self.account(credited.account_id)?;

        let mut cancelled = voucher.clone();
        if let VoucherTransition::Cancel {
            cancelled_at,
            cancel_reason,
            ..
        } = &transition
        {
            cancelled.cancelled_at = Some(*cancelled_at);
            cancelled.cancel_reason.clone_from(cancel_reason);
        }
        let posting = VoucherEngine::plan_cancel(
            voucher,
            original,
            cancelled.cancel_reason.as_deref(),
            category_account,
            source_account,
            now,
        );
        cancelled.status = transition.new_status();
        cancelled.version += 1;
        cancelled.updated_at = now;

        let changes = self.apply_posting(&posting, cancelled.clone(), now)?;
        Ok(Outcome {
            value: VoucherPosted {
                voucher: cancelled,
                journal: posting.journal,
                budget_warning: None,
            },
            changes,
        })
    }

    /// Writes a planned posting into the book.
    fn apply_posting(
        &mut self,
        posting: &Posting,
        voucher: ExpenseVoucher,
        now: DateTime<Utc>,
    ) -> Result<ChangeSet, ExpenseError> {
        let mut changes = ChangeSet::default();

        let category = self.tree.require_mut(voucher.category_id)?;
        category.total_spent += posting.spent_delta;
        category.updated_at = now;
        changes.categories_updated.push(category.clone());

        for change in &posting.balance_changes {
            if let Some(account) = self.accounts.get_mut(&change.account_id) {
                account.balance = change.after;
                changes.accounts_updated.push(account.clone());
            }
        }

        self.journals
            .entry(voucher.id)
            .or_default()
            .push(posting.journal.clone());
        changes.journals_created.push(posting.journal.clone());

        self.vouchers.insert(voucher.id, voucher.clone());
        changes.vouchers_updated.push(voucher);
        Ok(changes)
    }
}
