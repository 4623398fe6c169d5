//! Voucher validation and posting plans.
//!
//! Preview and confirm both go through `plan_confirm`, so a preview always
//! shows exactly what a confirm would write.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use expensa_shared::types::{AccountId, PaymentSourceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountLinker};
use crate::budget::{BudgetAggregator, BudgetOverrun};
use crate::category::{CategoryTree, ExpenseCategory};
use crate::error::ExpenseError;
use crate::policy::LedgerPolicy;
use crate::voucher::journal::{JournalEntry, JournalService};
use crate::voucher::types::{
    ExpenseVoucher, PaymentMethod, PaymentSource, PaymentSourceKind, VoucherInput,
};

/// Balance movement of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// Account moved.
    pub account_id: AccountId,
    /// Balance before the posting.
    pub before: Decimal,
    /// Balance after the posting.
    pub after: Decimal,
}

/// Everything a confirmation or cancellation writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Journal entry to record.
    pub journal: JournalEntry,
    /// Account balances to store.
    pub balance_changes: Vec<BalanceChange>,
    /// Change to the category's direct `total_spent`.
    pub spent_delta: Decimal,
    /// Advisory budget warning.
    pub budget_warning: Option<BudgetOverrun>,
}

/// Stateless voucher engine.
pub struct VoucherEngine;

impl VoucherEngine {
    /// Validates draft fields against the tree and the known payment sources.
    ///
    /// Returns the target category and the payment source.
    pub fn validate<'a>(
        input: &VoucherInput,
        tree: &'a CategoryTree,
        sources: &'a HashMap<PaymentSourceId, PaymentSource>,
    ) -> Result<(&'a ExpenseCategory, &'a PaymentSource), ExpenseError> {
        if input.description.trim().is_empty() {
            return Err(ExpenseError::validation("description", "is required"));
        }
        if input.amount <= Decimal::ZERO {
            return Err(ExpenseError::validation("amount", "must be greater than zero"));
        }

        let category = tree.require(input.category_id)?;
        if category.is_group {
            return Err(ExpenseError::CategoryIsGroup {
                code: category.code.clone(),
            });
        }

        let source_id = Self::validate_payment_fields(input)?;
        let source = sources
            .get(&source_id)
            .ok_or(ExpenseError::PaymentSourceNotFound(source_id))?;
        let expected = input.payment_method.source_kind();
        if source.kind != expected {
            let field = match expected {
                PaymentSourceKind::Vault => "vault_id",
                PaymentSourceKind::Bank => "bank_id",
            };
            return Err(ExpenseError::validation(
                field,
                format!("{} is a {}, expected a {expected}", source.name, source.kind),
            ));
        }

        Ok((category, source))
    }

    /// Checks the method-specific fields and returns the chosen source id.
    fn validate_payment_fields(input: &VoucherInput) -> Result<PaymentSourceId, ExpenseError> {
        let method = input.payment_method;
        let source_id = match method.source_kind() {
            PaymentSourceKind::Vault => {
                if input.bank_id.is_some() {
                    return Err(ExpenseError::validation(
                        "bank_id",
                        "is not allowed for cash payments",
                    ));
                }
                input.vault_id.ok_or(ExpenseError::MissingPaymentSource {
                    method,
                    field: "vault_id",
                })?
            }
            PaymentSourceKind::Bank => {
                if input.vault_id.is_some() {
                    return Err(ExpenseError::validation(
                        "vault_id",
                        format!("is not allowed for {method} payments"),
                    ));
                }
                input.bank_id.ok_or(ExpenseError::MissingPaymentSource {
                    method,
                    field: "bank_id",
                })?
            }
        };

        let has_check_number = input
            .check_number
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty());
        if method == PaymentMethod::Check {
            if !has_check_number {
                return Err(ExpenseError::validation(
                    "check_number",
                    "is required for check payments",
                ));
            }
            if input.check_date.is_none() {
                return Err(ExpenseError::validation(
                    "check_date",
                    "is required for check payments",
                ));
            }
        } else if has_check_number || input.check_date.is_some() {
            return Err(ExpenseError::validation(
                "check_number",
                "cheque details are only allowed for check payments",
            ));
        }

        Ok(source_id)
    }

    /// Advisory budget check for spending `amount` on `category`.
    #[must_use]
    pub fn budget_check(category: &ExpenseCategory, amount: Decimal) -> Option<BudgetOverrun> {
        BudgetAggregator::check_overrun(category, amount)
    }

    /// Plans the confirmation of `voucher`.
    pub fn plan_confirm(
        voucher: &ExpenseVoucher,
        category: &ExpenseCategory,
        category_account: &Account,
        source: &PaymentSource,
        source_account: &Account,
        policy: LedgerPolicy,
        now: DateTime<Utc>,
    ) -> Result<Posting, ExpenseError> {
        let journal =
            JournalService::posting(voucher, category_account.id, source_account.id, now);
        let balance_changes = Self::balance_changes(&journal, category_account, source_account);

        let source_after = balance_changes
            .iter()
            .find(|c| c.account_id == source_account.id)
            .map_or(source_account.balance, |c| c.after);
        if policy.enforce_non_negative_balances && source_after < Decimal::ZERO {
            return Err(ExpenseError::InsufficientFunds {
                source_id: source.id,
                available: source_account.balance,
                required: voucher.amount,
            });
        }

        Ok(Posting {
            journal,
            balance_changes,
            spent_delta: voucher.amount,
            budget_warning: Self::budget_check(category, voucher.amount),
        })
    }

    /// Plans the cancellation of a confirmed `voucher` whose posting was `original`.
    #[must_use]
    pub fn plan_cancel(
        voucher: &ExpenseVoucher,
        original: &JournalEntry,
        reason: Option<&str>,
        category_account: &Account,
        source_account: &Account,
        now: DateTime<Utc>,
    ) -> Posting {
        let journal = JournalService::reversal(original, &voucher.voucher_number, reason, now);
        let balance_changes = Self::balance_changes(&journal, category_account, source_account);
        Posting {
            journal,
            balance_changes,
            spent_delta: -voucher.amount,
            budget_warning: None,
        }
    }

    fn balance_changes(
        journal: &JournalEntry,
        category_account: &Account,
        source_account: &Account,
    ) -> Vec<BalanceChange> {
        [category_account, source_account]
            .into_iter()
            .map(|account| {
                let (debit, credit) = journal
                    .lines
                    .iter()
                    .filter(|l| l.account_id == account.id)
                    .fold((Decimal::ZERO, Decimal::ZERO), |(d, c), l| {
                        (d + l.debit, c + l.credit)
                    });
                BalanceChange {
                    account_id: account.id,
                    before: account.balance,
                    after: AccountLinker::balance_after(account, debit, credit),
                }
            })
            .collect()
    }
}
