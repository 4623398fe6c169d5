//! Journal entries generated by voucher postings.
//!
//! A confirmation debits the category's expense account and credits the
//! vault or bank account. A cancellation posts the mirror image.

use chrono::{DateTime, NaiveDate, Utc};
use expensa_shared::types::{AccountId, JournalEntryId, TenantId, VoucherId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::voucher::types::ExpenseVoucher;

/// Whether an entry posts or reverses a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalKind {
    /// Written on confirm.
    Posting,
    /// Written on cancel.
    Reversal,
}

impl JournalKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Posting => "posting",
            Self::Reversal => "reversal",
        }
    }
}

/// One side of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Account posted to.
    pub account_id: AccountId,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

/// Balanced two-line journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Voucher that produced it.
    pub voucher_id: VoucherId,
    /// Posting or reversal.
    pub kind: JournalKind,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Debit and credit lines.
    pub lines: Vec<JournalLine>,
    /// When the entry was generated.
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Sums the lines.
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        let debit = self.lines.iter().map(|l| l.debit).sum();
        let credit = self.lines.iter().map(|l| l.credit).sum();
        JournalTotals::new(debit, credit)
    }
}

/// Debit and credit totals of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }
}

/// Stateless journal generator.
pub struct JournalService;

impl JournalService {
    /// Builds the entry written when `voucher` is confirmed.
    #[must_use]
    pub fn posting(
        voucher: &ExpenseVoucher,
        category_account: AccountId,
        source_account: AccountId,
        now: DateTime<Utc>,
    ) -> JournalEntry {
        JournalEntry {
            id: JournalEntryId::new(),
            tenant_id: voucher.tenant_id,
            voucher_id: voucher.id,
            kind: JournalKind::Posting,
            entry_date: voucher.date,
            description: format!("{}: {}", voucher.voucher_number, voucher.description),
            lines: vec![
                JournalLine {
                    account_id: category_account,
                    debit: voucher.amount,
                    credit: Decimal::ZERO,
                    memo: Some(voucher.description.clone()),
                },
                JournalLine {
                    account_id: source_account,
                    debit: Decimal::ZERO,
                    credit: voucher.amount,
                    memo: Some(format!("{} via {}", voucher.voucher_number, voucher.payment_method)),
                },
            ],
            created_at: now,
        }
    }

    /// Builds the reversal of `original` by swapping debits and credits.
    ///
    /// The reversal is dated on the day of `now`.
    #[must_use]
    pub fn reversal(
        original: &JournalEntry,
        voucher_number: &str,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> JournalEntry {
        let lines = original
            .lines
            .iter()
            .map(|line| JournalLine {
                account_id: line.account_id,
                debit: line.credit,
                credit: line.debit,
                memo: Some(format!(
                    "Reversal: {}",
                    line.memo.clone().unwrap_or_default()
                )),
            })
            .collect();

        JournalEntry {
            id: JournalEntryId::new(),
            tenant_id: original.tenant_id,
            voucher_id: original.voucher_id,
            kind: JournalKind::Reversal,
            entry_date: now.date_naive(),
            description: match reason {
                Some(reason) => format!("Cancellation of {voucher_number}. Reason: {reason}"),
                None => format!("Cancellation of {voucher_number}"),
            },
            lines,
            created_at: now,
        }
    }
}
