//! Mapping between ledger types and database rows.

use chrono::{DateTime, Utc};
use expensa_core::account::{Account, AccountType};
use expensa_core::book::TenantSequences;
use expensa_core::category::{ExpenseCategory, ExpenseType, RecurringFrequency};
use expensa_core::voucher::{
    ExpenseVoucher, JournalEntry, JournalKind, JournalLine, PaymentMethod, PaymentSource,
    PaymentSourceKind, VoucherStatus,
};
use expensa_shared::types::{
    AccountId, CategoryId, CostCenterId, JournalEntryId, PaymentSourceId, SupplierId, TenantId,
    VoucherId,
};
use sea_orm::Set;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::{
    accounts, expense_categories, expense_vouchers, journal_entries, journal_lines,
    payment_sources, sea_orm_active_enums as db,
};

macro_rules! mirror_enum {
    ($name:ident, [$($variant:ident),+ $(,)?]) => {
        impl From<$name> for db::$name {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => Self::$variant,)+
                }
            }
        }

        impl From<db::$name> for $name {
            fn from(value: db::$name) -> Self {
                match value {
                    $(db::$name::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(AccountType, [Asset, Liability, Equity, Revenue, Expense]);
mirror_enum!(ExpenseType, [General, Recurring, SupplierRelated]);
mirror_enum!(RecurringFrequency, [Daily, Weekly, Monthly, Quarterly, Yearly]);
mirror_enum!(PaymentSourceKind, [Vault, Bank]);
mirror_enum!(PaymentMethod, [Cash, Bank, Check, Card]);
mirror_enum!(VoucherStatus, [Draft, Confirmed, Cancelled]);
mirror_enum!(JournalKind, [Posting, Reversal]);

fn to_i32(value: u32, what: &str) -> Result<i32, RepositoryError> {
    i32::try_from(value)
        .map_err(|_| RepositoryError::InvalidData(format!("{what} {value} out of range")))
}

fn to_u32(value: i32, what: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::InvalidData(format!("{what} {value} is negative")))
}

fn utc(value: DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

fn stamp(value: DateTime<Utc>) -> DateTimeWithTimeZone {
    value.fixed_offset()
}

// ============================================================
// Tenant sequences
// ============================================================

pub(crate) fn sequences_from_row(
    next_voucher_seq: i32,
    next_root_seq: i32,
) -> Result<TenantSequences, RepositoryError> {
    Ok(TenantSequences {
        next_voucher_seq: to_u32(next_voucher_seq, "next_voucher_seq")?,
        next_root_seq: to_u32(next_root_seq, "next_root_seq")?,
    })
}

pub(crate) fn sequences_to_row(seq: TenantSequences) -> Result<(i32, i32), RepositoryError> {
    Ok((
        to_i32(seq.next_voucher_seq, "next_voucher_seq")?,
        to_i32(seq.next_root_seq, "next_root_seq")?,
    ))
}

// ============================================================
// Accounts
// ============================================================

pub(crate) fn account_from_model(model: accounts::Model) -> Account {
    Account {
        id: AccountId::from_uuid(model.id),
        code: model.code,
        name: model.name,
        account_type: model.account_type.into(),
        parent_id: model.parent_id.map(AccountId::from_uuid),
        is_group: model.is_group,
        balance: model.balance,
    }
}

pub(crate) fn account_to_active(
    tenant_id: TenantId,
    account: &Account,
    now: DateTime<Utc>,
) -> accounts::ActiveModel {
    accounts::ActiveModel {
        id: Set(account.id.into_inner()),
        tenant_id: Set(tenant_id.into_inner()),
        code: Set(account.code.clone()),
        name: Set(account.name.clone()),
        account_type: Set(account.account_type.into()),
        parent_id: Set(account.parent_id.map(AccountId::into_inner)),
        is_group: Set(account.is_group),
        balance: Set(account.balance),
        created_at: Set(stamp(now)),
        updated_at: Set(stamp(now)),
    }
}

// ============================================================
// Categories
// ============================================================

pub(crate) fn category_from_model(
    model: expense_categories::Model,
) -> Result<ExpenseCategory, RepositoryError> {
    Ok(ExpenseCategory {
        id: CategoryId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        code: model.code,
        name_ar: model.name_ar,
        name_en: model.name_en,
        description: model.description,
        parent_id: model.parent_id.map(CategoryId::from_uuid),
        is_group: model.is_group,
        expense_type: model.expense_type.into(),
        budget_amount: model.budget_amount,
        is_recurring: model.is_recurring,
        recurring_frequency: model.recurring_frequency.map(Into::into),
        recurring_day: model
            .recurring_day
            .map(|d| to_u32(d, "recurring_day"))
            .transpose()?,
        default_supplier_id: model.default_supplier_id.map(SupplierId::from_uuid),
        default_cost_center_id: model.default_cost_center_id.map(CostCenterId::from_uuid),
        account_id: AccountId::from_uuid(model.account_id),
        owns_account: model.owns_account,
        total_spent: model.total_spent,
        next_child_seq: to_u32(model.next_child_seq, "next_child_seq")?,
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
    })
}

pub(crate) fn category_to_active(
    category: &ExpenseCategory,
) -> Result<expense_categories::ActiveModel, RepositoryError> {
    Ok(expense_categories::ActiveModel {
        id: Set(category.id.into_inner()),
        tenant_id: Set(category.tenant_id.into_inner()),
        code: Set(category.code.clone()),
        name_ar: Set(category.name_ar.clone()),
        name_en: Set(category.name_en.clone()),
        description: Set(category.description.clone()),
        parent_id: Set(category.parent_id.map(CategoryId::into_inner)),
        is_group: Set(category.is_group),
        expense_type: Set(category.expense_type.into()),
        budget_amount: Set(category.budget_amount),
        is_recurring: Set(category.is_recurring),
        recurring_frequency: Set(category.recurring_frequency.map(Into::into)),
        recurring_day: Set(category
            .recurring_day
            .map(|d| to_i32(d, "recurring_day"))
            .transpose()?),
        default_supplier_id: Set(category.default_supplier_id.map(SupplierId::into_inner)),
        default_cost_center_id: Set(category
            .default_cost_center_id
            .map(CostCenterId::into_inner)),
        account_id: Set(category.account_id.into_inner()),
        owns_account: Set(category.owns_account),
        total_spent: Set(category.total_spent),
        next_child_seq: Set(to_i32(category.next_child_seq, "next_child_seq")?),
        created_at: Set(stamp(category.created_at)),
        updated_at: Set(stamp(category.updated_at)),
    })
}

// ============================================================
// Payment sources
// ============================================================

pub(crate) fn source_from_model(model: payment_sources::Model) -> PaymentSource {
    PaymentSource {
        id: PaymentSourceId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        kind: model.kind.into(),
        name: model.name,
        account_id: AccountId::from_uuid(model.account_id),
    }
}

pub(crate) fn source_to_active(
    source: &PaymentSource,
    now: DateTime<Utc>,
) -> payment_sources::ActiveModel {
    payment_sources::ActiveModel {
        id: Set(source.id.into_inner()),
        tenant_id: Set(source.tenant_id.into_inner()),
        kind: Set(source.kind.into()),
        name: Set(source.name.clone()),
        account_id: Set(source.account_id.into_inner()),
        created_at: Set(stamp(now)),
    }
}

// ============================================================
// Vouchers
// ============================================================

pub(crate) fn voucher_from_model(
    model: expense_vouchers::Model,
) -> Result<ExpenseVoucher, RepositoryError> {
    Ok(ExpenseVoucher {
        id: VoucherId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        voucher_number: model.voucher_number,
        sequence: to_u32(model.sequence, "sequence")?,
        date: model.voucher_date,
        category_id: CategoryId::from_uuid(model.category_id),
        description: model.description,
        amount: model.amount,
        payment_method: model.payment_method.into(),
        vault_id: model.vault_id.map(PaymentSourceId::from_uuid),
        bank_id: model.bank_id.map(PaymentSourceId::from_uuid),
        check_number: model.check_number,
        check_date: model.check_date,
        supplier_id: model.supplier_id.map(SupplierId::from_uuid),
        cost_center_id: model.cost_center_id.map(CostCenterId::from_uuid),
        reference_number: model.reference_number,
        notes: model.notes,
        status: model.status.into(),
        previous_voucher_number: model.previous_voucher_number,
        version: model.version,
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
        confirmed_at: model.confirmed_at.map(utc),
        cancelled_at: model.cancelled_at.map(utc),
        cancel_reason: model.cancel_reason,
    })
}

pub(crate) fn voucher_to_active(
    voucher: &ExpenseVoucher,
) -> Result<expense_vouchers::ActiveModel, RepositoryError> {
    Ok(expense_vouchers::ActiveModel {
        id: Set(voucher.id.into_inner()),
        tenant_id: Set(voucher.tenant_id.into_inner()),
        voucher_number: Set(voucher.voucher_number.clone()),
        sequence: Set(to_i32(voucher.sequence, "sequence")?),
        voucher_date: Set(voucher.date),
        category_id: Set(voucher.category_id.into_inner()),
        description: Set(voucher.description.clone()),
        amount: Set(voucher.amount),
        payment_method: Set(voucher.payment_method.into()),
        vault_id: Set(voucher.vault_id.map(PaymentSourceId::into_inner)),
        bank_id: Set(voucher.bank_id.map(PaymentSourceId::into_inner)),
        check_number: Set(voucher.check_number.clone()),
        check_date: Set(voucher.check_date),
        supplier_id: Set(voucher.supplier_id.map(SupplierId::into_inner)),
        cost_center_id: Set(voucher.cost_center_id.map(CostCenterId::into_inner)),
        reference_number: Set(voucher.reference_number.clone()),
        notes: Set(voucher.notes.clone()),
        status: Set(voucher.status.into()),
        previous_voucher_number: Set(voucher.previous_voucher_number.clone()),
        version: Set(voucher.version),
        created_at: Set(stamp(voucher.created_at)),
        updated_at: Set(stamp(voucher.updated_at)),
        confirmed_at: Set(voucher.confirmed_at.map(stamp)),
        cancelled_at: Set(voucher.cancelled_at.map(stamp)),
        cancel_reason: Set(voucher.cancel_reason.clone()),
    })
}

// ============================================================
// Journal
// ============================================================

pub(crate) fn journal_from_models(
    entry: journal_entries::Model,
    mut lines: Vec<journal_lines::Model>,
) -> JournalEntry {
    lines.sort_by_key(|l| l.line_no);
    JournalEntry {
        id: JournalEntryId::from_uuid(entry.id),
        tenant_id: TenantId::from_uuid(entry.tenant_id),
        voucher_id: VoucherId::from_uuid(entry.voucher_id),
        kind: entry.kind.into(),
        entry_date: entry.entry_date,
        description: entry.description,
        lines: lines
            .into_iter()
            .map(|l| JournalLine {
                account_id: AccountId::from_uuid(l.account_id),
                debit: l.debit,
                credit: l.credit,
                memo: l.memo,
            })
            .collect(),
        created_at: utc(entry.created_at),
    }
}

pub(crate) fn journal_to_active(
    entry: &JournalEntry,
) -> Result<(journal_entries::ActiveModel, Vec<journal_lines::ActiveModel>), RepositoryError> {
    let header = journal_entries::ActiveModel {
        id: Set(entry.id.into_inner()),
        tenant_id: Set(entry.tenant_id.into_inner()),
        voucher_id: Set(entry.voucher_id.into_inner()),
        kind: Set(entry.kind.into()),
        entry_date: Set(entry.entry_date),
        description: Set(entry.description.clone()),
        created_at: Set(stamp(entry.created_at)),
    };

    let lines = entry
        .lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let line_no = u32::try_from(idx + 1)
                .map_err(|_| RepositoryError::InvalidData("too many journal lines".to_string()))?;
            Ok(journal_lines::ActiveModel {
                id: Set(Uuid::now_v7()),
                journal_entry_id: Set(entry.id.into_inner()),
                line_no: Set(to_i32(line_no, "line_no")?),
                account_id: Set(line.account_id.into_inner()),
                debit: Set(line.debit),
                credit: Set(line.credit),
                memo: Set(line.memo.clone()),
            })
        })
        .collect::<Result<Vec<_>, RepositoryError>>()?;

    Ok((header, lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn stamped(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn test_enum_mirrors() {
        assert_eq!(db::PaymentMethod::from(PaymentMethod::Check), db::PaymentMethod::Check);
        assert_eq!(VoucherStatus::from(db::VoucherStatus::Cancelled), VoucherStatus::Cancelled);
        assert_eq!(
            ExpenseType::from(db::ExpenseType::SupplierRelated),
            ExpenseType::SupplierRelated
        );
        assert_eq!(db::JournalKind::from(JournalKind::Reversal), db::JournalKind::Reversal);
    }

    #[test]
    fn test_negative_counter_is_invalid_data() {
        let err = sequences_from_row(-1, 1).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidData(_)));
        assert_eq!(
            sequences_from_row(7, 3).unwrap(),
            TenantSequences {
                next_voucher_seq: 7,
                next_root_seq: 3
            }
        );
    }

    #[test]
    fn test_journal_lines_are_numbered_in_order() {
        let debit_account = AccountId::new();
        let credit_account = AccountId::new();
        let entry = JournalEntry {
            id: JournalEntryId::new(),
            tenant_id: TenantId::new(),
            voucher_id: VoucherId::new(),
            kind: JournalKind::Posting,
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            description: "Fuel".to_string(),
            lines: vec![
                JournalLine {
                    account_id: debit_account,
                    debit: dec!(40),
                    credit: dec!(0),
                    memo: None,
                },
                JournalLine {
                    account_id: credit_account,
                    debit: dec!(0),
                    credit: dec!(40),
                    memo: None,
                },
            ],
            created_at: stamped(9),
        };

        let (header, lines) = journal_to_active(&entry).unwrap();
        assert_eq!(header.id.clone().unwrap(), entry.id.into_inner());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_no.clone().unwrap(), 1);
        assert_eq!(lines[0].account_id.clone().unwrap(), debit_account.into_inner());
        assert_eq!(lines[1].line_no.clone().unwrap(), 2);
        assert_eq!(lines[1].credit.clone().unwrap(), dec!(40));
    }

    #[test]
    fn test_timestamps_come_back_in_utc() {
        let at = stamped(13);
        assert_eq!(utc(stamp(at)), at);
    }
}
