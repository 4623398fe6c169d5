//! Builders shared by unit and property tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use expensa_shared::types::{AccountId, CategoryId, PaymentSourceId, TenantId, VoucherId};
use rust_decimal::Decimal;

use crate::category::types::{ExpenseCategory, ExpenseType};
use crate::voucher::types::{ExpenseVoucher, PaymentMethod, VoucherStatus};

pub(crate) fn tenant() -> TenantId {
    TenantId::from_uuid(uuid::Uuid::nil())
}

pub(crate) fn at(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).unwrap_or_default())
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn category(code: &str, parent: Option<CategoryId>) -> ExpenseCategory {
    let now = Utc::now();
    ExpenseCategory {
        id: CategoryId::new(),
        tenant_id: tenant(),
        code: code.to_string(),
        name_ar: format!("فئة {code}"),
        name_en: Some(format!("Category {code}")),
        description: None,
        parent_id: parent,
        is_group: false,
        expense_type: ExpenseType::General,
        budget_amount: None,
        is_recurring: false,
        recurring_frequency: None,
        recurring_day: None,
        default_supplier_id: None,
        default_cost_center_id: None,
        account_id: AccountId::new(),
        owns_account: true,
        total_spent: Decimal::ZERO,
        next_child_seq: 1,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn voucher(amount: Decimal) -> ExpenseVoucher {
    let now = Utc::now();
    ExpenseVoucher {
        id: VoucherId::new(),
        tenant_id: tenant(),
        voucher_number: "EXP-2026-00001".into(),
        sequence: 1,
        date: date(2026, 3, 1),
        category_id: CategoryId::new(),
        description: "Office rent".into(),
        amount,
        payment_method: PaymentMethod::Cash,
        vault_id: Some(PaymentSourceId::new()),
        bank_id: None,
        check_number: None,
        check_date: None,
        supplier_id: None,
        cost_center_id: None,
        reference_number: None,
        notes: None,
        status: VoucherStatus::Draft,
        previous_voucher_number: None,
        version: 1,
        created_at: now,
        updated_at: now,
        confirmed_at: None,
        cancelled_at: None,
        cancel_reason: None,
    }
}
