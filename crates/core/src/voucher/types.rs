//! Voucher domain types.

use chrono::{DateTime, NaiveDate, Utc};
use expensa_shared::types::{
    AccountId, CategoryId, CostCenterId, PaymentSourceId, SupplierId, TenantId, VoucherId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Voucher status.
///
/// Valid transitions:
/// - Draft → Confirmed (confirm)
/// - Confirmed → Cancelled (cancel)
///
/// A draft may also be deleted outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherStatus {
    /// Editable, no ledger effect.
    Draft,
    /// Posted to the ledger.
    Confirmed,
    /// Reversed. Terminal.
    Cancelled,
}

impl VoucherStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if the voucher can still be edited or deleted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for VoucherStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation attempted on a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherAction {
    /// Change draft fields.
    Edit,
    /// Post to the ledger.
    Confirm,
    /// Reverse a posting.
    Cancel,
    /// Drop a draft.
    Delete,
}

impl fmt::Display for VoucherAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Edit => "edit",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Delete => "delete",
        })
    }
}

/// How a voucher was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid from a vault.
    Cash,
    /// Bank transfer.
    Bank,
    /// Cheque drawn on a bank.
    Check,
    /// Card charged to a bank.
    Card,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::Check => "check",
            Self::Card => "card",
        }
    }

    /// Kind of payment source this method draws on.
    #[must_use]
    pub fn source_kind(&self) -> PaymentSourceKind {
        match self {
            Self::Cash => PaymentSourceKind::Vault,
            Self::Bank | Self::Check | Self::Card => PaymentSourceKind::Bank,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vault or bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentSourceKind {
    /// Cash box.
    Vault,
    /// Bank account.
    Bank,
}

impl PaymentSourceKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vault => "vault",
            Self::Bank => "bank",
        }
    }
}

impl fmt::Display for PaymentSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vault or bank. Its balance is the balance of its asset account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSource {
    /// Source ID.
    pub id: PaymentSourceId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Vault or bank.
    pub kind: PaymentSourceKind,
    /// Display name.
    pub name: String,
    /// Backing asset account.
    pub account_id: AccountId,
}

/// Input for registering a vault or bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaymentSource {
    /// Vault or bank.
    pub kind: PaymentSourceKind,
    /// Display name.
    pub name: String,
    /// Code for the backing asset account.
    pub account_code: String,
    /// Balance the asset account starts with.
    #[serde(default)]
    pub opening_balance: Decimal,
}

/// Fields a caller supplies when creating or editing a draft voucher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherInput {
    /// Voucher date; also fixes the year in the voucher number.
    pub date: NaiveDate,
    /// Leaf category being charged.
    pub category_id: CategoryId,
    /// What the money was spent on.
    #[serde(default)]
    pub description: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Vault, required for cash.
    #[serde(default)]
    pub vault_id: Option<PaymentSourceId>,
    /// Bank, required for bank, check and card.
    #[serde(default)]
    pub bank_id: Option<PaymentSourceId>,
    /// Cheque number, required for check.
    #[serde(default)]
    pub check_number: Option<String>,
    /// Cheque date, required for check.
    #[serde(default)]
    pub check_date: Option<NaiveDate>,
    /// Supplier paid.
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    /// Cost center charged.
    #[serde(default)]
    pub cost_center_id: Option<CostCenterId>,
    /// External reference.
    #[serde(default)]
    pub reference_number: Option<String>,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A recorded expense event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseVoucher {
    /// Voucher ID.
    pub id: VoucherId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// `EXP-{YYYY}-{seq:05}`.
    pub voucher_number: String,
    /// Tenant-wide sequence behind the number.
    pub sequence: u32,
    /// Voucher date.
    pub date: NaiveDate,
    /// Leaf category charged.
    pub category_id: CategoryId,
    /// Description.
    pub description: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Vault for cash payments.
    pub vault_id: Option<PaymentSourceId>,
    /// Bank for bank, check and card payments.
    pub bank_id: Option<PaymentSourceId>,
    /// Cheque number.
    pub check_number: Option<String>,
    /// Cheque date.
    pub check_date: Option<NaiveDate>,
    /// Supplier.
    pub supplier_id: Option<SupplierId>,
    /// Cost center.
    pub cost_center_id: Option<CostCenterId>,
    /// External reference.
    pub reference_number: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Lifecycle status.
    pub status: VoucherStatus,
    /// Last confirmed voucher of the same category when this one was created.
    pub previous_voucher_number: Option<String>,
    /// Optimistic concurrency counter, bumped by every write.
    pub version: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// When the voucher was confirmed.
    pub confirmed_at: Option<DateTime<Utc>>,
    /// When the voucher was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Why it was cancelled.
    pub cancel_reason: Option<String>,
}

impl ExpenseVoucher {
    /// The vault or bank this voucher draws on.
    #[must_use]
    pub fn source_id(&self) -> Option<PaymentSourceId> {
        match self.payment_method.source_kind() {
            PaymentSourceKind::Vault => self.vault_id,
            PaymentSourceKind::Bank => self.bank_id,
        }
    }

    /// Overwrites the editable fields with `input`.
    pub fn apply_input(&mut self, input: VoucherInput) {
        self.date = input.date;
        self.category_id = input.category_id;
        self.description = input.description.trim().to_string();
        self.amount = input.amount;
        self.payment_method = input.payment_method;
        self.vault_id = input.vault_id;
        self.bank_id = input.bank_id;
        self.check_number = input.check_number;
        self.check_date = input.check_date;
        self.supplier_id = input.supplier_id;
        self.cost_center_id = input.cost_center_id;
        self.reference_number = input.reference_number;
        self.notes = input.notes;
    }
}
