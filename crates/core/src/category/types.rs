//! Expense category domain types.

use chrono::{DateTime, Utc};
use expensa_shared::types::{AccountId, CategoryId, CostCenterId, SupplierId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad classification of an expense category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    /// Ordinary spending.
    #[default]
    General,
    /// Periodic spending such as rent or subscriptions.
    Recurring,
    /// Spending tied to a supplier.
    SupplierRelated,
}

impl ExpenseType {
    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Recurring => "recurring",
            Self::SupplierRelated => "supplier_related",
        }
    }
}

/// How often a recurring category falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// Once a month on the recurring day.
    Monthly,
    /// Every three months.
    Quarterly,
    /// Every twelve months.
    Yearly,
}

impl RecurringFrequency {
    /// Returns the string representation of the frequency.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for RecurringFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the expense category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    /// Category ID.
    pub id: CategoryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Hierarchical code: parent code followed by a two digit sequence.
    pub code: String,
    /// Arabic name (required).
    pub name_ar: String,
    /// English name.
    pub name_en: Option<String>,
    /// Free text description.
    pub description: Option<String>,
    /// Parent category; `None` only for roots.
    pub parent_id: Option<CategoryId>,
    /// True iff the category has at least one child.
    pub is_group: bool,
    /// Classification.
    pub expense_type: ExpenseType,
    /// Monthly ceiling, leaf categories only.
    pub budget_amount: Option<Decimal>,
    /// Whether the category falls due periodically.
    pub is_recurring: bool,
    /// Recurrence period.
    pub recurring_frequency: Option<RecurringFrequency>,
    /// Day of month (1..=28) for monthly recurrences.
    pub recurring_day: Option<u32>,
    /// Supplier suggested for new vouchers.
    pub default_supplier_id: Option<SupplierId>,
    /// Cost center suggested for new vouchers.
    pub default_cost_center_id: Option<CostCenterId>,
    /// Linked ledger account.
    pub account_id: AccountId,
    /// True when the account was created together with the category.
    pub owns_account: bool,
    /// Direct spend from confirmed vouchers. Ancestors see it through rollups.
    pub total_spent: Decimal,
    /// Sequence the next child code will use. Never decremented.
    pub next_child_seq: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl ExpenseCategory {
    /// Display name, English when available.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name_en.as_deref().unwrap_or(&self.name_ar)
    }
}

fn default_true() -> bool {
    true
}

/// Input for creating a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCategory {
    /// Parent category; omit for a root.
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Arabic name.
    #[serde(default)]
    pub name_ar: String,
    /// English name.
    #[serde(default)]
    pub name_en: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Classification.
    #[serde(default)]
    pub expense_type: ExpenseType,
    /// Monthly ceiling.
    #[serde(default)]
    pub budget_amount: Option<Decimal>,
    /// Recurring flag.
    #[serde(default)]
    pub is_recurring: bool,
    /// Recurrence period.
    #[serde(default)]
    pub recurring_frequency: Option<RecurringFrequency>,
    /// Day of month for monthly recurrences.
    #[serde(default)]
    pub recurring_day: Option<u32>,
    /// Default supplier.
    #[serde(default)]
    pub default_supplier_id: Option<SupplierId>,
    /// Default cost center.
    #[serde(default)]
    pub default_cost_center_id: Option<CostCenterId>,
    /// Create a matching expense account (default) instead of binding one.
    #[serde(default = "default_true")]
    pub create_account_automatically: bool,
    /// Account to bind when not auto-creating.
    #[serde(default)]
    pub existing_account_id: Option<AccountId>,
}

/// Partial update of a category.
///
/// Nullable fields use a double option: absent leaves the value alone,
/// `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    /// Codes are immutable; any different value is rejected.
    #[serde(default)]
    pub code: Option<String>,
    /// Parents are immutable; any different value is rejected.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub parent_id: Option<Option<CategoryId>>,
    /// Arabic name.
    #[serde(default)]
    pub name_ar: Option<String>,
    /// English name.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub name_en: Option<Option<String>>,
    /// Description.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// Classification.
    #[serde(default)]
    pub expense_type: Option<ExpenseType>,
    /// Monthly ceiling.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub budget_amount: Option<Option<Decimal>>,
    /// Recurring flag.
    #[serde(default)]
    pub is_recurring: Option<bool>,
    /// Recurrence period.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub recurring_frequency: Option<Option<RecurringFrequency>>,
    /// Day of month.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub recurring_day: Option<Option<u32>>,
    /// Default supplier.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub default_supplier_id: Option<Option<SupplierId>>,
    /// Default cost center.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub default_cost_center_id: Option<Option<CostCenterId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_defaults() {
        let input: NewCategory = serde_json::from_str(r#"{"name_ar": "إيجار"}"#).unwrap();
        assert!(input.create_account_automatically);
        assert_eq!(input.expense_type, ExpenseType::General);
        assert!(input.parent_id.is_none());
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let patch: CategoryPatch =
            serde_json::from_str(r#"{"name_en": null, "budget_amount": "150.00"}"#).unwrap();
        assert_eq!(patch.name_en, Some(None));
        assert!(patch.description.is_none());
        assert_eq!(
            patch.budget_amount,
            Some(Some(Decimal::new(15000, 2)))
        );
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&ExpenseType::SupplierRelated).unwrap(),
            "\"supplier_related\""
        );
        assert_eq!(RecurringFrequency::Quarterly.to_string(), "quarterly");
    }
}
