//! Expense ledger error types.
//!
//! Every operation that fails returns one of these and leaves state untouched.
//! A budget overrun is not an error; it travels alongside a successful result.

use expensa_shared::types::{AccountId, CategoryId, PaymentSourceId, VoucherId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountType;
use crate::voucher::types::{PaymentMethod, VoucherAction, VoucherStatus};

/// Errors raised by the expense ledger engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExpenseError {
    /// A field failed validation.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending field name.
        field: &'static str,
        /// Human readable reason.
        message: String,
    },

    /// Category not found.
    #[error("Expense category {0} not found")]
    CategoryNotFound(CategoryId),

    /// Voucher not found.
    #[error("Expense voucher {0} not found")]
    VoucherNotFound(VoucherId),

    /// Account not found.
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    /// Vault or bank not found.
    #[error("Payment source {0} not found")]
    PaymentSourceNotFound(PaymentSourceId),

    /// Group categories only aggregate; they never take vouchers.
    #[error("Category {code} is a group and cannot receive vouchers")]
    CategoryIsGroup {
        /// Category code.
        code: String,
    },

    /// Category still referenced and cannot be removed or restructured.
    #[error("Category {code} is in use: {reason}")]
    CategoryInUse {
        /// Category code.
        code: String,
        /// What still references it.
        reason: String,
    },

    /// Only expense accounts can back a category.
    #[error("Account {account_id} is of type {actual}, expected {expected}")]
    AccountTypeMismatch {
        /// Account that was offered.
        account_id: AccountId,
        /// Required type.
        expected: AccountType,
        /// Actual type.
        actual: AccountType,
    },

    /// The account already backs another category.
    #[error("Account {account_id} is already bound to category {category_code}")]
    AccountAlreadyBound {
        /// Account that was offered.
        account_id: AccountId,
        /// Code of the category that owns it.
        category_code: String,
    },

    /// Voucher state machine violation.
    #[error("Cannot {action} a {from} voucher")]
    InvalidTransition {
        /// Current status.
        from: VoucherStatus,
        /// Attempted action.
        action: VoucherAction,
    },

    /// The payment method needs a vault or bank that was not given.
    #[error("Payment method {method} requires {field}")]
    MissingPaymentSource {
        /// Chosen payment method.
        method: PaymentMethod,
        /// Missing field.
        field: &'static str,
    },

    /// The payment source cannot cover the amount.
    #[error("Insufficient funds in {source_id}: available {available}, required {required}")]
    InsufficientFunds {
        /// Vault or bank.
        source_id: PaymentSourceId,
        /// Current balance.
        available: Decimal,
        /// Voucher amount.
        required: Decimal,
    },

    /// Stored tree data violates parent/child invariants.
    #[error("Category tree is corrupted: {0}")]
    TreeCorrupted(String),
}

impl ExpenseError {
    /// Shorthand for a field validation failure.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::CategoryNotFound(_)
            | Self::VoucherNotFound(_)
            | Self::AccountNotFound(_)
            | Self::PaymentSourceNotFound(_) => 404,
            Self::InvalidTransition { .. }
            | Self::CategoryInUse { .. }
            | Self::AccountAlreadyBound { .. } => 409,
            Self::CategoryIsGroup { .. }
            | Self::AccountTypeMismatch { .. }
            | Self::MissingPaymentSource { .. }
            | Self::InsufficientFunds { .. } => 422,
            Self::TreeCorrupted(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::VoucherNotFound(_) => "VOUCHER_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::PaymentSourceNotFound(_) => "PAYMENT_SOURCE_NOT_FOUND",
            Self::CategoryIsGroup { .. } => "CATEGORY_IS_GROUP",
            Self::CategoryInUse { .. } => "CATEGORY_IN_USE",
            Self::AccountTypeMismatch { .. } => "ACCOUNT_TYPE_MISMATCH",
            Self::AccountAlreadyBound { .. } => "ACCOUNT_ALREADY_BOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::MissingPaymentSource { .. } => "MISSING_PAYMENT_SOURCE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::TreeCorrupted(_) => "TREE_CORRUPTED",
        }
    }

    /// Returns the offending field for validation failures.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } | Self::MissingPaymentSource { field, .. } => {
                Some(*field)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_transition_error() {
        let err = ExpenseError::InvalidTransition {
            from: VoucherStatus::Cancelled,
            action: VoucherAction::Confirm,
        };
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert_eq!(err.to_string(), "Cannot confirm a cancelled voucher");
    }

    #[test]
    fn test_validation_error_carries_field() {
        let err = ExpenseError::validation("name_ar", "is required");
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.field(), Some("name_ar"));
        assert_eq!(err.to_string(), "Invalid name_ar: is required");
    }

    #[test]
    fn test_business_rule_errors_are_unprocessable() {
        let err = ExpenseError::InsufficientFunds {
            source_id: PaymentSourceId::new(),
            available: dec!(50),
            required: dec!(80),
        };
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(err.error_code(), "INSUFFICIENT_FUNDS");

        let err = ExpenseError::MissingPaymentSource {
            method: PaymentMethod::Cash,
            field: "vault_id",
        };
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(err.field(), Some("vault_id"));
        assert_eq!(err.to_string(), "Payment method cash requires vault_id");
    }

    #[test]
    fn test_not_found_errors() {
        let err = ExpenseError::CategoryNotFound(CategoryId::new());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "CATEGORY_NOT_FOUND");
        assert!(err.field().is_none());
    }
}
