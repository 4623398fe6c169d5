//! Voucher state machine.
//!
//! Valid transitions:
//! - Draft → Confirmed (confirm)
//! - Confirmed → Cancelled (cancel)
//! - Draft → deleted (delete, the row disappears)
//!
//! Everything else fails with `InvalidTransition`.

use chrono::{DateTime, Utc};

use crate::error::ExpenseError;
use crate::voucher::types::{VoucherAction, VoucherStatus};

/// A validated status change with its audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoucherTransition {
    /// Draft became confirmed.
    Confirm {
        /// The new status.
        new_status: VoucherStatus,
        /// When the voucher was confirmed.
        confirmed_at: DateTime<Utc>,
    },
    /// Confirmed became cancelled.
    Cancel {
        /// The new status.
        new_status: VoucherStatus,
        /// When the voucher was cancelled.
        cancelled_at: DateTime<Utc>,
        /// Optional reason.
        cancel_reason: Option<String>,
    },
}

impl VoucherTransition {
    /// Returns the new status resulting from this transition.
    #[must_use]
    pub fn new_status(&self) -> VoucherStatus {
        match self {
            Self::Confirm { new_status, .. } | Self::Cancel { new_status, .. } => *new_status,
        }
    }
}

/// Stateless service validating voucher status changes.
pub struct VoucherWorkflow;

impl VoucherWorkflow {
    /// Confirm a draft voucher at `now`.
    pub fn confirm(
        current_status: VoucherStatus,
        now: DateTime<Utc>,
    ) -> Result<VoucherTransition, ExpenseError> {
        match current_status {
            VoucherStatus::Draft => Ok(VoucherTransition::Confirm {
                new_status: VoucherStatus::Confirmed,
                confirmed_at: now,
            }),
            _ => Err(ExpenseError::InvalidTransition {
                from: current_status,
                action: VoucherAction::Confirm,
            }),
        }
    }

    /// Cancel a confirmed voucher at `now`. Blank reasons are dropped.
    pub fn cancel(
        current_status: VoucherStatus,
        cancel_reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<VoucherTransition, ExpenseError> {
        match current_status {
            VoucherStatus::Confirmed => Ok(VoucherTransition::Cancel {
                new_status: VoucherStatus::Cancelled,
                cancelled_at: now,
                cancel_reason: cancel_reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty()),
            }),
            _ => Err(ExpenseError::InvalidTransition {
                from: current_status,
                action: VoucherAction::Cancel,
            }),
        }
    }

    /// Check that a voucher may be edited.
    pub fn edit(current_status: VoucherStatus) -> Result<(), ExpenseError> {
        Self::require_draft(current_status, VoucherAction::Edit)
    }

    /// Check that a voucher may be deleted.
    pub fn delete(current_status: VoucherStatus) -> Result<(), ExpenseError> {
        Self::require_draft(current_status, VoucherAction::Delete)
    }

    fn require_draft(current_status: VoucherStatus, action: VoucherAction) -> Result<(), ExpenseError> {
        if current_status.is_editable() {
            Ok(())
        } else {
            Err(ExpenseError::InvalidTransition {
                from: current_status,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_confirm_from_draft() {
        let transition = VoucherWorkflow::confirm(VoucherStatus::Draft, at()).unwrap();
        assert_eq!(transition.new_status(), VoucherStatus::Confirmed);
        assert_eq!(
            transition,
            VoucherTransition::Confirm {
                new_status: VoucherStatus::Confirmed,
                confirmed_at: at(),
            }
        );
    }

    #[test]
    fn test_confirm_twice_fails() {
        let err = VoucherWorkflow::confirm(VoucherStatus::Confirmed, at()).unwrap_err();
        assert_eq!(
            err,
            ExpenseError::InvalidTransition {
                from: VoucherStatus::Confirmed,
                action: VoucherAction::Confirm,
            }
        );
    }

    #[test]
    fn test_cancel_requires_confirmed() {
        assert!(VoucherWorkflow::cancel(VoucherStatus::Draft, None, at()).is_err());
        assert!(VoucherWorkflow::cancel(VoucherStatus::Cancelled, None, at()).is_err());
    }

    #[test]
    fn test_cancel_drops_blank_reason() {
        let transition =
            VoucherWorkflow::cancel(VoucherStatus::Confirmed, Some("   ".into()), at()).unwrap();
        match transition {
            VoucherTransition::Cancel {
                cancel_reason,
                cancelled_at,
                ..
            } => {
                assert!(cancel_reason.is_none());
                assert_eq!(cancelled_at, at());
            }
            VoucherTransition::Confirm { .. } => panic!("expected cancel"),
        }
    }

    #[test]
    fn test_delete_and_edit_only_drafts() {
        assert!(VoucherWorkflow::delete(VoucherStatus::Draft).is_ok());
        assert!(VoucherWorkflow::edit(VoucherStatus::Draft).is_ok());
        for status in [VoucherStatus::Confirmed, VoucherStatus::Cancelled] {
            assert!(VoucherWorkflow::delete(status).is_err());
            assert!(VoucherWorkflow::edit(status).is_err());
        }
    }
}
