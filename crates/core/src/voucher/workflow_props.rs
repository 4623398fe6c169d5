//! Property-based tests for VoucherWorkflow.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use crate::error::ExpenseError;
use crate::voucher::types::VoucherStatus;
use crate::voucher::workflow::{VoucherTransition, VoucherWorkflow};

fn arb_status() -> impl Strategy<Value = VoucherStatus> {
    prop_oneof![
        Just(VoucherStatus::Draft),
        Just(VoucherStatus::Confirmed),
        Just(VoucherStatus::Cancelled),
    ]
}

fn arb_reason() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[a-zA-Z0-9 ]{0,60}".prop_map(Some)]
}

fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Confirm succeeds exactly from draft.
    #[test]
    fn prop_confirm_only_from_draft(status in arb_status(), now in arb_instant()) {
        let result = VoucherWorkflow::confirm(status, now);
        prop_assert_eq!(result.is_ok(), status == VoucherStatus::Draft);
        if let Err(err) = result {
            let is_invalid_transition = matches!(err, ExpenseError::InvalidTransition { .. });
            prop_assert!(is_invalid_transition);
        }
    }

    /// Cancel succeeds exactly from confirmed.
    #[test]
    fn prop_cancel_only_from_confirmed(
        status in arb_status(),
        reason in arb_reason(),
        now in arb_instant(),
    ) {
        let result = VoucherWorkflow::cancel(status, reason, now);
        prop_assert_eq!(result.is_ok(), status == VoucherStatus::Confirmed);
    }

    /// Transitions carry the caller's clock, never their own.
    #[test]
    fn prop_transitions_stamp_given_instant(reason in arb_reason(), now in arb_instant()) {
        let confirm = VoucherWorkflow::confirm(VoucherStatus::Draft, now).unwrap();
        let confirmed_at = match confirm {
            VoucherTransition::Confirm { confirmed_at, .. } => Some(confirmed_at),
            VoucherTransition::Cancel { .. } => None,
        };
        prop_assert_eq!(confirmed_at, Some(now));

        let cancel = VoucherWorkflow::cancel(VoucherStatus::Confirmed, reason, now).unwrap();
        prop_assert_eq!(cancel.new_status(), VoucherStatus::Cancelled);
        let cancelled_at = match cancel {
            VoucherTransition::Cancel { cancelled_at, .. } => Some(cancelled_at),
            VoucherTransition::Confirm { .. } => None,
        };
        prop_assert_eq!(cancelled_at, Some(now));
    }

    /// Cancelled is terminal.
    #[test]
    fn prop_cancelled_is_terminal(reason in arb_reason(), now in arb_instant()) {
        prop_assert!(VoucherWorkflow::confirm(VoucherStatus::Cancelled, now).is_err());
        prop_assert!(VoucherWorkflow::cancel(VoucherStatus::Cancelled, reason, now).is_err());
        prop_assert!(VoucherWorkflow::edit(VoucherStatus::Cancelled).is_err());
        prop_assert!(VoucherWorkflow::delete(VoucherStatus::Cancelled).is_err());
    }
}
