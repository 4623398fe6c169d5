//! Property-based tests for journal generation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::test_support::{at, date, voucher};
use crate::voucher::journal::JournalService;
use expensa_shared::types::AccountId;

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every posting balances: debit total == credit total == amount.
    #[test]
    fn prop_posting_is_balanced(amount in arb_amount()) {
        let voucher = voucher(amount);
        let (expense, source) = (AccountId::new(), AccountId::new());
        let entry = JournalService::posting(&voucher, expense, source, at(voucher.date));
        let totals = entry.totals();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit, amount);
        prop_assert_eq!(totals.credit, amount);
    }

    /// Posting plus reversal nets every account to zero.
    #[test]
    fn prop_reversal_nets_to_zero(amount in arb_amount()) {
        let voucher = voucher(amount);
        let (expense, source) = (AccountId::new(), AccountId::new());
        let posting = JournalService::posting(&voucher, expense, source, at(voucher.date));
        let reversal = JournalService::reversal(
            &posting,
            &voucher.voucher_number,
            None,
            at(date(2026, 4, 1)),
        );
        prop_assert!(reversal.totals().is_balanced);
        for line in &posting.lines {
            let net: Decimal = posting
                .lines
                .iter()
                .chain(&reversal.lines)
                .filter(|l| l.account_id == line.account_id)
                .map(|l| l.debit - l.credit)
                .sum();
            prop_assert_eq!(net, Decimal::ZERO);
        }
    }
}
