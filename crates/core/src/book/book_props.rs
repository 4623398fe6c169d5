//! Property-based tests for the expense book.

use expensa_shared::types::{CategoryId, PaymentSourceId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::ExpenseBook;
use crate::category::NewCategory;
use crate::policy::LedgerPolicy;
use crate::test_support::{at, date, tenant};
use crate::voucher::{NewPaymentSource, PaymentMethod, PaymentSourceKind, VoucherInput};

fn named(name: String, parent_id: Option<CategoryId>) -> NewCategory {
    NewCategory {
        parent_id,
        name_ar: name,
        create_account_automatically: true,
        ..NewCategory::default()
    }
}

/// A book with one vault and `leaves` leaf categories under a single root.
fn book_with_leaves(
    leaves: usize,
    opening: Decimal,
) -> (ExpenseBook, PaymentSourceId, Vec<CategoryId>) {
    let now = at(date(2026, 1, 1));
    let mut book = ExpenseBook::new(tenant(), LedgerPolicy::default());
    let vault = book
        .register_payment_source(NewPaymentSource {
            kind: PaymentSourceKind::Vault,
            name: "Vault".to_string(),
            account_code: "1101".to_string(),
            opening_balance: opening,
        })
        .unwrap()
        .value
        .id;
    let root = book.create_category(named("root".into(), None), now).unwrap().value.id;
    let ids = (0..leaves)
        .map(|i| {
            book.create_category(named(format!("leaf {i}"), Some(root)), now)
                .unwrap()
                .value
                .id
        })
        .collect();
    (book, vault, ids)
}

fn cash(category_id: CategoryId, vault: PaymentSourceId, cents: i64, day: u32) -> VoucherInput {
    VoucherInput {
        date: date(2026, 2, day),
        category_id,
        description: "spend".to_string(),
        amount: Decimal::new(cents, 2),
        payment_method: PaymentMethod::Cash,
        vault_id: Some(vault),
        bank_id: None,
        check_number: None,
        check_date: None,
        supplier_id: None,
        cost_center_id: None,
        reference_number: None,
        notes: None,
    }
}

proptest! {
    #[test]
    fn prop_cancel_after_confirm_restores_everything(
        spends in prop::collection::vec((0usize..3, 1i64..500_000, 1u32..28), 1..15)
    ) {
        let now = at(date(2026, 3, 1));
        let (mut book, vault, leaves) = book_with_leaves(3, Decimal::new(100_000_000, 2));
        let vault_account = book.payment_sources()[0].account_id;
        let root_account = book.expense_root().unwrap().id;

        let mut ids = Vec::new();
        for (leaf, cents, day) in &spends {
            let id = book
                .create_voucher(cash(leaves[*leaf], vault, *cents, *day), now)
                .unwrap()
                .value
                .voucher
                .id;
            book.confirm_voucher(id, now).unwrap();
            ids.push(id);
        }

        let spent: Decimal = spends.iter().map(|(_, c, _)| Decimal::new(*c, 2)).sum();
        prop_assert_eq!(book.account_balance(root_account).unwrap().balance, spent);
        prop_assert_eq!(book.category_tree()[0].rolled_up_spent, spent);

        for id in ids {
            book.cancel_voucher(id, None, now).unwrap();
        }
        prop_assert_eq!(book.account(vault_account).unwrap().balance, Decimal::new(100_000_000, 2));
        prop_assert_eq!(book.account_balance(root_account).unwrap().balance, Decimal::ZERO);
        for leaf in leaves {
            prop_assert_eq!(book.category(leaf).unwrap().total_spent, Decimal::ZERO);
        }
    }

    #[test]
    fn prop_journal_entries_balance(cents in prop::collection::vec(1i64..1_000_000, 1..10)) {
        let now = at(date(2026, 3, 1));
        let (mut book, vault, leaves) = book_with_leaves(1, Decimal::new(1_000_000_000, 2));
        for c in &cents {
            let id = book
                .create_voucher(cash(leaves[0], vault, *c, 10), now)
                .unwrap()
                .value
                .voucher
                .id;
            let posted = book.confirm_voucher(id, now).unwrap().value;
            let totals = posted.journal.totals();
            prop_assert!(totals.is_balanced);
            prop_assert_eq!(totals.debit, Decimal::new(*c, 2));
            prop_assert_eq!(posted.journal.lines.len(), 2);
        }
    }

    #[test]
    fn prop_child_codes_strictly_increase(ops in prop::collection::vec(any::<bool>(), 1..40)) {
        let now = at(date(2026, 1, 1));
        let mut book = ExpenseBook::new(tenant(), LedgerPolicy::default());
        let root = book.create_category(named("root".into(), None), now).unwrap().value.id;

        let mut live = Vec::new();
        let mut last_code = String::new();
        for (i, create) in ops.into_iter().enumerate() {
            if create || live.is_empty() {
                let child = book
                    .create_category(named(format!("c{i}"), Some(root)), now)
                    .unwrap()
                    .value;
                prop_assert!(child.code > last_code);
                last_code = child.code;
                live.push(child.id);
            } else {
                let id = live.remove(0);
                book.delete_category(id).unwrap();
            }
            prop_assert_eq!(book.category(root).unwrap().is_group, !live.is_empty());
        }
    }

    #[test]
    fn prop_failed_confirm_is_a_no_op(opening in 0i64..10_000, extra in 1i64..10_000) {
        let now = at(date(2026, 3, 1));
        let (mut book, vault, leaves) = book_with_leaves(1, Decimal::new(opening, 2));
        let id = book
            .create_voucher(cash(leaves[0], vault, opening + extra, 5), now)
            .unwrap()
            .value
            .voucher
            .id;
        let before = book.snapshot();
        prop_assert!(book.confirm_voucher(id, now).is_err());
        let after = book.snapshot();
        prop_assert_eq!(before.accounts, after.accounts);
        prop_assert_eq!(before.categories, after.categories);
        prop_assert_eq!(book.voucher(id).unwrap().version, 1);
        prop_assert!(book.journal(id).unwrap().is_empty());
    }
}
