//! Expense vouchers: numbering, lifecycle, journal generation and posting plans.
//!
//! # Modules
//!
//! - `types` - voucher, payment method and payment source types
//! - `numbering` - `EXP-{YYYY}-{seq}` voucher numbers
//! - `workflow` - the draft/confirmed/cancelled state machine
//! - `journal` - two-line journal entries and their reversals
//! - `engine` - validation and the posting plan shared by preview and confirm

pub mod engine;
pub mod journal;
pub mod numbering;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod journal_props;
#[cfg(test)]
mod workflow_props;

pub use engine::{BalanceChange, Posting, VoucherEngine};
pub use journal::{JournalEntry, JournalKind, JournalLine, JournalService, JournalTotals};
pub use numbering::VoucherNumbering;
pub use types::{
    ExpenseVoucher, NewPaymentSource, PaymentMethod, PaymentSource, PaymentSourceKind,
    VoucherAction, VoucherInput, VoucherStatus,
};
pub use workflow::{VoucherTransition, VoucherWorkflow};
