//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::expense_categories::Entity as ExpenseCategories;
pub use super::expense_vouchers::Entity as ExpenseVouchers;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_lines::Entity as JournalLines;
pub use super::payment_sources::Entity as PaymentSources;
pub use super::tenant_sequences::Entity as TenantSequences;
