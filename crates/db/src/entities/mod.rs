//! `SeaORM` entity definitions, one module per table.

pub mod prelude;

pub mod accounts;
pub mod expense_categories;
pub mod expense_vouchers;
pub mod journal_entries;
pub mod journal_lines;
pub mod payment_sources;
pub mod sea_orm_active_enums;
pub mod tenant_sequences;
