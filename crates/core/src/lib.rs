//! Core business logic for Expensa.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `category` - Expense category tree and code allocation
//! - `account` - Ledger accounts backing categories and payment sources
//! - `budget` - Budget rollups and variance analysis
//! - `voucher` - Voucher lifecycle and journal generation
//! - `recurrence` - Next-due dates for recurring categories
//! - `reports` - Read-only spend reports
//! - `book` - One tenant's ledger composing all of the above

pub mod account;
pub mod book;
pub mod budget;
pub mod category;
pub mod error;
pub mod policy;
pub mod recurrence;
pub mod reports;
pub mod voucher;

#[cfg(test)]
mod test_support;

pub use book::ExpenseBook;
pub use error::ExpenseError;
pub use policy::LedgerPolicy;
