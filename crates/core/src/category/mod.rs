//! Expense category tree.
//!
//! # Modules
//!
//! - `types` - ExpenseCategory and its create/update inputs
//! - `code` - hierarchical code allocation
//! - `tree` - arena holding the tree with parent/children links

pub mod code;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tree_props;

pub use code::CategoryCodes;
pub use tree::CategoryTree;
pub use types::{CategoryPatch, ExpenseCategory, ExpenseType, NewCategory, RecurringFrequency};
