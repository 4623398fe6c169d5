//! Minimal ledger accounts backing expense categories and payment sources.
//!
//! - `types` - Account, AccountType and the normal-balance rule
//! - `linker` - binding categories to accounts, posting lines, lazy rollups

pub mod linker;
pub mod types;

#[cfg(test)]
mod linker_props;

pub use linker::{AccountLinker, AccountRollup, EXPENSE_ROOT_CODE};
pub use types::{Account, AccountType, NewAccount, NormalBalance};
