//! Hierarchical category codes.
//!
//! A root gets `root_code_base + seq` (`51`, `52`, ...). A child gets its
//! parent's code followed by a two digit sequence (`5101`, `5102`, ...).
//! Sequences only move forward, so a deleted code is never handed out again.

use crate::error::ExpenseError;

/// Highest sequence a single parent can allocate.
pub const MAX_SEQUENCE: u32 = 99;

/// Stateless code allocator.
pub struct CategoryCodes;

impl CategoryCodes {
    /// Code for the `seq`-th child of `parent_code`.
    pub fn child_code(parent_code: &str, seq: u32) -> Result<String, ExpenseError> {
        if seq == 0 || seq > MAX_SEQUENCE {
            return Err(ExpenseError::validation(
                "code",
                format!("category {parent_code} has no child codes left"),
            ));
        }
        Ok(format!("{parent_code}{seq:02}"))
    }

    /// Code for the `seq`-th root category.
    pub fn root_code(base: u32, seq: u32) -> Result<String, ExpenseError> {
        let code = base.saturating_add(seq);
        if seq == 0 || code > MAX_SEQUENCE {
            return Err(ExpenseError::validation(
                "code",
                "no root category codes left",
            ));
        }
        Ok(code.to_string())
    }
}
