//! Tenant-independent ledger policy.

use expensa_shared::LedgerConfig;

/// Rules the engine applies on top of its invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Reject confirmations that would overdraw a vault or bank.
    pub enforce_non_negative_balances: bool,
    /// Root category codes start right after this number.
    pub root_code_base: u32,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self::from(&LedgerConfig::default())
    }
}

impl From<&LedgerConfig> for LedgerPolicy {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            enforce_non_negative_balances: config.enforce_non_negative_balances,
            root_code_base: config.root_code_base,
        }
    }
}
