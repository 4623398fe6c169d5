//! Budget aggregation over the category tree.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::BudgetAggregator;
pub use types::{BudgetOverrun, CategoryRollup, VarianceResult, VarianceStatus};
