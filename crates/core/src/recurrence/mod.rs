//! Next-due dates for recurring categories.
//!
//! Pure date arithmetic; nothing here creates vouchers.

pub mod scheduler;

#[cfg(test)]
mod scheduler_props;

pub use scheduler::{MAX_RECURRING_DAY, RecurrenceScheduler};
