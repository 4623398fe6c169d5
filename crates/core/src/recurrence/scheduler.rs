//! Recurrence scheduler.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::category::{ExpenseCategory, RecurringFrequency};

/// Last day of month a monthly recurrence may fall on.
pub const MAX_RECURRING_DAY: u32 = 28;

/// Stateless scheduler.
pub struct RecurrenceScheduler;

impl RecurrenceScheduler {
    /// Next due date strictly after `from`, or `None` for non-recurring categories.
    ///
    /// - daily: +1 day
    /// - weekly: +7 days
    /// - monthly: anchor day of the next month
    /// - quarterly: anchor day, 3 months on
    /// - yearly: anchor day, 12 months on
    ///
    /// The anchor day is `recurring_day`, or `from`'s day when unset, clamped to 1..=28.
    #[must_use]
    pub fn next_due_date(category: &ExpenseCategory, from: NaiveDate) -> Option<NaiveDate> {
        if !category.is_recurring {
            return None;
        }
        Self::advance(
            category.recurring_frequency?,
            category.recurring_day,
            from,
        )
    }

    /// The next `count` due dates after `from`.
    #[must_use]
    pub fn upcoming(category: &ExpenseCategory, from: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(count);
        let mut cursor = from;
        while dates.len() < count {
            match Self::next_due_date(category, cursor) {
                Some(next) => {
                    dates.push(next);
                    cursor = next;
                }
                None => break,
            }
        }
        dates
    }

    /// Advances `from` by one period.
    #[must_use]
    pub fn advance(
        frequency: RecurringFrequency,
        recurring_day: Option<u32>,
        from: NaiveDate,
    ) -> Option<NaiveDate> {
        match frequency {
            RecurringFrequency::Daily => from.checked_add_days(Days::new(1)),
            RecurringFrequency::Weekly => from.checked_add_days(Days::new(7)),
            RecurringFrequency::Monthly => Self::anchored(recurring_day, from, 1),
            RecurringFrequency::Quarterly => Self::anchored(recurring_day, from, 3),
            RecurringFrequency::Yearly => Self::anchored(recurring_day, from, 12),
        }
    }

    /// The anchor day of the month `months` after `from`'s month.
    fn anchored(recurring_day: Option<u32>, from: NaiveDate, months: u32) -> Option<NaiveDate> {
        let day = recurring_day
            .unwrap_or_else(|| from.day())
            .clamp(1, MAX_RECURRING_DAY);
        from.with_day(1)?
            .checked_add_months(Months::new(months))?
            .with_day(day)
    }
}
