//! Property-based tests for RecurrenceScheduler.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use crate::category::RecurringFrequency;
use crate::recurrence::scheduler::RecurrenceScheduler;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_frequency() -> impl Strategy<Value = RecurringFrequency> {
    prop_oneof![
        Just(RecurringFrequency::Daily),
        Just(RecurringFrequency::Weekly),
        Just(RecurringFrequency::Monthly),
        Just(RecurringFrequency::Quarterly),
        Just(RecurringFrequency::Yearly),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The next due date always lies after the starting date.
    #[test]
    fn prop_next_is_later(frequency in arb_frequency(), day in prop::option::of(0u32..40), from in arb_date()) {
        let next = RecurrenceScheduler::advance(frequency, day, from).unwrap();
        prop_assert!(next > from);
    }

    /// Monthly recurrences land in the following month on a day within 1..=28.
    #[test]
    fn prop_monthly_day_clamped(day in prop::option::of(0u32..40), from in arb_date()) {
        let next = RecurrenceScheduler::advance(RecurringFrequency::Monthly, day, from).unwrap();
        prop_assert!((1..=28).contains(&next.day()));
        let months_from = from.year() * 12 + i32::try_from(from.month()).unwrap();
        let months_next = next.year() * 12 + i32::try_from(next.month()).unwrap();
        prop_assert_eq!(months_next - months_from, 1);
    }

    /// Chained quarterly and yearly dates all fall on one clamped day.
    #[test]
    fn prop_long_periods_keep_anchor_day(
        day in prop::option::of(1u32..=28),
        from in arb_date(),
        yearly in any::<bool>(),
    ) {
        let frequency = if yearly { RecurringFrequency::Yearly } else { RecurringFrequency::Quarterly };
        let expected = day.unwrap_or_else(|| from.day());
        let mut cursor = from;
        for _ in 0..6 {
            cursor = RecurrenceScheduler::advance(frequency, day, cursor).unwrap();
            prop_assert_eq!(cursor.day(), expected);
        }
    }
}
