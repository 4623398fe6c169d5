//! Voucher numbers.
//!
//! Format is `EXP-{YYYY}-{seq:05}`. The sequence is tenant-wide and
//! monotonic; the year comes from the voucher date. Numbers are never reused,
//! not even when a draft is deleted.

use chrono::{Datelike, NaiveDate};

/// Prefix of every expense voucher number.
pub const VOUCHER_PREFIX: &str = "EXP";

/// Stateless voucher number formatter.
pub struct VoucherNumbering;

impl VoucherNumbering {
    /// Formats the number for `seq` on `date`.
    #[must_use]
    pub fn format(date: NaiveDate, seq: u32) -> String {
        format!("{VOUCHER_PREFIX}-{:04}-{seq:05}", date.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::date;
    use rstest::rstest;

    #[rstest]
    #[case(date(2026, 1, 5), 1, "EXP-2026-00001")]
    #[case(date(2026, 12, 31), 42, "EXP-2026-00042")]
    #[case(date(2027, 1, 1), 43, "EXP-2027-00043")]
    #[case(date(2026, 6, 1), 123_456, "EXP-2026-123456")]
    fn test_format(#[case] on: NaiveDate, #[case] seq: u32, #[case] expected: &str) {
        assert_eq!(VoucherNumbering::format(on, seq), expected);
    }
}
