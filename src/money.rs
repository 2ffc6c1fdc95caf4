//! Bounds of the `NUMERIC(12, 2)` money columns.

use rust_decimal::Decimal;

pub const MONEY_SCALE: u32 = 2;
pub const MONEY_INTEGER_DIGITS: u32 = 10;

/// True when `amount` is stored as-is: at most two decimal places and
/// fewer than ten integer digits.
pub fn fits_money_column(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
        && amount.abs() < Decimal::from(10_i64.pow(MONEY_INTEGER_DIGITS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_cents_and_trailing_zeros() {
        assert!(fits_money_column(Decimal::new(499, 1)));
        assert!(fits_money_column(Decimal::new(4990, 2)));
        assert!(fits_money_column(Decimal::new(49900, 3)));
        assert!(fits_money_column(Decimal::new(999_999_999_999, 2)));
    }

    #[test]
    fn rejects_sub_cent_and_oversized_amounts() {
        assert!(!fits_money_column(Decimal::new(1, 3)));
        assert!(!fits_money_column(Decimal::from(10_000_000_000_i64)));
        assert!(!fits_money_column(Decimal::from(10_000_000_000_000_i64)));
    }
}
