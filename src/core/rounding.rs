use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole currency units, ties away from zero.
///
/// The statements accept whole crowns only. `12.5` becomes `13`, `-12.5`
/// becomes `-13`. Works on the decimal digits directly.
pub fn round_half_up(amount: Decimal) -> i128 {
    // scale is 0 after rounding, so the mantissa is the integer value
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .mantissa()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(round_half_up(dec!(12.5)), 13);
        assert_eq!(round_half_up(dec!(-12.5)), -13);
        assert_eq!(round_half_up(dec!(1500.50)), 1501);
        assert_eq!(round_half_up(dec!(2.5)), 3);
    }

    #[test]
    fn below_and_above_half() {
        assert_eq!(round_half_up(dec!(0.49)), 0);
        assert_eq!(round_half_up(dec!(0.4999999999)), 0);
        assert_eq!(round_half_up(dec!(0.5000000001)), 1);
        assert_eq!(round_half_up(dec!(-0.49)), 0);
    }

    #[test]
    fn integers_unchanged() {
        assert_eq!(round_half_up(dec!(0)), 0);
        assert_eq!(round_half_up(dec!(1501)), 1501);
        assert_eq!(round_half_up(dec!(-7)), -7);
        assert_eq!(round_half_up(dec!(100.000)), 100);
    }
}
