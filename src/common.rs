//! Rounding and calendar helpers shared by the resolver and the generator.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount or rate to two decimal places, midpoints away from zero.
///
/// Every figure in a quote is rounded with this function at the moment it is
/// computed, so sums taken later over the rounded values reproduce exactly.
///
/// ```
/// use mx_financing::common::round_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_money(dec!(7107.8879)), dec!(7107.89));
/// assert_eq!(round_money(dec!(0.005)), dec!(0.01));
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Moves a date one calendar month forward.
///
/// The day of month is kept when the target month has it, otherwise it is
/// clamped to the target month's last day. Callers advance the previously
/// produced date, so a clamp carries into the following months.
pub fn advance_one_month(date: NaiveDate) -> NaiveDate {
    // Only fails past NaiveDate::MAX.
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(123.454), dec!(123.45))]
    #[case(dec!(123.455), dec!(123.46))]
    #[case(dec!(-123.455), dec!(-123.46))]
    #[case(dec!(0.001), dec!(0.00))]
    #[case(dec!(999999.999), dec!(1000000.00))]
    fn round_money_rounds_half_away_from_zero(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[rstest]
    #[case((2024, 1, 15), (2024, 2, 15))]
    #[case((2024, 1, 31), (2024, 2, 29))]
    #[case((2023, 1, 31), (2023, 2, 28))]
    #[case((2024, 12, 31), (2025, 1, 31))]
    fn advance_one_month_clamps_to_month_end(#[case] from: (i32, u32, u32), #[case] to: (i32, u32, u32)) {
        let from = NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap();
        let to = NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap();

        assert_eq!(advance_one_month(from), to);
    }

    #[test]
    fn clamped_day_carries_into_next_month() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let feb = advance_one_month(jan);
        let mar = advance_one_month(feb);

        assert_eq!(mar, NaiveDate::from_ymd_opt(2024, 3, 29).unwrap());
    }
}
