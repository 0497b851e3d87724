//! Quote inputs and the resolver that turns them into financed amounts and a rate.

use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::round_money;

/// Days in the commercial year used to prorate the annual rate.
pub const DAYS_PER_YEAR: u32 = 360;

/// Which part of each installment VAT is charged on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatBase {
    /// VAT on principal plus interest.
    #[default]
    Total,
    /// VAT on the interest portion only.
    InterestOnly,
}

impl VatBase {
    /// Label used in the exported document header.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Total => "IVA sobre (capital + interés)",
            Self::InterestOnly => "IVA sobre interés",
        }
    }
}

/// Parameters of an installment sale, as captured from the quote form.
///
/// Rates and percents are fractions (`0.16` for 16%). The struct is only
/// meaningful once [`crate::validation::validate`] returned no violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInput {
    /// Name of the buyer, only used on exported documents.
    #[serde(default)]
    pub client_name: String,
    /// Sale price, VAT included.
    pub total_amount: Decimal,
    /// Down payment as a fraction of the total, used when no literal amount is given.
    pub down_payment_percent: Decimal,
    /// Literal down payment; overrides the percent when greater than zero.
    pub down_payment_amount: Decimal,
    /// Nominal annual interest rate.
    pub annual_rate: Decimal,
    /// Number of installments.
    pub period_count: u32,
    /// Due date of the first installment.
    pub first_payment_date: NaiveDate,
    /// VAT rate applied to the installments.
    pub vat_rate: Decimal,
    pub vat_base: VatBase,
    /// Days one period represents when prorating the annual rate.
    pub days_per_period: u32,
}

/// Amounts derived once per calculation from a [`QuoteInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedQuote {
    pub down_payment: Decimal,
    /// Down payment over total, recomputed so displays agree with the figures used.
    pub down_payment_percent_actual: Decimal,
    pub tax_exclusive_total: Decimal,
    pub vat_on_total: Decimal,
    pub financed_inclusive: Decimal,
    /// Principal the schedule amortizes.
    pub financed_exclusive: Decimal,
    /// Interest rate of one period, already rounded to two decimals.
    pub period_rate: Decimal,
    /// Principal plus interest due each period, before VAT.
    pub base_payment: Decimal,
}

/// Resolves down payment, financed principal, period rate and base payment.
///
/// Pure function of its input; assumes the input passed validation.
pub fn resolve_quote(input: &QuoteInput) -> ResolvedQuote {
    let requested = if input.down_payment_amount > Decimal::ZERO {
        input.down_payment_amount
    } else {
        input.total_amount * input.down_payment_percent.min(Decimal::ONE)
    };
    let down_payment = round_money(requested.min(input.total_amount).max(Decimal::ZERO));

    let down_payment_percent_actual = if input.total_amount > Decimal::ZERO {
        down_payment / input.total_amount
    } else {
        Decimal::ZERO
    };

    let vat_factor = Decimal::ONE.saturating_add(input.vat_rate);
    let tax_exclusive_total = round_money(input.total_amount / vat_factor);
    let vat_on_total = round_money(input.total_amount - tax_exclusive_total);

    // VAT is stripped from the financed amount on its own, not via the down payment's VAT.
    let financed_inclusive = round_money(input.total_amount - down_payment);
    let financed_exclusive = round_money(financed_inclusive / vat_factor);

    let period_rate = period_rate(input.annual_rate, input.days_per_period);
    let base_payment = round_money(base_payment(financed_exclusive, period_rate, input.period_count));

    debug!(
        %down_payment,
        %financed_exclusive,
        %period_rate,
        %base_payment,
        "resolved quote"
    );

    ResolvedQuote {
        down_payment,
        down_payment_percent_actual,
        tax_exclusive_total,
        vat_on_total,
        financed_inclusive,
        financed_exclusive,
        period_rate,
        base_payment,
    }
}

/// Prorates an annual rate over `days_per_period` on a 360-day year.
///
/// The result is rounded to two decimals before any use, matching the
/// contractual rate of the instrument.
///
/// ```
/// use mx_financing::quote::period_rate;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(period_rate(dec!(0.12), 30), dec!(0.01));
/// ```
pub fn period_rate(annual_rate: Decimal, days_per_period: u32) -> Decimal {
    round_money(annual_rate / Decimal::from(DAYS_PER_YEAR) * Decimal::from(days_per_period))
}

/// Fixed installment that amortizes `principal` over `periods` at `rate`.
///
/// The formula is: PMT = P * i / [1 - (1 + i)^-n]
///
/// A zero rate splits the principal in equal parts. Zero periods yield zero.
/// The result is not rounded.
pub fn base_payment(principal: Decimal, rate: Decimal, periods: u32) -> Decimal {
    if periods == 0 {
        return Decimal::ZERO;
    }
    if rate.is_zero() {
        return principal / Decimal::from(periods);
    }

    // (1 + i)^n beyond the decimal range leaves a discount factor of zero.
    let discount = (Decimal::ONE + rate)
        .checked_powu(u64::from(periods))
        .and_then(|growth| Decimal::ONE.checked_div(growth))
        .unwrap_or(Decimal::ZERO);

    // Products past the decimal range saturate instead of panicking.
    principal
        .saturating_mul(rate)
        .checked_div(Decimal::ONE - discount)
        .unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn sample_input() -> QuoteInput {
        QuoteInput {
            client_name: String::new(),
            total_amount: dec!(116000),
            down_payment_percent: dec!(0.20),
            down_payment_amount: dec!(0),
            annual_rate: dec!(0.12),
            period_count: 12,
            first_payment_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            vat_rate: dec!(0.16),
            vat_base: VatBase::Total,
            days_per_period: 30,
        }
    }

    #[test]
    fn resolves_reference_quote() {
        let quote = resolve_quote(&sample_input());

        assert_eq!(quote.tax_exclusive_total, dec!(100000.00));
        assert_eq!(quote.vat_on_total, dec!(16000.00));
        assert_eq!(quote.down_payment, dec!(23200.00));
        assert_eq!(quote.down_payment_percent_actual, dec!(0.2));
        assert_eq!(quote.financed_inclusive, dec!(92800.00));
        assert_eq!(quote.financed_exclusive, dec!(80000.00));
        assert_eq!(quote.period_rate, dec!(0.01));
        assert_eq!(quote.base_payment, dec!(7107.90));
    }

    #[test]
    fn literal_down_payment_overrides_percent() {
        let input = QuoteInput {
            down_payment_amount: dec!(29000),
            ..sample_input()
        };

        let quote = resolve_quote(&input);

        assert_eq!(quote.down_payment, dec!(29000.00));
        assert_eq!(quote.down_payment_percent_actual, dec!(0.25));
        assert_eq!(quote.financed_inclusive, dec!(87000.00));
    }

    #[test]
    fn down_payment_is_clamped_to_total() {
        let input = QuoteInput {
            down_payment_amount: dec!(200000),
            ..sample_input()
        };

        let quote = resolve_quote(&input);

        assert_eq!(quote.down_payment, dec!(116000));
        assert_eq!(quote.financed_inclusive, dec!(0));
        assert_eq!(quote.financed_exclusive, dec!(0));
        assert_eq!(quote.base_payment, dec!(0));
    }

    #[test]
    fn down_payment_percent_above_one_is_capped() {
        let input = QuoteInput {
            total_amount: dec!(50000000000000000000000000000),
            down_payment_percent: dec!(2),
            ..sample_input()
        };

        let quote = resolve_quote(&input);

        assert_eq!(quote.down_payment, input.total_amount);
        assert_eq!(quote.financed_inclusive, dec!(0));
    }

    #[test]
    fn huge_vat_rate_does_not_overflow() {
        let input = QuoteInput {
            vat_rate: Decimal::MAX,
            ..sample_input()
        };

        let quote = resolve_quote(&input);

        assert_eq!(quote.tax_exclusive_total, dec!(0));
        assert_eq!(quote.vat_on_total, dec!(116000));
    }

    #[test]
    fn base_payment_saturates_on_huge_rate() {
        let payment = base_payment(dec!(80000), dec!(8333333333333333333333333.33), 12);

        assert_eq!(payment, Decimal::MAX);
    }

    #[rstest]
    #[case(dec!(0.12), 30, dec!(0.01))]
    #[case(dec!(0.36), 30, dec!(0.03))]
    #[case(dec!(0.10), 30, dec!(0.01))]
    #[case(dec!(0.12), 1, dec!(0.00))]
    #[case(dec!(0), 31, dec!(0))]
    fn period_rate_is_rounded_before_use(#[case] annual: Decimal, #[case] days: u32, #[case] expected: Decimal) {
        assert_eq!(period_rate(annual, days), expected);
    }

    #[test]
    fn base_payment_without_interest_is_straight_line() {
        assert_eq!(base_payment(dec!(1200), dec!(0), 12), dec!(100));
    }

    #[test]
    fn base_payment_with_zero_periods_is_zero() {
        assert_eq!(base_payment(dec!(1200), dec!(0.01), 0), dec!(0));
    }

    #[test]
    fn base_payment_matches_annuity_formula() {
        assert_eq!(round_money(base_payment(dec!(80000), dec!(0.01), 12)), dec!(7107.90));
    }

    #[test]
    fn base_payment_survives_overflowing_growth() {
        let payment = base_payment(dec!(1000), dec!(0.9), 5000);

        assert_eq!(round_money(payment), dec!(900.00));
    }
}
