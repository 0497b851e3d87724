//! `mx_financing` is a Rust library for quoting installment sales of real estate
//! priced with VAT (IVA).
//!
//! A quote starts from the VAT-inclusive price, a down payment and the credit
//! terms, and produces a fixed-payment amortization schedule:
//! - the down payment and the financed amount, with and without VAT;
//! - a period rate prorated from the annual rate on a 360-day year;
//! - one installment per period, split into principal, interest and VAT, with
//!   the last installment absorbing rounding so the balance closes at zero.
//!
//! ## Usage
//!
//! Add `mx_financing` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mx_financing = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! ```
//!
//! Then use the `calculate_schedule` function:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use mx_financing::{calculate_schedule, QuoteInput, VatBase};
//! use rust_decimal_macros::dec;
//!
//! let input = QuoteInput {
//!     client_name: "Juan Pérez".to_string(),
//!     total_amount: dec!(116000),
//!     down_payment_percent: dec!(0.20),
//!     down_payment_amount: dec!(0),
//!     annual_rate: dec!(0.12),
//!     period_count: 12,
//!     first_payment_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!     vat_rate: dec!(0.16),
//!     vat_base: VatBase::Total,
//!     days_per_period: 30,
//! };
//!
//! match calculate_schedule(&input) {
//!     Ok(calculation) => {
//!         println!("Down payment:     {:.2}", calculation.quote.down_payment);
//!         println!("Monthly payment:  {:.2}", calculation.schedule.first_period_payment);
//!         println!("Total paid:       {:.2}", calculation.schedule.total_payments_sum);
//!     }
//!     Err(e) => {
//!         eprintln!("Error calculating schedule: {}", e);
//!     }
//! }
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod format;
pub mod quote;
pub mod schedule;
pub mod validation;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use config::Settings;
pub use error::{FinancingError, Result};
pub use export::{ExportFormat, QuoteDocument};
pub use form::QuoteForm;
pub use quote::{QuoteInput, ResolvedQuote, VatBase, resolve_quote};
pub use schedule::{Schedule, ScheduleRow, generate_schedule};
pub use validation::{Violation, validate};

/// Everything one calculation produces: the input it ran on, the resolved
/// quote and its schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub input: QuoteInput,
    pub quote: ResolvedQuote,
    pub schedule: Schedule,
}

/// Validates, resolves and schedules a quote.
///
/// This is the main entry point of the library. The result is only built once
/// the whole schedule exists, so callers holding a previous `Calculation`
/// replace it in one step.
///
/// # Errors
///
/// Returns [`FinancingError::Validation`] with every violation found when the
/// input is not acceptable; nothing is calculated in that case.
pub fn calculate_schedule(input: &QuoteInput) -> Result<Calculation> {
    let violations = validate(input);
    if !violations.is_empty() {
        warn!(count = violations.len(), "rejected quote input");
        return Err(FinancingError::Validation(violations));
    }

    let quote = resolve_quote(input);
    let schedule = generate_schedule(
        &quote,
        input.period_count,
        input.vat_rate,
        input.vat_base,
        input.first_payment_date,
    );

    info!(
        periods = input.period_count,
        first_payment = %schedule.first_period_payment,
        total = %schedule.total_payments_sum,
        "calculated schedule"
    );

    Ok(Calculation {
        input: input.clone(),
        quote,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn input() -> QuoteInput {
        QuoteInput {
            client_name: "Juan".to_string(),
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
    fn test_calculate_schedule_happy_path() {
        let result = calculate_schedule(&input()).unwrap();

        assert_eq!(result.quote.tax_exclusive_total, dec!(100000.00));
        assert_eq!(result.quote.down_payment, dec!(23200.00));
        assert_eq!(result.quote.financed_inclusive, dec!(92800.00));
        assert_eq!(result.quote.period_rate, dec!(0.01));
        assert_eq!(result.schedule.rows.len(), 12);
        assert_eq!(result.schedule.rows[11].closing_balance, dec!(0.00));
        assert_eq!(result.schedule.first_period_payment, dec!(8245.16));
        assert_eq!(result.schedule.total_payments_sum, dec!(98941.96));
    }

    #[rstest]
    #[case(QuoteInput { total_amount: dec!(50000000000000000000000000000), down_payment_percent: dec!(2), ..input() })]
    #[case(QuoteInput { total_amount: dec!(50000000000000000000000000000), down_payment_percent: dec!(0), ..input() })]
    #[case(QuoteInput { annual_rate: dec!(100000000000000000000000000), ..input() })]
    #[case(QuoteInput { annual_rate: Decimal::MAX, vat_rate: Decimal::MAX, ..input() })]
    #[case(QuoteInput { total_amount: Decimal::MAX, annual_rate: Decimal::MAX, down_payment_percent: dec!(0), vat_base: VatBase::InterestOnly, ..input() })]
    fn test_extreme_valid_input_is_calculated(#[case] extreme: QuoteInput) {
        assert!(validate(&extreme).is_empty());

        let result = calculate_schedule(&extreme).unwrap();

        assert_eq!(result.schedule.rows.len(), 12);
        assert_eq!(result.schedule.rows[11].closing_balance, dec!(0));
    }

    #[test]
    fn test_zero_total_is_rejected() {
        let result = calculate_schedule(&QuoteInput {
            total_amount: dec!(0),
            ..input()
        });

        let error = result.unwrap_err();
        assert_eq!(error.violations(), &[Violation::NonPositiveTotal]);
    }

    #[test]
    fn test_zero_months_error() {
        let result = calculate_schedule(&QuoteInput {
            period_count: 0,
            ..input()
        });

        assert!(result.is_err());
    }
}
