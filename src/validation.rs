//! Input checks run before any calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quote::QuoteInput;

/// Accepted range for [`QuoteInput::days_per_period`].
pub const DAYS_PER_PERIOD_RANGE: std::ops::RangeInclusive<u32> = 1..=31;

/// A problem with the captured quote, worded for the person filling the form.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Violation {
    #[error("Captura un monto total mayor a 0.")]
    NonPositiveTotal,

    #[error("Captura meses (mayor a 0).")]
    NoPeriods,

    #[error("IVA inválido.")]
    NegativeVatRate,

    #[error("Tasa anual inválida.")]
    NegativeAnnualRate,

    #[error("Días por periodo debe estar entre 1 y 31.")]
    DaysPerPeriodOutOfRange,

    #[error("Enganche inválido.")]
    NegativeDownPaymentAmount,

    #[error("% enganche inválido.")]
    NegativeDownPaymentPercent,
}

/// Checks every constraint on `input` and returns all violations found.
///
/// An empty list means the input can be calculated.
pub fn validate(input: &QuoteInput) -> Vec<Violation> {
    let checks = [
        (input.total_amount <= Decimal::ZERO, Violation::NonPositiveTotal),
        (input.period_count == 0, Violation::NoPeriods),
        (input.vat_rate < Decimal::ZERO, Violation::NegativeVatRate),
        (input.annual_rate < Decimal::ZERO, Violation::NegativeAnnualRate),
        (
            !DAYS_PER_PERIOD_RANGE.contains(&input.days_per_period),
            Violation::DaysPerPeriodOutOfRange,
        ),
        (
            input.down_payment_amount < Decimal::ZERO,
            Violation::NegativeDownPaymentAmount,
        ),
        (
            input.down_payment_percent < Decimal::ZERO,
            Violation::NegativeDownPaymentPercent,
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(failed, violation)| failed.then_some(violation))
        .collect()
}
