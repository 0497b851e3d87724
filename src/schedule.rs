//! Period-by-period amortization of a resolved quote.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{advance_one_month, round_money};
use crate::quote::{ResolvedQuote, VatBase};

/// One installment of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Position of the installment, starting at 1.
    pub period_index: u32,
    pub payment_date: NaiveDate,
    /// Tax-exclusive principal outstanding before this installment.
    pub opening_balance: Decimal,
    pub interest_portion: Decimal,
    pub principal_portion: Decimal,
    pub vat_portion: Decimal,
    /// Principal, interest and VAT due.
    pub total_payment: Decimal,
    pub closing_balance: Decimal,
}

/// Ordered installments plus the aggregates shown with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    /// Sum of every installment's total payment, rounded at each step.
    pub total_payments_sum: Decimal,
    /// Total payment of the first installment, quoted as the approximate monthly payment.
    pub first_period_payment: Decimal,
}

impl Schedule {
    pub fn total_vat(&self) -> Decimal {
        self.sum_of(|row| row.vat_portion)
    }

    pub fn total_principal(&self) -> Decimal {
        self.sum_of(|row| row.principal_portion)
    }

    fn sum_of(&self, field: impl Fn(&ScheduleRow) -> Decimal) -> Decimal {
        self.rows
            .iter()
            .map(field)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

/// Builds the installment schedule for a resolved quote.
///
/// Each figure is rounded as it is computed. The last installment absorbs the
/// residual balance left by rounding, so the closing balance ends at exactly
/// zero and the principal portions add up to the financed amount.
///
/// Performs no validation; `period_count` is expected to be positive.
/// Arithmetic saturates at the decimal range, so absurd rates never panic.
pub fn generate_schedule(
    quote: &ResolvedQuote,
    period_count: u32,
    vat_rate: Decimal,
    vat_base: VatBase,
    first_payment_date: NaiveDate,
) -> Schedule {
    let mut balance = quote.financed_exclusive;
    let mut payment_date = first_payment_date;
    let mut total_payments_sum = Decimal::ZERO;
    let mut rows = Vec::with_capacity(period_count as usize);

    for period_index in 1..=period_count {
        if period_index > 1 {
            payment_date = advance_one_month(payment_date);
        }

        let interest_portion = round_money(balance.saturating_mul(quote.period_rate));
        let mut principal_portion = round_money(quote.base_payment.saturating_sub(interest_portion));
        let mut closing_balance = round_money(balance.saturating_sub(principal_portion));

        if period_index == period_count {
            principal_portion = round_money(principal_portion.saturating_add(closing_balance));
            closing_balance = Decimal::ZERO;
        }

        let vat_base_amount = match vat_base {
            VatBase::InterestOnly => interest_portion,
            VatBase::Total => principal_portion.saturating_add(interest_portion),
        };
        let vat_portion = round_money(vat_base_amount.saturating_mul(vat_rate));
        let total_payment = round_money(
            principal_portion
                .saturating_add(interest_portion)
                .saturating_add(vat_portion),
        );

        rows.push(ScheduleRow {
            period_index,
            payment_date,
            opening_balance: balance,
            interest_portion,
            principal_portion,
            vat_portion,
            total_payment,
            closing_balance,
        });

        total_payments_sum = round_money(total_payments_sum.saturating_add(total_payment));
        balance = closing_balance;
    }

    let first_period_payment = rows.first().map_or(Decimal::ZERO, |row| row.total_payment);

    Schedule {
        rows,
        total_payments_sum,
        first_period_payment,
    }
}
