//! Display formatting for amounts, rates and dates (es-MX conventions).

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::common::round_money;

const MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Formats an amount as pesos with thousands separators.
///
/// ```
/// use mx_financing::format::currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(currency(dec!(1234567.891)), "$1,234,567.89");
/// assert_eq!(currency(dec!(-15)), "-$15.00");
/// ```
pub fn currency(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Formats a fraction as a percent rounded to two decimals (`0.16` → `16.00%`).
pub fn percent(fraction: Decimal) -> String {
    format!("{:.2}%", percent_value(fraction))
}

/// `fraction × 100`, rounded to two decimals.
pub fn percent_value(fraction: Decimal) -> Decimal {
    round_money(fraction.saturating_mul(dec!(100)))
}

/// `31 ene 2024`
pub fn human_date(date: NaiveDate) -> String {
    format!("{:02} {} {}", date.day(), MONTHS[date.month0() as usize], date.year())
}

/// `2024-01-31`
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
