//! Raw quote form fields and their coercion into a [`QuoteInput`].
//!
//! Fields hold exactly what was typed. Percents are literal (`16` means 16%),
//! blank or unreadable numbers count as zero, and a blank or unreadable date
//! falls back to today. The VAT percent and the days per period take their
//! configured defaults when left blank.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Settings;
use crate::format::percent_value;
use crate::quote::{QuoteInput, VatBase};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteForm {
    pub client: String,
    pub total: String,
    pub down_payment_percent: String,
    pub down_payment_amount: String,
    pub annual_rate_percent: String,
    pub months: String,
    pub first_payment: String,
    pub vat_percent: String,
    /// `total` or `interes`.
    pub vat_mode: String,
    pub days_per_period: String,
}

impl Default for QuoteForm {
    fn default() -> Self {
        Self {
            client: String::new(),
            total: String::new(),
            down_payment_percent: String::new(),
            down_payment_amount: String::new(),
            annual_rate_percent: String::new(),
            months: String::new(),
            first_payment: String::new(),
            vat_percent: "16".to_string(),
            vat_mode: "total".to_string(),
            days_per_period: "30".to_string(),
        }
    }
}

impl QuoteForm {
    /// Blank form prefilled from `settings`, with the first payment
    /// `first_payment_offset_days` after `today`.
    pub fn new(settings: &Settings, today: NaiveDate) -> Self {
        let first_payment = today + Duration::days(i64::from(settings.first_payment_offset_days));
        Self {
            first_payment: first_payment.format(DATE_FORMAT).to_string(),
            vat_percent: settings.default_vat_percent.normalize().to_string(),
            days_per_period: settings.default_days_per_period.to_string(),
            ..Self::default()
        }
    }

    /// Clears every field back to the blank form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Writes the down payment percent actually used back into the form.
    pub fn sync_down_payment_percent(&mut self, actual_fraction: Decimal) {
        self.down_payment_percent = format!("{:.2}", percent_value(actual_fraction));
    }

    /// Coerces the fields into a [`QuoteInput`]. Never fails; validation happens afterwards.
    pub fn to_input(&self, settings: &Settings, today: NaiveDate) -> QuoteInput {
        let vat_percent = if self.vat_percent.trim().is_empty() {
            settings.default_vat_percent
        } else {
            parse_decimal("vat_percent", &self.vat_percent)
        };
        let days_per_period = if self.days_per_period.trim().is_empty() {
            settings.default_days_per_period
        } else {
            parse_count("days_per_period", &self.days_per_period)
        };

        QuoteInput {
            client_name: self.client.trim().to_string(),
            total_amount: parse_decimal("total", &self.total),
            down_payment_percent: parse_decimal("down_payment_percent", &self.down_payment_percent) / dec!(100),
            down_payment_amount: parse_decimal("down_payment_amount", &self.down_payment_amount),
            annual_rate: parse_decimal("annual_rate_percent", &self.annual_rate_percent) / dec!(100),
            period_count: parse_count("months", &self.months),
            first_payment_date: parse_date(&self.first_payment).unwrap_or(today),
            vat_rate: vat_percent / dec!(100),
            vat_base: parse_vat_base(&self.vat_mode),
            days_per_period,
        }
    }
}

pub fn parse_vat_base(mode: &str) -> VatBase {
    match mode.trim().to_ascii_lowercase().as_str() {
        "interes" | "interés" | "interest" | "interest_only" => VatBase::InterestOnly,
        _ => VatBase::Total,
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn parse_decimal(field: &'static str, raw: &str) -> Decimal {
    let raw = raw.trim();
    if raw.is_empty() {
        return Decimal::ZERO;
    }
    raw.parse::<Decimal>().unwrap_or_else(|_| {
        warn!(field, value = raw, "unreadable number, using 0");
        Decimal::ZERO
    })
}

/// Whole part of a count field; negative or unreadable values become 0.
fn parse_count(field: &'static str, raw: &str) -> u32 {
    parse_decimal(field, raw).trunc().to_u32().unwrap_or(0)
}
