//! Defaults and branding for quote forms and exported documents.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;

/// Settings read from a TOML file. Missing keys keep their defaults.
///
/// ```toml
/// company_name = "Jardines de Juan Pablo"
/// default_vat_percent = 16
/// default_days_per_period = 30
/// first_payment_offset_days = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Printed at the top of exported documents.
    pub company_name: String,
    /// VAT percent used when the form leaves it empty.
    pub default_vat_percent: Decimal,
    /// Days per period used when the form leaves it empty.
    pub default_days_per_period: u32,
    /// Days from today to the first payment when no date is given.
    pub first_payment_offset_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: "Jardines de Juan Pablo".to_string(),
            default_vat_percent: dec!(16),
            default_days_per_period: 30,
            first_payment_offset_days: 30,
        }
    }
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads settings from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), company = %settings.company_name, "loaded settings");
        Ok(settings)
    }
}
