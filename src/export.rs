//! Printable and machine-readable renditions of a calculated quote.
//!
//! A [`QuoteDocument`] pairs a [`Calculation`] with the [`Settings`] that brand
//! it. It renders a header block (client, totals, rate, VAT mode) followed by
//! one line per installment, and saves the result under a file name derived
//! from the client name and the export date.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::Calculation;
use crate::config::Settings;
use crate::error::Result;
use crate::format::{currency, human_date, iso_date, percent};

pub const TITLE: &str = "CORRIDA DE FINANCIAMIENTO";

pub const TABLE_HEADER: [&str; 8] = [
    "#",
    "Fecha",
    "Saldo inicial (sin IVA)",
    "Abono capital",
    "Interés",
    "IVA",
    "Pago",
    "Saldo final",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Aligned plain-text document, meant for printing.
    Text,
    /// Installment table only, with unformatted amounts.
    Csv,
    /// The whole calculation.
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Serialize)]
struct CsvRow {
    period: u32,
    payment_date: String,
    opening_balance: String,
    principal: String,
    interest: String,
    vat: String,
    payment: String,
    closing_balance: String,
}

pub struct QuoteDocument<'a> {
    calculation: &'a Calculation,
    settings: &'a Settings,
}

impl<'a> QuoteDocument<'a> {
    pub fn new(calculation: &'a Calculation, settings: &'a Settings) -> Self {
        Self { calculation, settings }
    }

    pub fn header_lines(&self) -> Vec<String> {
        let Calculation { input, quote, schedule } = self.calculation;
        let client = if input.client_name.is_empty() { "—" } else { input.client_name.as_str() };

        vec![
            format!("Cliente: {client}"),
            format!("Monto total (con IVA): {}", currency(input.total_amount)),
            format!(
                "Enganche: {} ({})",
                currency(quote.down_payment),
                percent(quote.down_payment_percent_actual)
            ),
            format!("Monto a financiar (con IVA): {}", currency(quote.financed_inclusive)),
            format!("Monto a financiar (sin IVA): {}", currency(quote.financed_exclusive)),
            format!(
                "Tasa anual: {}  ·  Días/periodo: {} (base 360)",
                percent(input.annual_rate),
                input.days_per_period
            ),
            format!(
                "Meses: {}  ·  Primer pago: {}",
                input.period_count,
                human_date(input.first_payment_date)
            ),
            format!(
                "IVA: {}  ·  Modo: {}",
                percent(input.vat_rate),
                input.vat_base.description()
            ),
            format!("Mensualidad aprox.: {}", currency(schedule.first_period_payment)),
            format!(
                "Monto final financiado (suma de pagos): {}",
                currency(schedule.total_payments_sum)
            ),
        ]
    }

    /// Installments as display strings, in [`TABLE_HEADER`] order.
    pub fn table_rows(&self) -> Vec<[String; 8]> {
        self.calculation
            .schedule
            .rows
            .iter()
            .map(|row| {
                [
                    row.period_index.to_string(),
                    human_date(row.payment_date),
                    currency(row.opening_balance),
                    currency(row.principal_portion),
                    currency(row.interest_portion),
                    currency(row.vat_portion),
                    currency(row.total_payment),
                    currency(row.closing_balance),
                ]
            })
            .collect()
    }

    pub fn write_text<W: Write>(&self, mut w: W) -> Result<()> {
        writeln!(w, "{}", self.settings.company_name)?;
        writeln!(w, "{TITLE}")?;
        writeln!(w)?;
        for line in self.header_lines() {
            writeln!(w, "{line}")?;
        }
        writeln!(w)?;
        write_table(&mut w, &self.table_rows())?;
        w.flush()?;
        Ok(())
    }

    pub fn write_csv<W: Write>(&self, w: W) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(w);
        for row in &self.calculation.schedule.rows {
            wrt.serialize(CsvRow {
                period: row.period_index,
                payment_date: iso_date(row.payment_date),
                opening_balance: plain_amount(row.opening_balance),
                principal: plain_amount(row.principal_portion),
                interest: plain_amount(row.interest_portion),
                vat: plain_amount(row.vat_portion),
                payment: plain_amount(row.total_payment),
                closing_balance: plain_amount(row.closing_balance),
            })?;
        }
        wrt.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, w: W) -> Result<()> {
        serde_json::to_writer_pretty(w, self.calculation)?;
        Ok(())
    }

    pub fn write<W: Write>(&self, w: W, format: ExportFormat) -> Result<()> {
        match format {
            ExportFormat::Text => self.write_text(w),
            ExportFormat::Csv => self.write_csv(w),
            ExportFormat::Json => self.write_json(w),
        }
    }

    /// Writes the document into `dir` and returns the created path.
    pub fn save(&self, dir: &Path, format: ExportFormat, today: NaiveDate) -> Result<PathBuf> {
        let path = dir.join(file_name(&self.calculation.input.client_name, today, format));
        let file = File::create(&path)?;
        self.write(BufWriter::new(file), format)?;
        info!(path = %path.display(), "exported quote");
        Ok(path)
    }
}

/// `Corrida_<client>_<YYYY-MM-DD>.<ext>`, keeping only ASCII word characters,
/// dashes and spaces of the client name, with spaces turned into underscores.
///
/// ```
/// use chrono::NaiveDate;
/// use mx_financing::export::{ExportFormat, file_name};
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
/// assert_eq!(file_name("Ana  María López", date, ExportFormat::Text), "Corrida_Ana_Mara_Lpez_2024-05-10.txt");
/// ```
pub fn file_name(client_name: &str, date: NaiveDate, format: ExportFormat) -> String {
    let kept: String = client_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect();
    let safe = kept.split_whitespace().collect::<Vec<_>>().join("_");
    let safe = if safe.is_empty() { "cliente".to_string() } else { safe };

    format!("Corrida_{safe}_{}.{}", iso_date(date), format.extension())
}

fn plain_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn write_table<W: Write>(w: &mut W, rows: &[[String; 8]]) -> std::io::Result<()> {
    let mut widths = TABLE_HEADER.map(|title| title.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = TABLE_HEADER.map(str::to_string);
    for row in std::iter::once(&header).chain(rows) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                let pad = width.saturating_sub(cell.chars().count());
                // Date column reads left to right, amounts line up on the right.
                if i == 1 {
                    format!("{cell}{}", " ".repeat(pad))
                } else {
                    format!("{}{cell}", " ".repeat(pad))
                }
            })
            .collect();
        writeln!(w, "{}", cells.join("  ").trim_end())?;
    }
    Ok(())
}
