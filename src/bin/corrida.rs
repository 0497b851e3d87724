use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use mx_financing::{ExportFormat, QuoteDocument, QuoteForm, Settings, calculate_schedule};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Fmt {
    Text,
    Csv,
    Json,
}

impl From<Fmt> for ExportFormat {
    fn from(fmt: Fmt) -> Self {
        match fmt {
            Fmt::Text => ExportFormat::Text,
            Fmt::Csv => ExportFormat::Csv,
            Fmt::Json => ExportFormat::Json,
        }
    }
}

/// Calculate the installment schedule of a financed sale.
///
/// Amounts and percents are read the way they are typed on the quote form:
/// percents are literal (16 means 16%) and blank fields take their defaults.
#[derive(Parser, Debug)]
#[command(name = "corrida")]
#[command(version, about, long_about = None)]
struct Args {
    /// Client name printed on the document
    #[arg(short, long, default_value = "")]
    client: String,

    /// Total price, VAT included
    #[arg(short, long)]
    total: String,

    /// Down payment as a percent of the total
    #[arg(long, default_value = "")]
    down_payment_percent: String,

    /// Down payment amount; overrides the percent when greater than 0
    #[arg(long, default_value = "")]
    down_payment_amount: String,

    /// Annual interest rate percent
    #[arg(short, long, default_value = "")]
    rate: String,

    /// Number of monthly installments
    #[arg(short, long)]
    months: String,

    /// First payment date (YYYY-MM-DD); defaults to the configured offset from today
    #[arg(long)]
    first_payment: Option<String>,

    /// VAT percent; defaults to the configured value
    #[arg(long)]
    vat_percent: Option<String>,

    /// VAT base: "total" or "interes"
    #[arg(long, default_value = "total")]
    vat_mode: String,

    /// Days per period for prorating the annual rate; defaults to the configured value
    #[arg(long)]
    days_per_period: Option<String>,

    /// Settings file (TOML)
    #[arg(long, default_value = "mx_financing.toml")]
    config: PathBuf,

    /// Output format written to stdout
    #[arg(short, long, value_enum, default_value = "text")]
    format: Fmt,

    /// Also save the document into this directory
    #[arg(short, long)]
    export_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let today = Local::now().date_naive();

    let settings = Settings::load(&args.config)
        .with_context(|| format!("Failed to load settings: {}", args.config.display()))?;

    let mut form = QuoteForm::new(&settings, today);
    form.client = args.client;
    form.total = args.total;
    form.down_payment_percent = args.down_payment_percent;
    form.down_payment_amount = args.down_payment_amount;
    form.annual_rate_percent = args.rate;
    form.months = args.months;
    form.vat_mode = args.vat_mode;
    if let Some(first_payment) = args.first_payment {
        form.first_payment = first_payment;
    }
    if let Some(vat_percent) = args.vat_percent {
        form.vat_percent = vat_percent;
    }
    if let Some(days) = args.days_per_period {
        form.days_per_period = days;
    }

    let input = form.to_input(&settings, today);
    let calculation = match calculate_schedule(&input) {
        Ok(calculation) => calculation,
        Err(error) if !error.violations().is_empty() => {
            for violation in error.violations() {
                eprintln!("{violation}");
            }
            std::process::exit(2);
        }
        Err(error) => return Err(error.into()),
    };

    let document = QuoteDocument::new(&calculation, &settings);
    document
        .write(io::stdout().lock(), args.format.into())
        .context("Failed to write schedule")?;

    if let Some(dir) = &args.export_dir {
        let path = document
            .save(dir, args.format.into(), today)
            .with_context(|| format!("Failed to export into: {}", dir.display()))?;
        eprintln!("Saved {}", path.display());
    }

    Ok(())
}
