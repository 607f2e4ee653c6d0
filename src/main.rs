use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use rentcalc::application::session::{ConfigEdit, PricingSession};
use rentcalc::domain::ports::ProductSourceBox;
use rentcalc::domain::rates::RateConfig;
use rentcalc::infrastructure::file_source::FileProductSource;
use rentcalc::interfaces::csv::result_writer::ResultWriter;
use rentcalc::interfaces::csv::template::write_template;
use rentcalc::logging::{LogFormat, LoggingConfig, init_logging};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(author, version, about = "Rental plan pricing calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level filter; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Command {
    /// Price every product in a CSV, TSV or spreadsheet file
    Calculate {
        /// Input file (.csv, .tsv, .txt, .xlsx, .xlsm, .xls, .ods)
        input: PathBuf,
        #[command(flatten)]
        rates: RateArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Price a single product entered on the command line
    Quote {
        #[arg(long)]
        name: String,
        #[arg(long)]
        model: String,
        /// One-time price; thousands separators are allowed
        #[arg(long)]
        price: String,
        #[command(flatten)]
        rates: RateArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Write a sample input file
    Template {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the effective rate configuration as JSON
    Rates {
        #[command(flatten)]
        rates: RateArgs,
    },
}

#[derive(Args)]
struct RateArgs {
    /// JSON file with a full rate configuration
    #[arg(long = "rates", value_name = "FILE")]
    rates_file: Option<PathBuf>,

    /// Supply rate in percent
    #[arg(long, value_name = "PERCENT")]
    supply_rate: Option<String>,

    /// Discount rate for one period, e.g. 24=106
    #[arg(long = "discount", value_name = "PERIOD=PERCENT", value_parser = parse_period_rate)]
    discounts: Vec<(u32, String)>,

    /// Rental-company fee rate for one period, e.g. 24=26
    #[arg(long = "fee", value_name = "PERIOD=PERCENT", value_parser = parse_period_rate)]
    fees: Vec<(u32, String)>,

    /// Period, in months, to show and export
    #[arg(long)]
    period: Option<u32>,
}

#[derive(Args)]
struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Selected-period view
    Csv,
    /// Every period for every product
    Json,
}

fn parse_period_rate(s: &str) -> std::result::Result<(u32, String), String> {
    let (period, percent) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PERIOD=PERCENT, got {s:?}"))?;
    let period = period
        .trim()
        .parse()
        .map_err(|_| format!("invalid period {period:?}"))?;
    Ok((period, percent.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig {
        level: cli.log_level,
        format: cli.log_format,
    });

    match cli.command {
        Command::Calculate {
            input,
            rates,
            output,
        } => {
            let mut session = build_session(&rates)?;
            let source: ProductSourceBox =
                Box::new(FileProductSource::open(input).into_diagnostic()?);
            let ingested = source.load().await.into_diagnostic()?;
            if !ingested.skipped.is_empty() {
                warn!(
                    skipped = ingested.skipped.len(),
                    "some input rows were skipped"
                );
            }
            session.replace_products(ingested.products);
            export(&session, &output)?;
        }
        Command::Quote {
            name,
            model,
            price,
            rates,
            output,
        } => {
            let mut session = build_session(&rates)?;
            session
                .add_product(&name, &model, &price)
                .into_diagnostic()?;
            export(&session, &output)?;
        }
        Command::Template { output } => {
            let sink = open_sink(output.as_deref())?;
            write_template(sink).into_diagnostic()?;
        }
        Command::Rates { rates } => {
            let session = build_session(&rates)?;
            session.config().validate().into_diagnostic()?;
            let json = serde_json::to_string_pretty(session.config()).into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Defaults, then the rates file, then individual flags. Flags go through
/// the same validated edits an interactive user would make.
fn build_session(args: &RateArgs) -> Result<PricingSession> {
    let config = match &args.rates_file {
        Some(path) => RateConfig::from_json_file(path).into_diagnostic()?,
        None => RateConfig::default(),
    };
    let mut session = PricingSession::new(config);

    if let Some(text) = &args.supply_rate {
        let percent = ConfigEdit::parse_percent(text).into_diagnostic()?;
        session
            .apply(ConfigEdit::SupplyRate(percent))
            .into_diagnostic()?;
    }
    for (period, text) in &args.discounts {
        let percent = ConfigEdit::parse_percent(text).into_diagnostic()?;
        session
            .apply(ConfigEdit::DiscountRate {
                period: *period,
                percent,
            })
            .into_diagnostic()?;
    }
    for (period, text) in &args.fees {
        let percent = ConfigEdit::parse_percent(text).into_diagnostic()?;
        session
            .apply(ConfigEdit::FeeRate {
                period: *period,
                percent,
            })
            .into_diagnostic()?;
    }
    if let Some(period) = args.period {
        session
            .apply(ConfigEdit::SelectedPeriod(period))
            .into_diagnostic()?;
    }

    Ok(session)
}

fn export(session: &PricingSession, args: &OutputArgs) -> Result<()> {
    let calculation = session.recompute().into_diagnostic()?;
    if !calculation.skipped.is_empty() {
        warn!(
            skipped = calculation.skipped.len(),
            "some products were left out of the calculation"
        );
    }

    let writer = ResultWriter::new(open_sink(args.output.as_deref())?);
    match args.format {
        OutputFormat::Csv => writer.write_selected_csv(&calculation.products),
        OutputFormat::Json => writer.write_json(&calculation.products),
    }
    .into_diagnostic()
}

fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path).into_diagnostic()?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}
