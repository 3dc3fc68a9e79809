//! souhrnka CLI.
//!
//! `report` prints the monthly audit report; `xml` additionally fills the
//! DP3 and SH templates for every month that needs filing.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use souhrnka::config::{ApiSettings, XmlSettings};
use souhrnka::core::*;
use souhrnka::fakturoid::FakturoidClient;
use souhrnka::template::write_statements;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "souhrnka")]
#[command(version, about = "DP3 / SH filings from Fakturoid invoices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the audit report for the requested months
    Report(PeriodArgs),

    /// Print the audit report and write DP3 / SH XML files
    Xml(PeriodArgs),
}

#[derive(Args, Clone)]
struct PeriodArgs {
    /// Target month (YYYY-MM); defaults to the current month
    #[arg(short, long)]
    month: Option<MonthKey>,

    /// Also report this many months before the target month
    #[arg(short, long, default_value_t = 0)]
    back: u32,

    /// Date deciding the reporting month (taxable_fulfillment_due or issued_on)
    #[arg(long, default_value = "taxable_fulfillment_due")]
    field: PeriodField,

    /// Client country treated as domestic and left out (empty disables)
    #[arg(long, default_value = DEFAULT_EXCLUDE_COUNTRY)]
    exclude_country: String,

    /// Read invoices from a JSON file instead of the API
    #[arg(long)]
    input: Option<PathBuf>,
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let today = Local::now().date_naive();
    match cli.command {
        Commands::Report(args) => {
            let source = open_source(&args)?;
            let params = run_params(&args, today);
            let aggregation = collect_month_data(source.as_ref(), &params)?;
            print!("{}", audit_report(&aggregation));
            Ok(())
        }
        Commands::Xml(args) => {
            let xml = XmlSettings::from_env(today)?;
            let source = open_source(&args)?;
            let params = run_params(&args, today);
            let aggregation = collect_month_data(source.as_ref(), &params)?;
            print!("{}", audit_report(&aggregation));

            // every month is decided before anything is written
            let plan = plan_filings(&aggregation)?;
            for (month, outcome) in &plan {
                match outcome {
                    FilingOutcome::NoInvoices => println!(
                        "[info] {month}: no EU invoices, DP3/SH not needed; no XML generated."
                    ),
                    FilingOutcome::ZeroTotal { count, total } => println!(
                        "[info] {month}: {count} invoice(s) sum to {total}, rounded total=0, DP3/SH not needed; no XML generated."
                    ),
                    FilingOutcome::File(_) => {}
                }
            }

            let filings: Vec<&Filing> = plan.iter().filter_map(|(_, o)| o.filing()).collect();
            let written = write_statements(&xml.output, &xml.filer, &filings)?;
            for path in &written {
                println!("[ok] wrote {}", path.display());
            }
            Ok(())
        }
    }
}

fn run_params(args: &PeriodArgs, today: NaiveDate) -> RunParams {
    let target = args.month.unwrap_or_else(|| {
        let current = MonthKey::of(today);
        println!("[info] No --month provided, using current month: {current}");
        println!("[usage] Specify a month explicitly: souhrnka xml --month YYYY-MM");
        if let Some(previous) = current.pred() {
            println!("[example] Previous month: souhrnka xml --month {previous}");
        }
        println!();
        current
    });
    RunParams {
        target,
        months_back: args.back,
        options: AggregateOptions {
            period_field: args.field,
            exclude_country: args.exclude_country.trim().to_uppercase(),
        },
    }
}

fn open_source(args: &PeriodArgs) -> Result<Box<dyn InvoiceSource>> {
    if let Some(path) = &args.input {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let invoices: Vec<InvoiceRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        tracing::info!(count = invoices.len(), path = %path.display(), "invoices loaded from file");
        return Ok(Box::new(StaticInvoices(invoices)));
    }

    let api = ApiSettings::from_env()?;
    let client = FakturoidClient::connect(&api.credentials, api.account_slug.as_deref())?;
    Ok(Box::new(client))
}
