use std::io;
use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;
use tracing::{debug, info};

use tax_cli::app::{self, Mode};
use tax_cli::logging::{LogConfig, init_logging};
use tax_cli::report::{BreakdownMode, ReportOptions};
use tax_cli::utils::parse_income;
use tax_core::{FEDERAL_2009, FilingStatus, ProgressiveTax};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive-bracket US federal income tax calculator (2009 schedules).
///
/// With no mode flags, asks for a filing status and taxable income on stdin.
#[derive(Debug, Parser)]
#[command(name = "bracket-tax", version, about)]
struct Cli {
    /// Filing status: S, MFJ, MFS, HOH, or the menu index 0-3.
    #[arg(short, long, requires = "income", conflicts_with = "batch")]
    status: Option<FilingStatus>,

    /// Taxable income, e.g. `85000` or `85,000.00`.
    #[arg(short, long, requires = "status", value_parser = parse_income)]
    income: Option<Decimal>,

    /// CSV file with `filing_status,taxable_income` rows to compute in bulk.
    #[arg(long)]
    batch: Option<PathBuf>,

    /// Where to write batch results (stdout when omitted).
    #[arg(short, long, requires = "batch")]
    output: Option<PathBuf>,

    /// When to print the per-bracket breakdown.
    #[arg(long, value_enum, default_value_t = BreakdownMode::Auto)]
    breakdown: BreakdownMode,

    /// Largest income that still gets a breakdown in `auto` mode.
    #[arg(long, default_value = "100000", value_parser = parse_income)]
    breakdown_limit: Decimal,

    /// Log filter (e.g. `debug` or `warn,tax_core=trace`); overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    /// Append log records to this file as well as stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig {
        level: cli.log_level,
        file: cli.log_file,
    })?;

    app::check_table(&FEDERAL_2009)?;
    let calculator = ProgressiveTax::default();

    let options = ReportOptions {
        breakdown: cli.breakdown,
        breakdown_limit: cli.breakdown_limit,
    };

    match Mode::resolve(cli.status, cli.income, cli.batch, cli.output) {
        Mode::Interactive => {
            debug!("starting interactive prompt");
            app::run_interactive(io::stdin().lock(), io::stdout().lock(), &calculator, &options)
        }
        Mode::OneShot { status, income } => {
            info!(status = status.as_str(), %income, "computing single return");
            app::run_one_shot(&mut io::stdout().lock(), &calculator, status, income, &options)
        }
        Mode::Batch { input, output } => {
            info!(input = %input.display(), "running batch");
            app::run_batch(&input, output.as_deref(), &calculator).map(|_| ())
        }
    }
}
