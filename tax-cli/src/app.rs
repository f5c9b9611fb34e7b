use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tax_core::{BracketTable, FilingStatus, ProgressiveTax};
use tracing::{debug, info};

use crate::batch;
use crate::prompt::prompt_for_return;
use crate::report::{ReportOptions, render_report};

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Ask for a status and income on stdin.
    Interactive,
    /// Status and income given on the command line.
    OneShot {
        status: FilingStatus,
        income: Decimal,
    },
    /// Compute every row of a CSV file.
    Batch {
        input: PathBuf,
        output: Option<PathBuf>,
    },
}

impl Mode {
    /// Batch wins when a file is given; otherwise one-shot needs both values.
    pub fn resolve(
        status: Option<FilingStatus>,
        income: Option<Decimal>,
        batch: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Self {
        match (batch, status, income) {
            (Some(input), _, _) => Mode::Batch { input, output },
            (None, Some(status), Some(income)) => Mode::OneShot { status, income },
            _ => Mode::Interactive,
        }
    }
}

/// Checks the schedules once before any calculation runs.
pub fn check_table(table: &BracketTable<'_>) -> Result<()> {
    table.validate().with_context(|| {
        format!("{} bracket table failed validation", table.tax_year())
    })?;
    debug!(tax_year = table.tax_year(), "bracket table validated");
    Ok(())
}

/// Computes one return and writes the report.
pub fn run_one_shot<W: Write>(
    out: &mut W,
    calculator: &ProgressiveTax<'_>,
    status: FilingStatus,
    income: Decimal,
    options: &ReportOptions,
) -> Result<()> {
    let breakdown = calculator
        .breakdown(status, income)
        .with_context(|| format!("failed to compute tax for {status} on {income}"))?;
    render_report(out, &breakdown, options).context("failed to write report")?;
    Ok(())
}

/// Prompts until a valid return is entered, then reports it.
pub fn run_interactive<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    calculator: &ProgressiveTax<'_>,
    options: &ReportOptions,
) -> Result<()> {
    let (status, income) = prompt_for_return(input, &mut output)?;
    run_one_shot(&mut output, calculator, status, income, options)
}

/// Reads `input`, computes every row and writes CSV to `output` or stdout.
///
/// Returns the number of rows written.
pub fn run_batch(
    input: &Path,
    output: Option<&Path>,
    calculator: &ProgressiveTax<'_>,
) -> Result<usize> {
    let returns = batch::load_from_file(input)
        .with_context(|| format!("failed to read batch input: {}", input.display()))?;

    let written = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create: {}", path.display()))?;
            batch::write_results(BufWriter::new(file), &returns, calculator)
        }
        None => batch::write_results(io::stdout().lock(), &returns, calculator),
    }
    .context("failed to write batch results")?;

    info!(rows = written, "batch complete");
    Ok(written)
}
