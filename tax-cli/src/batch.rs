//! CSV batch mode.
//!
//! ## Input
//!
//! Headers are matched by name; column order does not matter.
//!
//! | Column           | Type    | Notes                                        |
//! |------------------|---------|----------------------------------------------|
//! | `filing_status`  | string  | `S`, `MFJ`, `MFS`, `HOH` or a legacy `0`-`3` |
//! | `taxable_income` | decimal | Quote the cell if it uses `,` separators     |
//!
//! ```csv
//! filing_status,taxable_income
//! S,10000
//! 1,"125,000.00"
//! ```
//!
//! ## Output
//!
//! `filing_status,taxable_income,total_tax,marginal_rate,effective_rate`, with
//! amounts at two decimals and rates at four.
//!
//! A bad row fails the whole batch before anything is written.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::calculations::common::{round_half_up, round_rate};
use tax_core::{FilingStatus, ProgressiveTax, ProgressiveTaxError};
use thiserror::Error;
use tracing::{debug, info};

use crate::utils::parse_income;

#[derive(Debug, Error)]
pub enum BatchError {
    /// Structurally invalid CSV, a missing column, or a failed write.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `row` is 1-based, not counting the header.
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("row {row}: {source}")]
    Tax {
        row: usize,
        #[source]
        source: ProgressiveTaxError,
    },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    filing_status: String,
    taxable_income: String,
}

/// One validated input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxReturn {
    pub filing_status: FilingStatus,
    pub taxable_income: Decimal,
}

#[derive(Debug, Serialize)]
struct ResultRow {
    filing_status: &'static str,
    taxable_income: Decimal,
    total_tax: Decimal,
    marginal_rate: Decimal,
    effective_rate: Decimal,
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxReturn, BatchError> {
    let filing_status =
        row.filing_status
            .parse::<FilingStatus>()
            .map_err(|e| BatchError::InvalidRow {
                row: row_number,
                reason: e.to_string(),
            })?;
    let taxable_income =
        parse_income(&row.taxable_income).map_err(|e| BatchError::InvalidRow {
            row: row_number,
            reason: e.to_string(),
        })?;

    Ok(TaxReturn {
        filing_status,
        taxable_income,
    })
}

/// Reads and validates every row, in file order.
///
/// # Errors
///
/// * [`BatchError::Csv`] for malformed CSV or missing columns.
/// * [`BatchError::InvalidRow`] for the first row with a bad status, a bad
///   income, or the wrong number of fields.
pub fn read_returns<R: Read>(input: R) -> Result<Vec<TaxReturn>, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input);

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result.map_err(|e| row_error(e, idx + 1))?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Errors confined to one record carry its row number; header and
/// column problems stay as [`BatchError::Csv`].
fn row_error(
    err: csv::Error,
    row_number: usize,
) -> BatchError {
    let per_row = matches!(
        err.kind(),
        csv::ErrorKind::UnequalLengths { .. } | csv::ErrorKind::Utf8 { .. }
    );
    if per_row {
        BatchError::InvalidRow {
            row: row_number,
            reason: err.to_string(),
        }
    } else {
        BatchError::Csv(err)
    }
}

/// Convenience wrapper: open `path` and delegate to [`read_returns`].
pub fn load_from_file(path: &Path) -> Result<Vec<TaxReturn>, BatchError> {
    let file = File::open(path)?;
    let returns = read_returns(file)?;
    info!(path = %path.display(), rows = returns.len(), "loaded batch input");
    Ok(returns)
}

fn fixed(
    mut value: Decimal,
    scale: u32,
) -> Decimal {
    value.rescale(scale);
    value
}

/// Computes every return, then writes the results as CSV.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// [`BatchError::Tax`] if any return fails to compute; nothing is written in
/// that case.
pub fn write_results<W: Write>(
    output: W,
    returns: &[TaxReturn],
    calculator: &ProgressiveTax<'_>,
) -> Result<usize, BatchError> {
    let rows = returns
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let breakdown = calculator
                .breakdown(r.filing_status, r.taxable_income)
                .map_err(|source| BatchError::Tax {
                    row: idx + 1,
                    source,
                })?;

            Ok(ResultRow {
                filing_status: r.filing_status.as_str(),
                taxable_income: fixed(round_half_up(r.taxable_income), 2),
                total_tax: fixed(round_half_up(breakdown.total_tax), 2),
                marginal_rate: fixed(breakdown.marginal_rate().unwrap_or_default(), 4),
                effective_rate: fixed(round_rate(breakdown.effective_rate()), 4),
            })
        })
        .collect::<Result<Vec<_>, BatchError>>()?;

    let mut writer = csv::Writer::from_writer(output);
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(rows = rows.len(), "wrote batch results");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const MIXED_CSV: &str = "\
filing_status,taxable_income
S,10000
1,\"125,000.00\"
hoh, 0
";

    #[test]
    fn read_returns_accepts_codes_and_indexes() {
        let returns = read_returns(MIXED_CSV.as_bytes()).expect("should parse");

        assert_eq!(
            returns,
            vec![
                TaxReturn {
                    filing_status: FilingStatus::Single,
                    taxable_income: dec!(10000),
                },
                TaxReturn {
                    filing_status: FilingStatus::MarriedFilingJointly,
                    taxable_income: dec!(125000),
                },
                TaxReturn {
                    filing_status: FilingStatus::HeadOfHousehold,
                    taxable_income: dec!(0),
                },
            ]
        );
    }

    #[test]
    fn read_returns_reports_unknown_status_row() {
        let csv = "filing_status,taxable_income\nS,1\nQSS,2\n";

        match read_returns(csv.as_bytes()) {
            Err(BatchError::InvalidRow { row, reason }) => {
                assert_eq!(row, 2);
                assert!(reason.contains("QSS"));
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn read_returns_rejects_negative_income() {
        let csv = "filing_status,taxable_income\nS,-1\n";

        assert!(matches!(
            read_returns(csv.as_bytes()),
            Err(BatchError::InvalidRow { row: 1, .. })
        ));
    }

    #[test]
    fn read_returns_reports_row_with_extra_field() {
        let csv = "filing_status,taxable_income\nS,1\nMFJ,2,3\n";

        match read_returns(csv.as_bytes()) {
            Err(BatchError::InvalidRow { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn read_returns_rejects_income_beyond_maximum() {
        let csv = "filing_status,taxable_income\nS,10\nS,79228162514264337593543950335\n";

        match read_returns(csv.as_bytes()) {
            Err(BatchError::InvalidRow { row, reason }) => {
                assert_eq!(row, 2);
                assert!(reason.contains("exceeds the supported maximum"));
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn write_results_keeps_two_decimals_at_maximum_income() {
        let returns = read_returns("filing_status,taxable_income\nS,1000000000000000\n".as_bytes()).unwrap();
        let mut out = Vec::new();

        write_results(&mut out, &returns, &ProgressiveTax::federal_2009()).unwrap();

        // 117683.50 + (1e15 - 400000) * 0.35
        assert!(String::from_utf8(out)
            .unwrap()
            .ends_with("S,1000000000000000.00,349999999977683.50,0.3500,0.3500\n"));
    }

    #[test]
    fn read_returns_requires_income_column() {
        let csv = "filing_status\nS\n";

        assert!(matches!(
            read_returns(csv.as_bytes()),
            Err(BatchError::Csv(_))
        ));
    }

    #[test]
    fn write_results_formats_amounts_and_rates() {
        let returns = read_returns(MIXED_CSV.as_bytes()).unwrap();
        let mut out = Vec::new();

        let written = write_results(&mut out, &returns, &ProgressiveTax::federal_2009()).unwrap();

        assert_eq!(written, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
filing_status,taxable_income,total_tax,marginal_rate,effective_rate
S,10000.00,1082.50,0.1500,0.1083
MFJ,125000.00,23625.00,0.2500,0.1890
HOH,0.00,0.00,0.0000,0.0000
"
        );
    }
}
