//! Batch mode against an on-disk fixture file.
//!
//! Complements the unit tests in batch.rs (inline strings) by exercising the
//! read-from-disk and write-to-disk paths end to end.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_cli::app::run_batch;
use tax_cli::batch;
use tax_core::{FilingStatus, ProgressiveTax};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_returns.csv")
}

#[test]
fn test_load_fixture_file_succeeds() {
    let returns = batch::load_from_file(&fixture_path()).expect("fixture should load");

    assert_eq!(returns.len(), 7);
    assert_eq!(returns[4].filing_status, FilingStatus::MarriedFilingJointly);
    assert_eq!(returns[4].taxable_income, dec!(125000));
    assert_eq!(returns[5].filing_status, FilingStatus::MarriedFilingSeparately);
}

#[test]
fn test_fixture_results_match_known_totals() {
    let returns = batch::load_from_file(&fixture_path()).unwrap();
    let mut out = Vec::new();

    batch::write_results(&mut out, &returns, &ProgressiveTax::federal_2009()).unwrap();

    let text = String::from_utf8(out).unwrap();
    let totals: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|line| line.split(',').nth(2).unwrap())
        .collect();

    assert_eq!(
        totals,
        vec![
            "0.00",
            "835.00",
            "1082.50",
            "117683.50",
            "23625.00",
            "55181.00",
            "6227.50",
        ]
    );
}

#[test]
fn test_run_batch_writes_output_file() {
    let output = std::env::temp_dir().join(format!(
        "bracket-tax-batch-{}.csv",
        std::process::id()
    ));

    let written = run_batch(
        &fixture_path(),
        Some(&output),
        &ProgressiveTax::federal_2009(),
    )
    .expect("batch should succeed");

    let contents = std::fs::read_to_string(&output).unwrap();
    std::fs::remove_file(&output).ok();

    assert_eq!(written, 7);
    assert!(contents.starts_with(
        "filing_status,taxable_income,total_tax,marginal_rate,effective_rate\n"
    ));
    assert!(contents.contains("S,400000.00,117683.50,0.3500,0.2942\n"));
}

#[test]
fn test_run_batch_missing_file_is_an_error() {
    let result = run_batch(
        Path::new("/nonexistent/returns.csv"),
        None,
        &ProgressiveTax::federal_2009(),
    );

    assert!(result.is_err());
}
