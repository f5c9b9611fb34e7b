use std::io::{self, Write};

use clap::ValueEnum;
use rust_decimal::Decimal;
use tax_core::TaxBreakdown;

use crate::utils::{format_currency, format_percent};

const RULE_WIDTH: usize = 50;

/// When to print the per-bracket section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BreakdownMode {
    /// Only when income is at or below the breakdown limit.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub breakdown: BreakdownMode,
    pub breakdown_limit: Decimal,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            breakdown: BreakdownMode::Auto,
            breakdown_limit: Decimal::from(100_000),
        }
    }
}

impl ReportOptions {
    pub fn shows_breakdown(
        &self,
        income: Decimal,
    ) -> bool {
        match self.breakdown {
            BreakdownMode::Auto => income <= self.breakdown_limit,
            BreakdownMode::Always => true,
            BreakdownMode::Never => false,
        }
    }
}

/// Writes the summary block and, if enabled, one line per taxed bracket.
pub fn render_report<W: Write>(
    out: &mut W,
    breakdown: &TaxBreakdown,
    options: &ReportOptions,
) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Filing Status: {}", breakdown.filing_status.label())?;
    writeln!(
        out,
        "Taxable Income: {}",
        format_currency(breakdown.taxable_income)
    )?;
    writeln!(out, "Total Tax: {}", format_currency(breakdown.total_tax))?;
    writeln!(out, "{rule}")?;

    if !options.shows_breakdown(breakdown.taxable_income) || breakdown.slices.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Tax Breakdown:")?;
    writeln!(
        out,
        "This shows how different portions of your income are taxed at different rates."
    )?;
    for slice in &breakdown.slices {
        writeln!(
            out,
            "  {} - {}: {} = {}",
            format_currency(slice.lower),
            format_currency(slice.upper),
            format_percent(slice.rate),
            format_currency(slice.tax)
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::{FilingStatus, ProgressiveTax};

    use super::*;

    fn render(
        status: FilingStatus,
        income: Decimal,
        options: &ReportOptions,
    ) -> String {
        let breakdown = ProgressiveTax::federal_2009()
            .breakdown(status, income)
            .unwrap();
        let mut out = Vec::new();
        render_report(&mut out, &breakdown, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn summary_and_breakdown_below_limit() {
        let output = render(FilingStatus::Single, dec!(10000), &ReportOptions::default());

        let expected = "
==================================================
Filing Status: Single
Taxable Income: $10,000.00
Total Tax: $1,082.50
==================================================

Tax Breakdown:
This shows how different portions of your income are taxed at different rates.
  $0.00 - $8,350.00: 10% = $835.00
  $8,350.00 - $10,000.00: 15% = $247.50
";
        assert_eq!(output, expected);
    }

    #[test]
    fn auto_mode_hides_breakdown_above_limit() {
        let output = render(
            FilingStatus::Single,
            dec!(400000),
            &ReportOptions::default(),
        );

        assert!(output.contains("Total Tax: $117,683.50"));
        assert!(!output.contains("Tax Breakdown:"));
    }

    #[test]
    fn always_mode_shows_breakdown_above_limit() {
        let options = ReportOptions {
            breakdown: BreakdownMode::Always,
            ..ReportOptions::default()
        };

        let output = render(FilingStatus::Single, dec!(400000), &options);

        assert!(output.contains("  $372,950.00 - $400,000.00: 35% = $9,467.50"));
    }

    #[test]
    fn never_mode_hides_breakdown() {
        let options = ReportOptions {
            breakdown: BreakdownMode::Never,
            ..ReportOptions::default()
        };

        let output = render(FilingStatus::HeadOfHousehold, dec!(500), &options);

        assert!(!output.contains("Tax Breakdown:"));
    }

    #[test]
    fn zero_income_prints_no_breakdown_lines() {
        let output = render(FilingStatus::Single, dec!(0), &ReportOptions::default());

        assert!(output.contains("Total Tax: $0.00"));
        assert!(!output.contains("Tax Breakdown:"));
    }

    #[test]
    fn auto_mode_includes_income_at_limit() {
        let options = ReportOptions::default();

        assert!(options.shows_breakdown(dec!(100000)));
        assert!(!options.shows_breakdown(dec!(100000.01)));
    }
}
