//! Interactive question loop for a single return.
//!
//! Generic over the reader and writer so tests can drive it with byte slices.

use std::io::{self, BufRead, Write};

use rust_decimal::Decimal;
use tax_core::FilingStatus;
use thiserror::Error;
use tracing::{debug, warn};

use crate::utils::{IncomeError, parse_income};

pub const BANNER: &str = "=== US Federal Income Tax Calculator (2009) ===";

const STATUS_QUESTION: &str = "Enter filing status (0-3): ";
const INCOME_QUESTION: &str = "Enter taxable income: $";

const INVALID_NUMBER: &str = "Error: Please enter valid numbers.";
const STATUS_OUT_OF_RANGE: &str = "Error: Please enter a number between 0 and 3.";
const NEGATIVE_INCOME: &str = "Error: Income cannot be negative.";
const INCOME_TOO_LARGE: &str = "Error: Income is too large.";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input ended before a filing status and income were entered")]
    EndOfInput,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Prints the banner and status menu, then asks for a filing status and a
/// taxable income until both are valid.
///
/// Any rejected answer prints an error line and starts over at the filing
/// status question.
///
/// # Errors
///
/// [`PromptError::EndOfInput`] when `input` is exhausted first.
pub fn prompt_for_return<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> Result<(FilingStatus, Decimal), PromptError> {
    write_menu(&mut output)?;

    loop {
        let answer = ask(&mut input, &mut output, STATUS_QUESTION)?;
        let Ok(index) = answer.trim().parse::<i64>() else {
            warn!(answer = %answer.trim(), "filing status is not a number");
            writeln!(output, "{INVALID_NUMBER}")?;
            continue;
        };
        let Ok(status) = FilingStatus::from_index(index) else {
            warn!(index, "filing status out of range");
            writeln!(output, "{STATUS_OUT_OF_RANGE}")?;
            continue;
        };

        let answer = ask(&mut input, &mut output, INCOME_QUESTION)?;
        match parse_income(&answer) {
            Ok(income) => {
                debug!(status = status.as_str(), %income, "interactive input accepted");
                return Ok((status, income));
            }
            Err(IncomeError::Negative(_)) => writeln!(output, "{NEGATIVE_INCOME}")?,
            Err(IncomeError::TooLarge(_)) => writeln!(output, "{INCOME_TOO_LARGE}")?,
            Err(IncomeError::Parse(_)) => writeln!(output, "{INVALID_NUMBER}")?,
        }
    }
}

fn write_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "{BANNER}")?;
    writeln!(output, "Filing Status Options:")?;
    for status in FilingStatus::all() {
        writeln!(output, "  {} - {}", status.index(), menu_label(*status))?;
    }
    writeln!(output)
}

/// Menu wording; index 1 also covers a qualifying widow(er).
fn menu_label(status: FilingStatus) -> &'static str {
    match status {
        FilingStatus::MarriedFilingJointly => "Married Filing Jointly or Qualified Widow(er)",
        other => other.label(),
    }
}

/// Writes `question` and reads one line; end of input is an error.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<String, PromptError> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::EndOfInput);
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn run(script: &str) -> (Result<(FilingStatus, Decimal), PromptError>, String) {
        let mut output = Vec::new();
        let result = prompt_for_return(script.as_bytes(), &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn accepts_valid_answers_first_time() {
        let (result, output) = run("1\n85000\n");

        assert_eq!(
            result.unwrap(),
            (FilingStatus::MarriedFilingJointly, dec!(85000))
        );
        assert!(output.starts_with(BANNER));
        assert!(output.contains("  3 - Head of Household"));
    }

    #[test]
    fn menu_lists_every_status_in_index_order() {
        let (_, output) = run("");

        let menu: Vec<&str> = output.lines().skip(2).take(4).collect();
        assert_eq!(
            menu,
            [
                "  0 - Single",
                "  1 - Married Filing Jointly or Qualified Widow(er)",
                "  2 - Married Filing Separately",
                "  3 - Head of Household",
            ]
        );
    }

    #[test]
    fn oversized_income_restarts_from_status() {
        let (result, output) = run("0
79228162514264337593543950335
0
10
");

        assert_eq!(result.unwrap(), (FilingStatus::Single, dec!(10)));
        assert!(output.contains(INCOME_TOO_LARGE));
    }

    #[test]
    fn rejects_out_of_range_status_and_asks_again() {
        let (result, output) = run("4\n0\n100\n");

        assert_eq!(result.unwrap(), (FilingStatus::Single, dec!(100)));
        assert!(output.contains(STATUS_OUT_OF_RANGE));
    }

    #[test]
    fn rejects_non_numeric_status() {
        let (result, output) = run("single\n2\n1,500.25\n");

        assert_eq!(
            result.unwrap(),
            (FilingStatus::MarriedFilingSeparately, dec!(1500.25))
        );
        assert!(output.contains(INVALID_NUMBER));
    }

    #[test]
    fn negative_income_restarts_from_status() {
        let (result, output) = run("0\n-10\n3\n20000\n");

        assert_eq!(result.unwrap(), (FilingStatus::HeadOfHousehold, dec!(20000)));
        assert!(output.contains(NEGATIVE_INCOME));
        assert_eq!(output.matches(STATUS_QUESTION).count(), 2);
    }

    #[test]
    fn unparseable_income_is_reported() {
        let (result, output) = run("0\nlots\n0\n10\n");

        assert_eq!(result.unwrap(), (FilingStatus::Single, dec!(10)));
        assert!(output.contains(INVALID_NUMBER));
    }

    #[test]
    fn end_of_input_is_an_error() {
        let (result, _) = run("0\n");

        assert!(matches!(result, Err(PromptError::EndOfInput)));
    }
}
