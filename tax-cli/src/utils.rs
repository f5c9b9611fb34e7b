use rust_decimal::Decimal;
use tax_core::calculations::common::round_half_up;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Error returned by [`parse_income`].
#[derive(Debug, Error)]
pub enum IncomeError {
    #[error(transparent)]
    Parse(#[from] ParseDecimalError),

    #[error("income cannot be negative: {0}")]
    Negative(Decimal),

    #[error("income {0} exceeds the supported maximum of {MAX_INCOME_DOLLARS}")]
    TooLarge(Decimal),
}

/// Largest accepted income, in whole dollars.
///
/// Keeps every amount well inside `Decimal`'s 28 significant digits so
/// results still print with exactly two decimal places.
pub const MAX_INCOME_DOLLARS: i64 = 1_000_000_000_000_000;

/// Normalizes input for decimal parsing: trims whitespace, drops a leading `$`
/// and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    unsigned.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`) and a leading `$`.
/// Empty input is an error.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses a taxable income amount, rejecting negatives and amounts above
/// [`MAX_INCOME_DOLLARS`].
pub fn parse_income(s: &str) -> Result<Decimal, IncomeError> {
    let income = parse_decimal(s)?;
    if income < Decimal::ZERO {
        return Err(IncomeError::Negative(income));
    }
    if income > Decimal::from(MAX_INCOME_DOLLARS) {
        return Err(IncomeError::TooLarge(income));
    }
    Ok(income)
}

/// Formats an amount as dollars with thousands separators and two decimals,
/// e.g. `$117,683.50`.
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = round_half_up(amount);
    let negative = rounded < Decimal::ZERO;
    rounded = rounded.abs();
    rounded.rescale(2);

    let text = rounded.to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Formats a rate fraction as a percentage, e.g. `0.35` as `35%`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
