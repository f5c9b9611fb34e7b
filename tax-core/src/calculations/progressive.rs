//! Progressive bracket tax.
//!
//! Each bracket taxes only the part of income that falls between the previous
//! bracket's upper limit and its own, at its own rate. Upper limits are
//! inclusive, so income sitting exactly on a boundary is taxed entirely in the
//! lower bracket.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{FilingStatus, compute_tax};
//!
//! // 8,350 at 10% plus 1,650 at 15%
//! let tax = compute_tax(FilingStatus::Single, dec!(10000)).unwrap();
//!
//! assert_eq!(tax, dec!(1082.50));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::models::{BracketTable, FEDERAL_2009, FilingStatus, UnknownFilingStatus};

/// Errors that can occur while computing progressive tax.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProgressiveTaxError {
    /// The filing status is not one of the four known variants.
    #[error(transparent)]
    UnknownFilingStatus(#[from] UnknownFilingStatus),

    /// Income below zero is rejected rather than clamped.
    #[error("income cannot be negative: {0}")]
    NegativeIncome(Decimal),

    /// The table has no brackets for the filing status.
    #[error("no tax brackets provided for {0}")]
    NoTaxBrackets(FilingStatus),

    /// The schedule ended before all income was taxed (no unbounded bracket).
    #[error("no tax bracket found for taxable income {0}")]
    NoMatchingBracket(Decimal),
}

/// The part of income taxed inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketSlice {
    /// Income already taxed by lower brackets.
    pub lower: Decimal,
    /// `lower + taxable_amount`.
    pub upper: Decimal,
    pub rate: Decimal,
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

/// Per-bracket view of one calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBreakdown {
    pub filing_status: FilingStatus,
    pub taxable_income: Decimal,
    /// Only brackets that tax a positive amount, lowest first.
    pub slices: Vec<BracketSlice>,
    pub total_tax: Decimal,
}

impl TaxBreakdown {
    /// Rate applied to the last dollar of income, `None` when nothing is taxed.
    pub fn marginal_rate(&self) -> Option<Decimal> {
        self.slices.last().map(|slice| slice.rate)
    }

    /// Total tax as a fraction of income; zero for zero income.
    pub fn effective_rate(&self) -> Decimal {
        if self.taxable_income.is_zero() {
            Decimal::ZERO
        } else {
            self.total_tax / self.taxable_income
        }
    }
}

/// Calculator over a [`BracketTable`].
///
/// Holds no state besides the borrowed table, so one instance can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct ProgressiveTax<'a> {
    table: &'a BracketTable<'a>,
}

impl ProgressiveTax<'static> {
    /// Calculator over the 2009 federal schedules.
    pub fn federal_2009() -> Self {
        Self::new(&FEDERAL_2009)
    }
}

impl Default for ProgressiveTax<'static> {
    fn default() -> Self {
        Self::federal_2009()
    }
}

impl<'a> ProgressiveTax<'a> {
    pub fn new(table: &'a BracketTable<'a>) -> Self {
        Self { table }
    }

    /// Computes the exact (unrounded) tax owed on `income`.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressiveTaxError`] if:
    /// - `income` is negative
    /// - the schedule for `status` is empty
    /// - the schedule runs out of brackets before `income` is fully taxed
    pub fn compute_tax(
        &self,
        status: FilingStatus,
        income: Decimal,
    ) -> Result<Decimal, ProgressiveTaxError> {
        let total_tax: Decimal = self
            .slices(status, income)?
            .iter()
            .map(|slice| slice.tax)
            .sum();

        debug!(status = status.as_str(), %income, %total_tax, "computed progressive tax");
        Ok(total_tax)
    }

    /// Same calculation as [`compute_tax`](Self::compute_tax), keeping each
    /// bracket's contribution.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute_tax`](Self::compute_tax).
    pub fn breakdown(
        &self,
        status: FilingStatus,
        income: Decimal,
    ) -> Result<TaxBreakdown, ProgressiveTaxError> {
        let slices = self.slices(status, income)?;
        let total_tax = slices.iter().map(|slice| slice.tax).sum();

        Ok(TaxBreakdown {
            filing_status: status,
            taxable_income: income,
            slices,
            total_tax,
        })
    }

    /// Walks the schedule lowest bracket first, stopping once income is used up.
    fn slices(
        &self,
        status: FilingStatus,
        income: Decimal,
    ) -> Result<Vec<BracketSlice>, ProgressiveTaxError> {
        if income.is_sign_negative() && !income.is_zero() {
            return Err(ProgressiveTaxError::NegativeIncome(income));
        }

        let brackets = self.table.schedule(status);
        if brackets.is_empty() {
            return Err(ProgressiveTaxError::NoTaxBrackets(status));
        }

        let mut slices = Vec::with_capacity(brackets.len());
        let mut previous_limit = Decimal::ZERO;

        for bracket in brackets {
            if income <= previous_limit {
                return Ok(slices);
            }

            let cap = match bracket.upper_limit {
                Some(limit) if income > limit => limit,
                _ => income,
            };

            let taxable_amount = cap - previous_limit;
            if taxable_amount > Decimal::ZERO {
                slices.push(BracketSlice {
                    lower: previous_limit,
                    upper: cap,
                    rate: bracket.rate,
                    taxable_amount,
                    tax: taxable_amount * bracket.rate,
                });
            }

            if cap == income {
                return Ok(slices);
            }
            previous_limit = cap;
        }

        if income <= previous_limit {
            Ok(slices)
        } else {
            Err(ProgressiveTaxError::NoMatchingBracket(income))
        }
    }
}

/// Computes tax on `income` against the 2009 federal schedules.
///
/// # Errors
///
/// Returns [`ProgressiveTaxError::NegativeIncome`] for negative income.
pub fn compute_tax(
    status: FilingStatus,
    income: Decimal,
) -> Result<Decimal, ProgressiveTaxError> {
    ProgressiveTax::federal_2009().compute_tax(status, income)
}

/// Like [`compute_tax`], for callers holding the legacy numeric status (0-3).
///
/// # Errors
///
/// Returns [`ProgressiveTaxError::UnknownFilingStatus`] when `index` is outside
/// `0..=3`, otherwise the same conditions as [`compute_tax`].
pub fn compute_tax_for_index(
    index: i64,
    income: Decimal,
) -> Result<Decimal, ProgressiveTaxError> {
    let status = FilingStatus::from_index(index)?;
    compute_tax(status, income)
}
