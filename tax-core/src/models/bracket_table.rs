//! Constant bracket schedules, one per filing status.
//!
//! | Status | 10% to | 15% to | 25% to | 28% to | 33% to | 35% |
//! |--------|--------|--------|--------|--------|--------|-----|
//! | Single | 8,350  | 33,950 | 82,250  | 171,550 | 372,950 | above |
//! | MFJ    | 16,700 | 67,900 | 137,050 | 208,850 | 372,950 | above |
//! | MFS    | 8,350  | 33,950 | 68,525  | 104,425 | 186,475 | above |
//! | HOH    | 11,950 | 45,500 | 117,450 | 190,200 | 372,950 | above |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use super::{FilingStatus, TaxBracket};

/// A schedule that breaks the ordering rules checked by [`BracketTable::validate`].
///
/// `position` is the 1-based index of the offending bracket.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{status}: schedule has no brackets")]
    Empty { status: FilingStatus },

    #[error("{status}: bracket {position} is unbounded but is not the last bracket")]
    UnboundedNotLast {
        status: FilingStatus,
        position: usize,
    },

    #[error("{status}: last bracket must be unbounded")]
    MissingUnbounded { status: FilingStatus },

    #[error("{status}: bracket {position} upper limit {limit} does not increase")]
    LimitNotIncreasing {
        status: FilingStatus,
        position: usize,
        limit: Decimal,
    },

    #[error("{status}: bracket {position} rate {rate} is outside (0, 1]")]
    RateOutOfRange {
        status: FilingStatus,
        position: usize,
        rate: Decimal,
    },

    #[error("{status}: bracket {position} rate {rate} is lower than the bracket before it")]
    RateDecreasing {
        status: FilingStatus,
        position: usize,
        rate: Decimal,
    },
}

/// Ordered bracket schedules keyed by filing status.
///
/// The lookup is total: every [`FilingStatus`] variant owns a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketTable<'a> {
    tax_year: i32,
    single: &'a [TaxBracket],
    married_filing_jointly: &'a [TaxBracket],
    married_filing_separately: &'a [TaxBracket],
    head_of_household: &'a [TaxBracket],
}

impl<'a> BracketTable<'a> {
    pub const fn new(
        tax_year: i32,
        single: &'a [TaxBracket],
        married_filing_jointly: &'a [TaxBracket],
        married_filing_separately: &'a [TaxBracket],
        head_of_household: &'a [TaxBracket],
    ) -> Self {
        Self {
            tax_year,
            single,
            married_filing_jointly,
            married_filing_separately,
            head_of_household,
        }
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    /// Brackets for `status`, lowest first.
    pub fn schedule(
        &self,
        status: FilingStatus,
    ) -> &'a [TaxBracket] {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::MarriedFilingJointly => self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => self.married_filing_separately,
            FilingStatus::HeadOfHousehold => self.head_of_household,
        }
    }

    /// Checks every schedule: non-empty, limits strictly increasing, rates in
    /// (0, 1] and non-decreasing, exactly one unbounded bracket placed last.
    ///
    /// # Errors
    ///
    /// Returns the first [`ScheduleError`] found, scanning statuses in menu order.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for &status in FilingStatus::all() {
            validate_schedule(status, self.schedule(status))?;
        }
        Ok(())
    }
}

fn validate_schedule(
    status: FilingStatus,
    brackets: &[TaxBracket],
) -> Result<(), ScheduleError> {
    let Some(last) = brackets.last() else {
        return Err(ScheduleError::Empty { status });
    };
    if !last.is_unbounded() {
        return Err(ScheduleError::MissingUnbounded { status });
    }

    let mut previous_limit = Decimal::ZERO;
    let mut previous_rate = Decimal::ZERO;

    for (i, bracket) in brackets.iter().enumerate() {
        let position = i + 1;

        if bracket.rate <= Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(ScheduleError::RateOutOfRange {
                status,
                position,
                rate: bracket.rate,
            });
        }
        if bracket.rate < previous_rate {
            return Err(ScheduleError::RateDecreasing {
                status,
                position,
                rate: bracket.rate,
            });
        }
        previous_rate = bracket.rate;

        match bracket.upper_limit {
            None if position != brackets.len() => {
                return Err(ScheduleError::UnboundedNotLast { status, position });
            }
            None => {}
            Some(limit) if limit <= previous_limit => {
                return Err(ScheduleError::LimitNotIncreasing {
                    status,
                    position,
                    limit,
                });
            }
            Some(limit) => previous_limit = limit,
        }
    }

    Ok(())
}

const SINGLE_2009: [TaxBracket; 6] = [
    TaxBracket::bounded(dec!(8350), dec!(0.10)),
    TaxBracket::bounded(dec!(33950), dec!(0.15)),
    TaxBracket::bounded(dec!(82250), dec!(0.25)),
    TaxBracket::bounded(dec!(171550), dec!(0.28)),
    TaxBracket::bounded(dec!(372950), dec!(0.33)),
    TaxBracket::unbounded(dec!(0.35)),
];

const MARRIED_FILING_JOINTLY_2009: [TaxBracket; 6] = [
    TaxBracket::bounded(dec!(16700), dec!(0.10)),
    TaxBracket::bounded(dec!(67900), dec!(0.15)),
    TaxBracket::bounded(dec!(137050), dec!(0.25)),
    TaxBracket::bounded(dec!(208850), dec!(0.28)),
    TaxBracket::bounded(dec!(372950), dec!(0.33)),
    TaxBracket::unbounded(dec!(0.35)),
];

const MARRIED_FILING_SEPARATELY_2009: [TaxBracket; 6] = [
    TaxBracket::bounded(dec!(8350), dec!(0.10)),
    TaxBracket::bounded(dec!(33950), dec!(0.15)),
    TaxBracket::bounded(dec!(68525), dec!(0.25)),
    TaxBracket::bounded(dec!(104425), dec!(0.28)),
    TaxBracket::bounded(dec!(186475), dec!(0.33)),
    TaxBracket::unbounded(dec!(0.35)),
];

const HEAD_OF_HOUSEHOLD_2009: [TaxBracket; 6] = [
    TaxBracket::bounded(dec!(11950), dec!(0.10)),
    TaxBracket::bounded(dec!(45500), dec!(0.15)),
    TaxBracket::bounded(dec!(117450), dec!(0.25)),
    TaxBracket::bounded(dec!(190200), dec!(0.28)),
    TaxBracket::bounded(dec!(372950), dec!(0.33)),
    TaxBracket::unbounded(dec!(0.35)),
];

/// 2009 US federal rate schedules (X, Y-1, Y-2, Z).
pub static FEDERAL_2009: BracketTable<'static> = BracketTable::new(
    2009,
    &SINGLE_2009,
    &MARRIED_FILING_JOINTLY_2009,
    &MARRIED_FILING_SEPARATELY_2009,
    &HEAD_OF_HOUSEHOLD_2009,
);
