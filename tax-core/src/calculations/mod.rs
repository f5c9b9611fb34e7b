//! Tax calculations over the constant bracket schedules.
//!
//! [`progressive`] walks a filing status's brackets and taxes each slice of
//! income at its own marginal rate. [`common`] holds presentation rounding.

pub mod common;
pub mod progressive;

pub use progressive::{
    BracketSlice, ProgressiveTax, ProgressiveTaxError, TaxBreakdown, compute_tax,
    compute_tax_for_index,
};
