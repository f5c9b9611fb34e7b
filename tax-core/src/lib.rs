pub mod calculations;
pub mod models;

pub use calculations::{ProgressiveTax, ProgressiveTaxError, TaxBreakdown, compute_tax};
pub use models::*;
