mod bracket_table;
mod filing_status;
mod tax_bracket;

pub use bracket_table::{BracketTable, FEDERAL_2009, ScheduleError};
pub use filing_status::{FilingStatus, UnknownFilingStatus};
pub use tax_bracket::TaxBracket;
