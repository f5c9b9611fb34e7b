use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One segment of a progressive schedule.
///
/// `upper_limit` is inclusive: income exactly at the limit is taxed in this
/// bracket. `None` marks the top, unbounded bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub const fn bounded(
        upper_limit: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_limit: Some(upper_limit),
            rate,
        }
    }

    pub const fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_limit: None,
            rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_limit.is_none()
    }
}
