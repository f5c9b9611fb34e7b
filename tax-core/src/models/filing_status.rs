use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a value does not name one of the four filing statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown filing status '{0}' (expected 0-3 or one of S, MFJ, MFS, HOH)")]
pub struct UnknownFilingStatus(pub String);

/// Taxpayer category selecting which bracket schedule applies.
///
/// The numeric index is the legacy menu code (0-3) shown to interactive users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    /// Every status, in menu order.
    pub fn all() -> &'static [FilingStatus] {
        &[
            Self::Single,
            Self::MarriedFilingJointly,
            Self::MarriedFilingSeparately,
            Self::HeadOfHousehold,
        ]
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Single => 0,
            Self::MarriedFilingJointly => 1,
            Self::MarriedFilingSeparately => 2,
            Self::HeadOfHousehold => 3,
        }
    }

    /// Converts a legacy numeric code.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFilingStatus`] for anything outside `0..=3`.
    pub fn from_index(index: i64) -> Result<Self, UnknownFilingStatus> {
        match index {
            0 => Ok(Self::Single),
            1 => Ok(Self::MarriedFilingJointly),
            2 => Ok(Self::MarriedFilingSeparately),
            3 => Ok(Self::HeadOfHousehold),
            other => Err(UnknownFilingStatus(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "S" => Some(Self::Single),
            "MFJ" => Some(Self::MarriedFilingJointly),
            "MFS" => Some(Self::MarriedFilingSeparately),
            "HOH" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
        }
    }
}

impl TryFrom<i64> for FilingStatus {
    type Error = UnknownFilingStatus;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

/// Accepts a short code (any case) or a legacy index.
impl FromStr for FilingStatus {
    type Err = UnknownFilingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(status) = Self::parse(&trimmed.to_ascii_uppercase()) {
            return Ok(status);
        }
        match trimmed.parse::<i64>() {
            Ok(index) => Self::from_index(index),
            Err(_) => Err(UnknownFilingStatus(trimmed.to_string())),
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
