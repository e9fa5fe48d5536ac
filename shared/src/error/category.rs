//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Account errors
/// - 2xxx: Permission errors
/// - 4xxx: Offering errors
/// - 5xxx: Ledger errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Account errors (1xxx)
    Account,
    /// Permission errors (2xxx)
    Permission,
    /// Offering errors (4xxx)
    Offering,
    /// Ledger errors (5xxx)
    Ledger,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Account,
            2000..3000 => Self::Permission,
            4000..5000 => Self::Offering,
            5000..6000 => Self::Ledger,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Account => "account",
            Self::Permission => "permission",
            Self::Offering => "offering",
            Self::Ledger => "ledger",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
