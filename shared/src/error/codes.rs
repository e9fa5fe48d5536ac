//! Unified error codes for the tiffin ledger
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Account errors
//! - 2xxx: Permission errors
//! - 4xxx: Offering errors
//! - 5xxx: Ledger errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can match on a
/// stable number instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Account ====================
    /// Account not found
    AccountNotFound = 1001,
    /// Email already registered
    EmailAlreadyRegistered = 1002,
    /// Account is deactivated
    AccountDisabled = 1003,
    /// Account is waiting for operator approval
    AccountPendingApproval = 1004,
    /// Operator registration secret mismatch
    OperatorSecretInvalid = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Operator role required
    OperatorRequired = 2002,
    /// Entry belongs to another account
    NotEntryOwner = 2003,

    // ==================== 4xxx: Offering ====================
    /// No offering for the given id
    OfferingNotFound = 4001,
    /// An offering already exists for the date
    OfferingDateExists = 4002,
    /// Offering price is negative or not finite
    OfferingInvalidPrice = 4003,
    /// No offering has been published for the date
    NoOfferingForDate = 4004,

    // ==================== 5xxx: Ledger ====================
    /// Ledger entry not found
    LedgerEntryNotFound = 5001,
    /// Ad-hoc entry not found
    AdhocEntryNotFound = 5002,
    /// Ad-hoc entry price is negative or not finite
    AdhocInvalidPrice = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Account
            ErrorCode::AccountNotFound => "Account not found",
            ErrorCode::EmailAlreadyRegistered => "Email already registered",
            ErrorCode::AccountDisabled => "Account deactivated. Contact the operator",
            ErrorCode::AccountPendingApproval => "Account is pending operator approval",
            ErrorCode::OperatorSecretInvalid => "Wrong operator secret key",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::OperatorRequired => "Operator access required",
            ErrorCode::NotEntryOwner => "Entry belongs to another account",

            // Offering
            ErrorCode::OfferingNotFound => "Offering not found",
            ErrorCode::OfferingDateExists => "An offering already exists for this date",
            ErrorCode::OfferingInvalidPrice => "Offering price is invalid",
            ErrorCode::NoOfferingForDate => "No offering published for this date",

            // Ledger
            ErrorCode::LedgerEntryNotFound => "Ledger entry not found",
            ErrorCode::AdhocEntryNotFound => "Ad-hoc entry not found",
            ErrorCode::AdhocInvalidPrice => "Ad-hoc entry price is invalid",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Account
            1001 => Ok(ErrorCode::AccountNotFound),
            1002 => Ok(ErrorCode::EmailAlreadyRegistered),
            1003 => Ok(ErrorCode::AccountDisabled),
            1004 => Ok(ErrorCode::AccountPendingApproval),
            1005 => Ok(ErrorCode::OperatorSecretInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::OperatorRequired),
            2003 => Ok(ErrorCode::NotEntryOwner),

            // Offering
            4001 => Ok(ErrorCode::OfferingNotFound),
            4002 => Ok(ErrorCode::OfferingDateExists),
            4003 => Ok(ErrorCode::OfferingInvalidPrice),
            4004 => Ok(ErrorCode::NoOfferingForDate),

            // Ledger
            5001 => Ok(ErrorCode::LedgerEntryNotFound),
            5002 => Ok(ErrorCode::AdhocEntryNotFound),
            5003 => Ok(ErrorCode::AdhocInvalidPrice),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
