//! Stable error kinds
//!
//! Every [`ErrorCode`] maps to exactly one [`ErrorKind`]. The kind tells a
//! caller what to do next: fix the input, contact the operator, or give up on
//! the referenced record. No kind is retryable within the same request.

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Coarse error kind exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Referenced offering, entry or account is absent
    NotFound,
    /// Uniqueness violated on a non-upsert path
    Conflict,
    /// Missing field, negative price, malformed date or month
    InvalidInput,
    /// Inactive or unapproved account, or acting on someone else's record
    Forbidden,
    /// Storage or configuration failure
    Internal,
}

impl ErrorKind {
    /// Whether the caller can fix the request and resubmit it
    pub fn is_client_fixable(&self) -> bool {
        matches!(self, Self::InvalidInput)
    }
}

impl ErrorCode {
    /// Get the stable kind for this error code
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound
            | Self::AccountNotFound
            | Self::OfferingNotFound
            | Self::NoOfferingForDate
            | Self::LedgerEntryNotFound
            | Self::AdhocEntryNotFound => ErrorKind::NotFound,

            Self::AlreadyExists | Self::EmailAlreadyRegistered | Self::OfferingDateExists => {
                ErrorKind::Conflict
            }

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::OfferingInvalidPrice
            | Self::AdhocInvalidPrice => ErrorKind::InvalidInput,

            Self::AccountDisabled
            | Self::AccountPendingApproval
            | Self::OperatorSecretInvalid
            | Self::PermissionDenied
            | Self::OperatorRequired
            | Self::NotEntryOwner => ErrorKind::Forbidden,

            Self::Success
            | Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => ErrorKind::Internal,
        }
    }
}
