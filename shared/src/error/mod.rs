//! Unified error system for the tiffin ledger
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`ErrorKind`]: The stable per-request kind a client branches on
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Account errors
//! - 2xxx: Permission errors
//! - 4xxx: Offering errors
//! - 5xxx: Ledger errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorKind, ApiResponse};
//!
//! let err = AppError::with_message(ErrorCode::LedgerEntryNotFound, "No entry for 2024-03-01");
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//!
//! let err = AppError::validation("Title is required").with_detail("field", "title");
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(2));
//! ```

mod category;
mod codes;
mod kind;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use kind::ErrorKind;
pub use types::{ApiResponse, AppError, AppResult};
