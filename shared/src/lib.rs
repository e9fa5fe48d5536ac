//! Shared types for the tiffin ledger
//!
//! Value types, data models, the unified error system and small utilities
//! used by the ledger service and by anything that talks to it.

pub mod error;
pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, ErrorKind};
pub use serde::{Deserialize, Serialize};
pub use types::{BusinessDate, DateParseError, MonthKey, Timestamp};
