//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes; dates are [`crate::BusinessDate`].

pub mod account;
pub mod adhoc_entry;
pub mod items;
pub mod ledger_entry;
pub mod offering;
pub mod report;

// Re-exports
pub use account::*;
pub use adhoc_entry::*;
pub use items::*;
pub use ledger_entry::*;
pub use offering::*;
pub use report::*;
