//! Utility module
//!
//! - [`logger`] - tracing subscriber setup
//! - [`time`] - business clock
//! - [`validation`] - text and price checks shared by the services
//! - [`money`] - decimal sums over stored prices

pub mod logger;
pub mod money;
pub mod time;
pub mod validation;

pub use shared::{AppError, AppResult, ErrorCode};
pub use time::{Clock, FixedClock, SystemClock};
