//! Tiffin Ledger - daily meal subscription ledger
//!
//! # Architecture
//!
//! ```text
//! tiffin-ledger/src/
//! ├── core/        # Config, ServerState
//! ├── db/          # SQLite pool, migrations, repositories
//! ├── auth/        # Actor, AccountGate
//! ├── accounts/    # Registration, approval, cascade delete
//! ├── offerings/   # One canonical offering per date
//! ├── ledger/      # Per-user daily entries, ad-hoc entries
//! ├── reconcile/   # Totals, calendar, history, admin views
//! └── utils/       # Logger, clock, validation, money
//! ```

pub mod accounts;
pub mod auth;
pub mod core;
pub mod db;
pub mod ledger;
pub mod offerings;
pub mod reconcile;
pub mod utils;

// Re-export public types
pub use accounts::AccountService;
pub use auth::{AccountGate, Actor, SqliteAccountGate};
pub use core::{Config, ServerState};
pub use db::DbService;
pub use ledger::{AdhocService, LedgerService, TodayEntry};
pub use offerings::OfferingService;
pub use reconcile::ReconciliationEngine;
pub use utils::{AppError, AppResult, Clock, FixedClock, SystemClock};

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::warn!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
