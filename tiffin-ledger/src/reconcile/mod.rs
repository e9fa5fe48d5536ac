//! Reconciliation Engine
//!
//! Merges the two independently keyed streams, ledger entries (one per
//! user and date) and ad-hoc entries (many per user and date), into totals,
//! calendars and histories. Every view is recomputed from storage on each
//! call; nothing is cached or counted incrementally.
//!
//! Billing rule used everywhere: ledger entries count unless skipped,
//! ad-hoc entries always count.

pub mod admin;
pub mod calendar;
pub mod history;
pub mod totals;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::AccountGate;
use crate::utils::Clock;

#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    pool: SqlitePool,
    gate: Arc<dyn AccountGate>,
    clock: Arc<dyn Clock>,
}

impl ReconciliationEngine {
    pub fn new(pool: SqlitePool, gate: Arc<dyn AccountGate>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, gate, clock }
    }
}
