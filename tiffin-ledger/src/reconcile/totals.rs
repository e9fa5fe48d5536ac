//! Billing totals

use std::collections::HashMap;

use shared::models::{AdhocEntry, BillTotals, LedgerEntry};
use shared::{AppResult, BusinessDate, MonthKey};

use super::ReconciliationEngine;
use crate::db::repository::{adhoc_entry, ledger_entry};
use crate::utils::money::Tally;

/// Month and all-history tallies for one user
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UserTally {
    pub month: Tally,
    pub overall: Tally,
}

impl UserTally {
    fn add(&mut self, date: &BusinessDate, price: f64, month: &MonthKey) {
        self.overall.add(price);
        if month.contains(date) {
            self.month.add(price);
        }
    }

    pub fn into_totals(self, month: MonthKey) -> BillTotals {
        BillTotals {
            month,
            monthly_total: self.month.total(),
            overall_total: self.overall.total(),
            monthly_count: self.month.count,
            overall_count: self.overall.count,
        }
    }
}

/// Tally one user's entries. Skipped ledger entries are left out.
pub fn tally_user(entries: &[LedgerEntry], adhoc: &[AdhocEntry], month: &MonthKey) -> UserTally {
    let mut tally = UserTally::default();
    for entry in entries.iter().filter(|e| e.status.is_billable()) {
        tally.add(&entry.date, entry.price, month);
    }
    for entry in adhoc {
        tally.add(&entry.date, entry.price, month);
    }
    tally
}

/// Tally every user in one pass over both streams, grouped by `user_id`
pub fn tally_by_user(
    entries: &[LedgerEntry],
    adhoc: &[AdhocEntry],
    month: &MonthKey,
) -> HashMap<i64, UserTally> {
    let mut by_user: HashMap<i64, UserTally> = HashMap::new();
    for entry in entries.iter().filter(|e| e.status.is_billable()) {
        by_user
            .entry(entry.user_id)
            .or_default()
            .add(&entry.date, entry.price, month);
    }
    for entry in adhoc {
        by_user
            .entry(entry.user_id)
            .or_default()
            .add(&entry.date, entry.price, month);
    }
    by_user
}

impl ReconciliationEngine {
    /// Totals for one user. Monthly figures cover `month` (the clock's
    /// current month when `None`); overall figures cover all history.
    pub async fn compute_total(&self, user_id: i64, month: Option<&MonthKey>) -> AppResult<BillTotals> {
        let month = month.copied().unwrap_or_else(|| self.clock.current_month());
        let entries = ledger_entry::find_by_user(&self.pool, user_id, None).await?;
        let adhoc = adhoc_entry::find_by_user(&self.pool, user_id, None).await?;
        Ok(tally_user(&entries, &adhoc, &month).into_totals(month))
    }
}
