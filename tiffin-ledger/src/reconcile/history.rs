//! User history (the bills page)

use std::collections::HashMap;

use shared::models::{AdhocEntry, History, LedgerEntry, LedgerEntryView, Offering};
use shared::{AppResult, MonthKey};

use super::ReconciliationEngine;
use crate::auth::{Actor, require_operator};
use crate::db::repository::{adhoc_entry, ledger_entry, offering};
use crate::utils::money::{Tally, to_f64};

/// Resolve each entry's offering and total both streams.
///
/// An entry whose offering was deleted keeps its frozen price and gets
/// `offering: None`.
pub fn assemble_history(entries: Vec<LedgerEntry>, offerings: Vec<Offering>, adhoc: Vec<AdhocEntry>) -> History {
    let by_id: HashMap<i64, Offering> = offerings.into_iter().map(|o| (o.id, o)).collect();

    let mut ledger = Tally::default();
    let mut extras = Tally::default();
    for entry in entries.iter().filter(|e| e.status.is_billable()) {
        ledger.add(entry.price);
    }
    for entry in &adhoc {
        extras.add(entry.price);
    }

    let views = entries
        .into_iter()
        .map(|entry| {
            let offering = by_id.get(&entry.offering_id).cloned();
            LedgerEntryView { entry, offering }
        })
        .collect();

    History {
        entries: views,
        adhoc,
        ledger_total: ledger.total(),
        adhoc_total: extras.total(),
        grand_total: to_f64(ledger.amount + extras.amount),
    }
}

impl ReconciliationEngine {
    /// Ledger entries (with offerings) and ad-hoc entries, newest first
    pub async fn build_history(&self, user_id: i64, month: Option<&MonthKey>) -> AppResult<History> {
        let entries = ledger_entry::find_by_user(&self.pool, user_id, month).await?;
        let offerings = offering::find_referenced_by_user(&self.pool, user_id, month).await?;
        let adhoc = adhoc_entry::find_by_user(&self.pool, user_id, month).await?;
        Ok(assemble_history(entries, offerings, adhoc))
    }

    /// Operator view of another user's history
    pub async fn user_history(&self, actor: Actor, user_id: i64, month: Option<&MonthKey>) -> AppResult<History> {
        require_operator(self.gate.as_ref(), actor).await?;
        self.build_history(user_id, month).await
    }
}
