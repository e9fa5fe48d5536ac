//! Month calendar

use std::collections::{BTreeMap, HashMap};

use shared::models::{AdhocEntry, CalendarDay, LedgerEntry, MonthCalendar, Offering};
use shared::{AppResult, BusinessDate, MonthKey};

use super::ReconciliationEngine;
use crate::db::repository::{adhoc_entry, ledger_entry, offering};

/// Merge the three facets by date. Only dates of `month` with at least
/// one facet appear.
pub fn merge_calendar(
    month: MonthKey,
    offerings: Vec<Offering>,
    entries: Vec<LedgerEntry>,
    adhoc: Vec<AdhocEntry>,
) -> MonthCalendar {
    let mut by_date: HashMap<BusinessDate, CalendarDay> = HashMap::new();
    for o in offerings {
        let date = o.date;
        by_date.entry(date).or_default().offering = Some(o);
    }
    for e in entries {
        let date = e.date;
        by_date.entry(date).or_default().entry = Some(e);
    }
    for a in adhoc {
        let date = a.date;
        by_date.entry(date).or_default().adhoc.push(a);
    }

    let days: BTreeMap<BusinessDate, CalendarDay> = month
        .days()
        .filter_map(|d| by_date.remove(&d).map(|day| (d, day)))
        .collect();
    MonthCalendar { month, days }
}

impl ReconciliationEngine {
    /// The user's month: offering, ledger entry and ad-hoc entries per date
    pub async fn build_calendar(&self, user_id: i64, month: &MonthKey) -> AppResult<MonthCalendar> {
        let offerings = offering::find_all(&self.pool, Some(month)).await?;
        let entries = ledger_entry::find_by_user(&self.pool, user_id, Some(month)).await?;
        let mut adhoc = adhoc_entry::find_by_user(&self.pool, user_id, Some(month)).await?;
        // Oldest first within a day
        adhoc.reverse();
        Ok(merge_calendar(*month, offerings, entries, adhoc))
    }
}
