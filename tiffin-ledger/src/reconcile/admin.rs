//! Operator dashboard aggregates

use shared::models::{AdminStats, EntryStatus, RosterRow};
use shared::AppResult;

use super::ReconciliationEngine;
use super::totals::{UserTally, tally_by_user};
use crate::auth::{Actor, require_operator};
use crate::db::repository::{account, adhoc_entry, ledger_entry, offering};

impl ReconciliationEngine {
    /// Platform-wide figures, recomputed from full scans on every call
    pub async fn admin_stats(&self, actor: Actor) -> AppResult<AdminStats> {
        require_operator(self.gate.as_ref(), actor).await?;
        let month = self.clock.current_month();
        let today = self.clock.today();

        let active_subscribers = account::count_active_subscribers(&self.pool).await?;
        let pending_approvals = account::count_pending_approvals(&self.pool).await?;
        let total_offerings = offering::count_all(&self.pool).await?;
        let pending_deliveries = ledger_entry::count_by_status(&self.pool, EntryStatus::Pending).await?;
        let today_offering = offering::find_by_date(&self.pool, &today).await?;

        let (billable, adhoc) = futures::try_join!(
            ledger_entry::find_billable(&self.pool),
            adhoc_entry::find_all(&self.pool),
        )?;
        let mut revenue = UserTally::default();
        for tally in tally_by_user(&billable, &adhoc, &month).into_values() {
            revenue.month.merge(tally.month);
            revenue.overall.merge(tally.overall);
        }

        Ok(AdminStats {
            month,
            active_subscribers,
            total_offerings,
            pending_deliveries,
            pending_approvals,
            today_published: today_offering.is_some(),
            today_offering,
            total_revenue: revenue.overall.total(),
            month_revenue: revenue.month.total(),
        })
    }

    /// Every subscriber with all-history and current-month bills, from a
    /// single pass over both entry streams
    pub async fn admin_user_roster(&self, actor: Actor) -> AppResult<Vec<RosterRow>> {
        require_operator(self.gate.as_ref(), actor).await?;
        let month = self.clock.current_month();

        let (subscribers, billable, adhoc) = futures::try_join!(
            account::find_subscribers(&self.pool),
            ledger_entry::find_billable(&self.pool),
            adhoc_entry::find_all(&self.pool),
        )?;
        let by_user = tally_by_user(&billable, &adhoc, &month);

        let rows = subscribers
            .into_iter()
            .map(|account| {
                let tally = by_user.get(&account.id).copied().unwrap_or_default();
                RosterRow {
                    account,
                    total_bill: tally.overall.total(),
                    this_month_total: tally.month.total(),
                }
            })
            .collect();
        Ok(rows)
    }
}
