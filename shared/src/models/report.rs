//! Reconciliation views
//!
//! Read models produced by merging offerings, ledger entries and ad-hoc
//! entries. Nothing here is persisted.

use super::{Account, AdhocEntry, LedgerEntry, LedgerEntryView, Offering};
use crate::types::{BusinessDate, MonthKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Billing totals for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillTotals {
    pub month: MonthKey,
    pub monthly_total: f64,
    pub overall_total: f64,
    /// Billable entries in the month (ledger + ad-hoc)
    pub monthly_count: i64,
    /// Billable entries across all history (ledger + ad-hoc)
    pub overall_count: i64,
}

/// Facets present on one calendar date
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarDay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offering: Option<Offering>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<LedgerEntry>,
    #[serde(default)]
    pub adhoc: Vec<AdhocEntry>,
}

/// Sparse month calendar; only dates with at least one facet are present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthCalendar {
    pub month: MonthKey,
    pub days: BTreeMap<BusinessDate, CalendarDay>,
}

/// Ledger and ad-hoc history for one user, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    pub entries: Vec<LedgerEntryView>,
    pub adhoc: Vec<AdhocEntry>,
    /// Non-skipped ledger entries
    pub ledger_total: f64,
    /// All ad-hoc entries
    pub adhoc_total: f64,
    pub grand_total: f64,
}

/// What a subscriber sees for today
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayView {
    pub date: BusinessDate,
    pub offering: Option<Offering>,
    pub entry: Option<LedgerEntry>,
    pub adhoc: Vec<AdhocEntry>,
}

/// Platform-wide figures for the operator dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStats {
    pub month: MonthKey,
    /// Subscribers that are both active and approved
    pub active_subscribers: i64,
    pub total_offerings: i64,
    pub pending_deliveries: i64,
    pub pending_approvals: i64,
    pub today_published: bool,
    pub today_offering: Option<Offering>,
    pub total_revenue: f64,
    pub month_revenue: f64,
}

/// Subscriber with billing totals attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRow {
    #[serde(flatten)]
    pub account: Account,
    pub total_bill: f64,
    pub this_month_total: f64,
}
