//! Ledger Entry Model (per-user daily billing record)

use super::Offering;
use crate::types::BusinessDate;
use serde::{Deserialize, Serialize};

/// Delivery status of a ledger entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum EntryStatus {
    #[default]
    Pending,
    Delivered,
    Skipped,
}

impl EntryStatus {
    /// Skipped entries are never billed
    pub fn is_billable(&self) -> bool {
        !matches!(self, Self::Skipped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger entry - one per (user, date), price frozen at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: i64,
    /// Offering this entry was materialized from (may no longer exist)
    pub offering_id: i64,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub date: BusinessDate,
    pub price: f64,
    pub status: EntryStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Ledger entry with its offering resolved; `offering` is `None` once the
/// offering has been deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryView {
    #[serde(flatten)]
    pub entry: LedgerEntry,
    pub offering: Option<Offering>,
}
