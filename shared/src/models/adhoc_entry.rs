//! Ad-hoc Entry Model (purchases outside the day's offering)

use super::ItemsInput;
use crate::types::BusinessDate;
use serde::{Deserialize, Serialize};

/// Who logged an ad-hoc entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum EntryOrigin {
    #[default]
    SelfReported,
    OperatorAdded,
}

/// Ad-hoc entry - any number per (user, date), never deduplicated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AdhocEntry {
    pub id: i64,
    pub user_id: i64,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub date: BusinessDate,
    pub title: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<String>,
    pub price: f64,
    pub origin: EntryOrigin,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create ad-hoc entry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdhocEntryCreate {
    /// Business date (YYYY-MM-DD)
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub items: ItemsInput,
    pub price: f64,
}
