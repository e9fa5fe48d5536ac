//! Offering Model (the day's canonical meal)

use super::ItemsInput;
use crate::types::BusinessDate;
use serde::{Deserialize, Serialize};

/// Offering - the single operator-published meal for a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Offering {
    pub id: i64,
    /// Business date, unique across offerings
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub date: BusinessDate,
    pub title: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<String>,
    pub price: f64,
    /// Operator account that last saved the offering
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create-or-replace payload, keyed by date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferingUpsert {
    /// Business date (YYYY-MM-DD)
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub items: ItemsInput,
    pub price: f64,
}

/// Partial update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferingUpdate {
    pub title: Option<String>,
    pub items: Option<ItemsInput>,
    pub price: Option<f64>,
}
