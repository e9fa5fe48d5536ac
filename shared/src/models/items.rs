//! Menu item list input

use serde::{Deserialize, Serialize};

/// Item names as submitted by a client: either a list or one comma-separated string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsInput {
    List(Vec<String>),
    Csv(String),
}

impl Default for ItemsInput {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl ItemsInput {
    /// Trimmed, non-empty item names in submission order
    pub fn normalize(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::List(items) => items.iter().map(String::as_str).collect(),
            Self::Csv(s) => s.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl From<Vec<String>> for ItemsInput {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<&[&str]> for ItemsInput {
    fn from(items: &[&str]) -> Self {
        Self::List(items.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&str> for ItemsInput {
    fn from(csv: &str) -> Self {
        Self::Csv(csv.to_string())
    }
}
