//! Account Model

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum Role {
    Operator,
    #[default]
    Subscriber,
}

/// Account record (identified by email, case-insensitive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Account {
    pub id: i64,
    pub name: String,
    /// Stored lowercase
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub is_approved: bool,
    pub phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Account {
    pub fn standing(&self) -> AccountStanding {
        AccountStanding {
            role: self.role,
            is_active: self.is_active,
            is_approved: self.is_approved,
        }
    }

    pub fn is_operator(&self) -> bool {
        self.role == Role::Operator
    }
}

/// The three facts the account gate exposes about an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStanding {
    pub role: Role,
    pub is_active: bool,
    pub is_approved: bool,
}

impl AccountStanding {
    /// Standing with the operator invariant applied
    pub fn normalized(mut self) -> Self {
        enforce_operator_standing(&mut self);
        self
    }

    /// Whether ledger mutations may be accepted for this account
    pub fn may_mutate(&self) -> bool {
        self.is_active && self.is_approved
    }
}

/// Operator accounts are always active and approved.
///
/// Applied on every account create and update; explicit values supplied for
/// an operator are overridden.
pub fn enforce_operator_standing(standing: &mut AccountStanding) {
    if standing.role == Role::Operator {
        standing.is_active = true;
        standing.is_approved = true;
    }
}

/// Create account payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Operator-side account update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub is_approved: Option<bool>,
}

/// Self-service profile update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
}
