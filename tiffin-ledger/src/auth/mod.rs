//! Authorization Module
//!
//! Every service operation takes an [`Actor`]. The checks here consult the
//! [`AccountGate`] for the acting account only:
//!
//! - member mutations need an active, approved account
//! - operator operations need the operator role
//! - skip accepts the entry owner or an operator
//!
//! Operator views never look at the target subscriber's standing.

pub mod gate;

pub use gate::SqliteAccountGate;

use async_trait::async_trait;
use shared::models::{AccountStanding, Role};
use shared::{AppError, AppResult, ErrorCode};

use crate::security_log;

/// The account on whose behalf an operation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Actor {
    pub account_id: i64,
}

impl Actor {
    pub fn new(account_id: i64) -> Self {
        Self { account_id }
    }
}

impl From<i64> for Actor {
    fn from(account_id: i64) -> Self {
        Self::new(account_id)
    }
}

/// Account standing lookup consumed by the ledger
#[async_trait]
pub trait AccountGate: Send + Sync + std::fmt::Debug {
    /// `None` when the account does not exist
    async fn standing(&self, account_id: i64) -> AppResult<Option<AccountStanding>>;

    async fn is_active(&self, account_id: i64) -> AppResult<bool> {
        Ok(self.standing(account_id).await?.is_some_and(|s| s.is_active))
    }

    async fn is_approved(&self, account_id: i64) -> AppResult<bool> {
        Ok(self.standing(account_id).await?.is_some_and(|s| s.is_approved))
    }

    async fn role(&self, account_id: i64) -> AppResult<Option<Role>> {
        Ok(self.standing(account_id).await?.map(|s| s.role))
    }
}

async fn known_standing(gate: &dyn AccountGate, actor: Actor) -> AppResult<AccountStanding> {
    match gate.standing(actor.account_id).await? {
        Some(standing) => Ok(standing),
        None => {
            security_log!("WARN", "unknown_actor", account_id = actor.account_id);
            Err(AppError::with_message(ErrorCode::PermissionDenied, "Unknown account")
                .with_detail("account_id", actor.account_id))
        }
    }
}

/// Actor must be active and approved
pub async fn require_member(gate: &dyn AccountGate, actor: Actor) -> AppResult<AccountStanding> {
    let standing = known_standing(gate, actor).await?;
    if !standing.is_active {
        security_log!("WARN", "account_disabled", account_id = actor.account_id);
        return Err(AppError::with_message(
            ErrorCode::AccountDisabled,
            "Account is deactivated; contact the operator",
        ));
    }
    if !standing.is_approved {
        security_log!("WARN", "account_pending", account_id = actor.account_id);
        return Err(AppError::with_message(
            ErrorCode::AccountPendingApproval,
            "Account is pending approval; contact the operator",
        ));
    }
    Ok(standing)
}

/// Actor must hold the operator role
pub async fn require_operator(gate: &dyn AccountGate, actor: Actor) -> AppResult<AccountStanding> {
    let standing = known_standing(gate, actor).await?;
    if standing.role != Role::Operator {
        security_log!("WARN", "operator_required", account_id = actor.account_id);
        return Err(AppError::new(ErrorCode::OperatorRequired));
    }
    Ok(standing)
}

/// Actor must be the owner (and a member) or an operator
pub async fn require_owner_or_operator(
    gate: &dyn AccountGate,
    actor: Actor,
    owner_id: i64,
) -> AppResult<AccountStanding> {
    let standing = known_standing(gate, actor).await?;
    if standing.role == Role::Operator {
        return Ok(standing);
    }
    if actor.account_id != owner_id {
        security_log!(
            "WARN",
            "not_owner",
            account_id = actor.account_id,
            owner_id = owner_id
        );
        return Err(AppError::new(ErrorCode::NotEntryOwner));
    }
    require_member(gate, actor).await
}
