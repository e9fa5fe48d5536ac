//! Ad-hoc entries
//!
//! Purchases outside the day's offering. Never deduplicated against the
//! ledger or against each other; only the owner may delete one.

use std::sync::Arc;

use shared::models::{AdhocEntry, AdhocEntryCreate, EntryOrigin};
use shared::util::snowflake_id;
use shared::{AppError, AppResult, ErrorCode, MonthKey};
use sqlx::SqlitePool;

use crate::auth::{AccountGate, Actor, require_member, require_operator};
use crate::db::repository::adhoc_entry::{self, AdhocRow};
use crate::db::repository::account;
use crate::utils::Clock;
use crate::utils::validation::{MAX_NAME_LEN, parse_date, validate_price, validate_required_text};

#[derive(Debug, Clone)]
pub struct AdhocService {
    pool: SqlitePool,
    gate: Arc<dyn AccountGate>,
    clock: Arc<dyn Clock>,
}

impl AdhocService {
    pub fn new(pool: SqlitePool, gate: Arc<dyn AccountGate>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, gate, clock }
    }

    async fn insert(&self, user_id: i64, input: &AdhocEntryCreate, origin: EntryOrigin) -> AppResult<AdhocEntry> {
        let date = parse_date(&input.date)?;
        let title = validate_required_text(&input.title, "title", MAX_NAME_LEN)?;
        let items = input.items.normalize();
        let price = validate_price(input.price, ErrorCode::AdhocInvalidPrice)?;

        let row = AdhocRow {
            user_id,
            date: &date,
            title: &title,
            items: &items,
            price,
            origin,
        };
        let entry = adhoc_entry::insert(&self.pool, row, snowflake_id(), self.clock.now_millis()).await?;
        tracing::info!(
            entry_id = entry.id,
            user_id,
            date = %entry.date,
            price = entry.price,
            origin = ?origin,
            "Ad-hoc entry added"
        );
        Ok(entry)
    }

    /// Log a purchase for the actor
    pub async fn add_adhoc(&self, actor: Actor, input: AdhocEntryCreate) -> AppResult<AdhocEntry> {
        require_member(self.gate.as_ref(), actor).await?;
        self.insert(actor.account_id, &input, EntryOrigin::SelfReported).await
    }

    /// Operator logs a purchase on a user's behalf
    pub async fn add_adhoc_for(&self, actor: Actor, user_id: i64, input: AdhocEntryCreate) -> AppResult<AdhocEntry> {
        require_operator(self.gate.as_ref(), actor).await?;
        if account::find_by_id(&self.pool, user_id).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::AccountNotFound,
                format!("Account {user_id} not found"),
            )
            .with_detail("account_id", user_id));
        }
        self.insert(user_id, &input, EntryOrigin::OperatorAdded).await
    }

    /// Owner-only delete, operators included
    pub async fn delete_adhoc(&self, actor: Actor, id: i64) -> AppResult<()> {
        require_member(self.gate.as_ref(), actor).await?;
        let entry = adhoc_entry::find_by_id(&self.pool, id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::AdhocEntryNotFound, format!("Ad-hoc entry {id} not found"))
                .with_detail("entry_id", id)
        })?;
        if entry.user_id != actor.account_id {
            crate::security_log!(
                "WARN",
                "adhoc_delete_not_owner",
                account_id = actor.account_id,
                entry_id = id
            );
            return Err(AppError::new(ErrorCode::NotEntryOwner));
        }
        adhoc_entry::delete(&self.pool, id).await?;
        tracing::info!(entry_id = id, user_id = actor.account_id, "Ad-hoc entry deleted");
        Ok(())
    }

    /// A user's ad-hoc entries, date descending
    pub async fn list_adhoc(&self, user_id: i64, month: Option<&MonthKey>) -> AppResult<Vec<AdhocEntry>> {
        Ok(adhoc_entry::find_by_user(&self.pool, user_id, month).await?)
    }
}
