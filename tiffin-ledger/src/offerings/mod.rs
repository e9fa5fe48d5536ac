//! Offering Store
//!
//! One canonical offering per business date. Writes are operator-only;
//! reads are open.

use std::sync::Arc;

use shared::models::{Offering, OfferingUpdate, OfferingUpsert};
use shared::util::snowflake_id;
use shared::{AppError, AppResult, BusinessDate, ErrorCode, MonthKey};
use sqlx::SqlitePool;

use crate::auth::{AccountGate, Actor, require_operator};
use crate::db::repository::RepoError;
use crate::db::repository::offering::{self, OfferingRow};
use crate::utils::Clock;
use crate::utils::validation::{MAX_NAME_LEN, parse_date, validate_price, validate_required_text};

fn offering_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OfferingNotFound, format!("Offering {id} not found"))
        .with_detail("offering_id", id)
}

/// Validated offering input
struct CleanOffering {
    date: BusinessDate,
    title: String,
    items: Vec<String>,
    price: f64,
}

impl CleanOffering {
    fn from_input(input: &OfferingUpsert) -> AppResult<Self> {
        Ok(Self {
            date: parse_date(&input.date)?,
            title: validate_required_text(&input.title, "title", MAX_NAME_LEN)?,
            items: input.items.normalize(),
            price: validate_price(input.price, ErrorCode::OfferingInvalidPrice)?,
        })
    }

    fn row(&self, created_by: i64) -> OfferingRow<'_> {
        OfferingRow {
            date: &self.date,
            title: &self.title,
            items: &self.items,
            price: self.price,
            created_by: Some(created_by),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OfferingService {
    pool: SqlitePool,
    gate: Arc<dyn AccountGate>,
    clock: Arc<dyn Clock>,
}

impl OfferingService {
    pub fn new(pool: SqlitePool, gate: Arc<dyn AccountGate>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, gate, clock }
    }

    /// Create or replace the offering for `input.date`.
    ///
    /// Replacing keeps the offering's id and date. Ledger entries already
    /// materialized for the date keep their captured price.
    pub async fn upsert_offering(&self, actor: Actor, input: OfferingUpsert) -> AppResult<Offering> {
        require_operator(self.gate.as_ref(), actor).await?;
        let clean = CleanOffering::from_input(&input)?;

        let saved = offering::upsert(
            &self.pool,
            clean.row(actor.account_id),
            snowflake_id(),
            self.clock.now_millis(),
        )
        .await?;
        tracing::info!(
            offering_id = saved.id,
            date = %saved.date,
            price = saved.price,
            "Offering saved"
        );
        Ok(saved)
    }

    /// Strict create; Conflict when the date already has an offering
    pub async fn create_offering(&self, actor: Actor, input: OfferingUpsert) -> AppResult<Offering> {
        require_operator(self.gate.as_ref(), actor).await?;
        let clean = CleanOffering::from_input(&input)?;

        let created = offering::insert(
            &self.pool,
            clean.row(actor.account_id),
            snowflake_id(),
            self.clock.now_millis(),
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::OfferingDateExists, msg)
                .with_detail("date", clean.date.to_string()),
            other => other.into(),
        })?;
        tracing::info!(offering_id = created.id, date = %created.date, "Offering created");
        Ok(created)
    }

    /// Patch supplied fields only
    pub async fn update_offering(&self, actor: Actor, id: i64, update: OfferingUpdate) -> AppResult<Offering> {
        require_operator(self.gate.as_ref(), actor).await?;

        let title = update
            .title
            .as_deref()
            .map(|t| validate_required_text(t, "title", MAX_NAME_LEN))
            .transpose()?;
        let items = update.items.as_ref().map(|i| i.normalize());
        let price = update
            .price
            .map(|p| validate_price(p, ErrorCode::OfferingInvalidPrice))
            .transpose()?;

        let updated = offering::update(
            &self.pool,
            id,
            title.as_deref(),
            items.as_deref(),
            price,
            self.clock.now_millis(),
        )
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => offering_not_found(id),
            other => other.into(),
        })?;
        tracing::info!(offering_id = id, date = %updated.date, "Offering updated");
        Ok(updated)
    }

    /// Remove the offering. Ledger entries that reference it are kept.
    pub async fn delete_offering(&self, actor: Actor, id: i64) -> AppResult<()> {
        require_operator(self.gate.as_ref(), actor).await?;
        if !offering::delete(&self.pool, id).await? {
            return Err(offering_not_found(id));
        }
        tracing::info!(offering_id = id, "Offering deleted");
        Ok(())
    }

    /// Offerings in the month (or all), date descending
    pub async fn list_offerings(&self, month: Option<&MonthKey>) -> AppResult<Vec<Offering>> {
        Ok(offering::find_all(&self.pool, month).await?)
    }

    pub async fn find_offering(&self, id: i64) -> AppResult<Offering> {
        offering::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| offering_not_found(id))
    }

    pub async fn offering_for_date(&self, date: &BusinessDate) -> AppResult<Option<Offering>> {
        Ok(offering::find_by_date(&self.pool, date).await?)
    }
}
