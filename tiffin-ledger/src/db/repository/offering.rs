//! Offering Repository

use super::{RepoError, RepoResult};
use shared::models::Offering;
use shared::{BusinessDate, MonthKey};
use sqlx::SqlitePool;
use sqlx::types::Json;

const OFFERING_SELECT: &str =
    "SELECT id, date, title, items, price, created_by, created_at, updated_at FROM offering";

/// Validated column values for an offering write
#[derive(Debug, Clone)]
pub struct OfferingRow<'a> {
    pub date: &'a BusinessDate,
    pub title: &'a str,
    pub items: &'a [String],
    pub price: f64,
    pub created_by: Option<i64>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Offering>> {
    let sql = format!("{OFFERING_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Offering>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_date(pool: &SqlitePool, date: &BusinessDate) -> RepoResult<Option<Offering>> {
    let sql = format!("{OFFERING_SELECT} WHERE date = ?");
    let row = sqlx::query_as::<_, Offering>(&sql)
        .bind(date.to_string())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Offerings whose date starts with the month prefix (all when `None`), newest first
pub async fn find_all(pool: &SqlitePool, month: Option<&MonthKey>) -> RepoResult<Vec<Offering>> {
    let rows = match month {
        Some(month) => {
            let sql = format!("{OFFERING_SELECT} WHERE date LIKE ? ORDER BY date DESC");
            sqlx::query_as::<_, Offering>(&sql)
                .bind(month.like_pattern())
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{OFFERING_SELECT} ORDER BY date DESC");
            sqlx::query_as::<_, Offering>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

/// Offerings still referenced by a user's ledger entries
pub async fn find_referenced_by_user(
    pool: &SqlitePool,
    user_id: i64,
    month: Option<&MonthKey>,
) -> RepoResult<Vec<Offering>> {
    let pattern = month.map(MonthKey::like_pattern);
    let sql = format!(
        "{OFFERING_SELECT} WHERE id IN (SELECT offering_id FROM ledger_entry WHERE user_id = ?1 AND (?2 IS NULL OR date LIKE ?2))"
    );
    let rows = sqlx::query_as::<_, Offering>(&sql)
        .bind(user_id)
        .bind(pattern)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn count_all(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM offering")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert or replace title/items/price for the date; id, date and
/// created_at of an existing row are kept
pub async fn upsert(pool: &SqlitePool, row: OfferingRow<'_>, id: i64, now: i64) -> RepoResult<Offering> {
    sqlx::query(
        "INSERT INTO offering (id, date, title, items, price, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) \
         ON CONFLICT (date) DO UPDATE SET title = excluded.title, items = excluded.items, price = excluded.price, created_by = excluded.created_by, updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(row.date.to_string())
    .bind(row.title)
    .bind(Json(row.items))
    .bind(row.price)
    .bind(row.created_by)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_date(pool, row.date)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to upsert offering".into()))
}

/// Strict insert; a taken date surfaces as `RepoError::Duplicate`
pub async fn insert(pool: &SqlitePool, row: OfferingRow<'_>, id: i64, now: i64) -> RepoResult<Offering> {
    sqlx::query(
        "INSERT INTO offering (id, date, title, items, price, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(row.date.to_string())
    .bind(row.title)
    .bind(Json(row.items))
    .bind(row.price)
    .bind(row.created_by)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Offering for {} already exists", row.date))
        }
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create offering".into()))
}

/// Patch the supplied fields only
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    title: Option<&str>,
    items: Option<&[String]>,
    price: Option<f64>,
    now: i64,
) -> RepoResult<Offering> {
    let rows = sqlx::query(
        "UPDATE offering SET title = COALESCE(?1, title), items = COALESCE(?2, items), price = COALESCE(?3, price), updated_at = ?4 WHERE id = ?5",
    )
    .bind(title)
    .bind(items.map(Json))
    .bind(price)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Offering {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Offering {id} not found")))
}

/// Remove the offering row only; ledger entries referencing it stay
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM offering WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
