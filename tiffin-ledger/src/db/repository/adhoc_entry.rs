//! Ad-hoc Entry Repository

use super::{RepoError, RepoResult};
use shared::models::{AdhocEntry, EntryOrigin};
use shared::{BusinessDate, MonthKey};
use sqlx::SqlitePool;
use sqlx::types::Json;

const ADHOC_SELECT: &str = "SELECT id, user_id, date, title, items, price, origin, created_at, updated_at FROM adhoc_entry";

/// Validated column values for a new ad-hoc entry
#[derive(Debug, Clone)]
pub struct AdhocRow<'a> {
    pub user_id: i64,
    pub date: &'a BusinessDate,
    pub title: &'a str,
    pub items: &'a [String],
    pub price: f64,
    pub origin: EntryOrigin,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AdhocEntry>> {
    let sql = format!("{ADHOC_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, AdhocEntry>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// A user's ad-hoc entries, newest date first
pub async fn find_by_user(
    pool: &SqlitePool,
    user_id: i64,
    month: Option<&MonthKey>,
) -> RepoResult<Vec<AdhocEntry>> {
    let pattern = month.map(MonthKey::like_pattern);
    let sql = format!(
        "{ADHOC_SELECT} WHERE user_id = ?1 AND (?2 IS NULL OR date LIKE ?2) ORDER BY date DESC, created_at DESC"
    );
    let rows = sqlx::query_as::<_, AdhocEntry>(&sql)
        .bind(user_id)
        .bind(pattern)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_user_date(
    pool: &SqlitePool,
    user_id: i64,
    date: &BusinessDate,
) -> RepoResult<Vec<AdhocEntry>> {
    let sql = format!("{ADHOC_SELECT} WHERE user_id = ? AND date = ? ORDER BY created_at");
    let rows = sqlx::query_as::<_, AdhocEntry>(&sql)
        .bind(user_id)
        .bind(date.to_string())
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<AdhocEntry>> {
    let sql = format!("{ADHOC_SELECT} ORDER BY date DESC");
    let rows = sqlx::query_as::<_, AdhocEntry>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn insert(pool: &SqlitePool, row: AdhocRow<'_>, id: i64, now: i64) -> RepoResult<AdhocEntry> {
    sqlx::query(
        "INSERT INTO adhoc_entry (id, user_id, date, title, items, price, origin, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(row.user_id)
    .bind(row.date.to_string())
    .bind(row.title)
    .bind(Json(row.items))
    .bind(row.price)
    .bind(row.origin)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create ad-hoc entry".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM adhoc_entry WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
