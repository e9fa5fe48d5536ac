//! Ledger Entry Repository
//!
//! `(user_id, date)` is unique. Creation goes through
//! [`insert_if_absent`] so concurrent first reads of a day converge on one
//! row instead of racing a read-then-insert.

use super::{RepoError, RepoResult};
use shared::models::{EntryStatus, LedgerEntry};
use shared::{BusinessDate, MonthKey};
use sqlx::SqlitePool;

const ENTRY_SELECT: &str =
    "SELECT id, user_id, offering_id, date, price, status, created_at, updated_at FROM ledger_entry";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LedgerEntry>> {
    let sql = format!("{ENTRY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, LedgerEntry>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_user_date(
    pool: &SqlitePool,
    user_id: i64,
    date: &BusinessDate,
) -> RepoResult<Option<LedgerEntry>> {
    let sql = format!("{ENTRY_SELECT} WHERE user_id = ? AND date = ?");
    let row = sqlx::query_as::<_, LedgerEntry>(&sql)
        .bind(user_id)
        .bind(date.to_string())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// A user's entries, newest first, optionally limited to one month
pub async fn find_by_user(
    pool: &SqlitePool,
    user_id: i64,
    month: Option<&MonthKey>,
) -> RepoResult<Vec<LedgerEntry>> {
    let pattern = month.map(MonthKey::like_pattern);
    let sql = format!(
        "{ENTRY_SELECT} WHERE user_id = ?1 AND (?2 IS NULL OR date LIKE ?2) ORDER BY date DESC"
    );
    let rows = sqlx::query_as::<_, LedgerEntry>(&sql)
        .bind(user_id)
        .bind(pattern)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Every non-skipped entry across all users
pub async fn find_billable(pool: &SqlitePool) -> RepoResult<Vec<LedgerEntry>> {
    let sql = format!("{ENTRY_SELECT} WHERE status != 'skipped' ORDER BY date DESC");
    let rows = sqlx::query_as::<_, LedgerEntry>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn count_by_status(pool: &SqlitePool, status: EntryStatus) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ledger_entry WHERE status = ?")
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a pending entry unless one already exists for `(user_id, date)`.
///
/// Returns `true` when this call created the row.
pub async fn insert_if_absent(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    offering_id: i64,
    date: &BusinessDate,
    price: f64,
    now: i64,
) -> RepoResult<bool> {
    let result = sqlx::query(
        "INSERT INTO ledger_entry (id, user_id, offering_id, date, price, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) \
         ON CONFLICT (user_id, date) DO NOTHING",
    )
    .bind(id)
    .bind(user_id)
    .bind(offering_id)
    .bind(date.to_string())
    .bind(price)
    .bind(EntryStatus::Pending)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Overwrite the status of one entry
pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    status: EntryStatus,
    now: i64,
) -> RepoResult<LedgerEntry> {
    let rows = sqlx::query("UPDATE ledger_entry SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Ledger entry {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Ledger entry {id} not found")))
}

/// Mark every pending entry of the user delivered; skipped entries are left
/// alone. `None` covers the user's whole history.
pub async fn deliver_pending(
    pool: &SqlitePool,
    user_id: i64,
    month: Option<&MonthKey>,
    now: i64,
) -> RepoResult<u64> {
    let pattern = month.map(MonthKey::like_pattern);
    let result = sqlx::query(
        "UPDATE ledger_entry SET status = 'delivered', updated_at = ?1 \
         WHERE user_id = ?2 AND status = 'pending' AND (?3 IS NULL OR date LIKE ?3)",
    )
    .bind(now)
    .bind(user_id)
    .bind(pattern)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
