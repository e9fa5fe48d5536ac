//! Account Repository

use super::{RepoError, RepoResult};
use shared::models::{Account, AccountStanding, Role};
use sqlx::SqlitePool;

const ACCOUNT_SELECT: &str = "SELECT id, name, email, role, is_active, is_approved, phone, created_at, updated_at FROM account";

/// Rows removed by [`delete_cascade`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub ledger_entries: u64,
    pub adhoc_entries: u64,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Account>> {
    let sql = format!("{ACCOUNT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Account>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lookup by already-normalized (lowercase) email
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Account>> {
    let sql = format!("{ACCOUNT_SELECT} WHERE email = ?");
    let row = sqlx::query_as::<_, Account>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Subscribers, newest registration first
pub async fn find_subscribers(pool: &SqlitePool) -> RepoResult<Vec<Account>> {
    let sql = format!("{ACCOUNT_SELECT} WHERE role = 'subscriber' ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, Account>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Subscribers waiting for approval, oldest first
pub async fn find_pending(pool: &SqlitePool) -> RepoResult<Vec<Account>> {
    let sql = format!(
        "{ACCOUNT_SELECT} WHERE role = 'subscriber' AND is_approved = 0 ORDER BY created_at, id"
    );
    let rows = sqlx::query_as::<_, Account>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn count_active_subscribers(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM account WHERE role = 'subscriber' AND is_approved = 1 AND is_active = 1",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn count_pending_approvals(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM account WHERE role = 'subscriber' AND is_approved = 0",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Oldest account holding `role`
pub async fn find_first_with_role(pool: &SqlitePool, role: Role) -> RepoResult<Option<Account>> {
    let sql = format!("{ACCOUNT_SELECT} WHERE role = ? ORDER BY created_at, id LIMIT 1");
    let row = sqlx::query_as::<_, Account>(&sql)
        .bind(role)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert an account; `standing` must already be normalized.
/// A taken email surfaces as `RepoError::Duplicate`.
pub async fn insert(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    email: &str,
    phone: &str,
    standing: AccountStanding,
    now: i64,
) -> RepoResult<Account> {
    sqlx::query(
        "INSERT INTO account (id, name, email, role, is_active, is_approved, phone, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(standing.role)
    .bind(standing.is_active)
    .bind(standing.is_approved)
    .bind(phone)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Email '{email}' already registered")),
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create account".into()))
}

/// Write the full mutable state of an account
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    phone: &str,
    standing: AccountStanding,
    now: i64,
) -> RepoResult<Account> {
    let rows = sqlx::query(
        "UPDATE account SET name = ?1, phone = ?2, role = ?3, is_active = ?4, is_approved = ?5, updated_at = ?6 WHERE id = ?7",
    )
    .bind(name)
    .bind(phone)
    .bind(standing.role)
    .bind(standing.is_active)
    .bind(standing.is_approved)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Account {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Account {id} not found")))
}

/// Delete an account with its ledger and ad-hoc entries in one transaction
pub async fn delete_cascade(pool: &SqlitePool, id: i64) -> RepoResult<CascadeReport> {
    let mut tx = pool.begin().await?;

    let ledger = sqlx::query("DELETE FROM ledger_entry WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let adhoc = sqlx::query("DELETE FROM adhoc_entry WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let account = sqlx::query("DELETE FROM account WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if account.rows_affected() == 0 {
        // dropping tx rolls back
        return Err(RepoError::NotFound(format!("Account {id} not found")));
    }

    tx.commit().await?;
    Ok(CascadeReport {
        ledger_entries: ledger.rows_affected(),
        adhoc_entries: adhoc.rows_affected(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::ledger_entry;
    use shared::BusinessDate;

    fn subscriber() -> AccountStanding {
        AccountStanding {
            role: Role::Subscriber,
            is_active: true,
            is_approved: false,
        }
    }

    #[tokio::test]
    async fn test_insert_and_duplicate_email() {
        let db = DbService::open_in_memory().await.unwrap();
        let account = insert(&db.pool, 1, "Asha", "asha@example.com", "", subscriber(), 1000)
            .await
            .unwrap();
        assert_eq!(account.role, Role::Subscriber);
        assert!(!account.is_approved);

        let err = insert(&db.pool, 2, "Other", "asha@example.com", "", subscriber(), 1000)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_pending_and_counts() {
        let db = DbService::open_in_memory().await.unwrap();
        insert(&db.pool, 1, "A", "a@x.com", "", subscriber(), 1000).await.unwrap();
        let approved = AccountStanding {
            is_approved: true,
            ..subscriber()
        };
        insert(&db.pool, 2, "B", "b@x.com", "", approved, 2000).await.unwrap();

        let pending = find_pending(&db.pool).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, 1);
        assert_eq!(count_pending_approvals(&db.pool).await.unwrap(), 1);
        assert_eq!(count_active_subscribers(&db.pool).await.unwrap(), 1);

        let subs = find_subscribers(&db.pool).await.unwrap();
        assert_eq!(subs.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2, 1]);
        assert!(find_first_with_role(&db.pool, Role::Operator).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_cascade() {
        let db = DbService::open_in_memory().await.unwrap();
        insert(&db.pool, 1, "A", "a@x.com", "", subscriber(), 1000).await.unwrap();
        insert(&db.pool, 2, "B", "b@x.com", "", subscriber(), 1000).await.unwrap();
        let d = BusinessDate::parse("2024-03-01").unwrap();
        ledger_entry::insert_if_absent(&db.pool, 10, 1, 100, &d, 50.0, 1000).await.unwrap();
        ledger_entry::insert_if_absent(&db.pool, 11, 2, 100, &d, 50.0, 1000).await.unwrap();

        let report = delete_cascade(&db.pool, 1).await.unwrap();
        assert_eq!(report.ledger_entries, 1);
        assert_eq!(report.adhoc_entries, 0);
        assert!(find_by_id(&db.pool, 1).await.unwrap().is_none());
        assert!(ledger_entry::find_by_id(&db.pool, 11).await.unwrap().is_some());

        let err = delete_cascade(&db.pool, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
