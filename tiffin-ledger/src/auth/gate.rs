//! Account gate backed by the account table

use async_trait::async_trait;
use shared::AppResult;
use shared::models::AccountStanding;
use sqlx::SqlitePool;

use super::AccountGate;
use crate::db::repository::account;

/// Reads standing straight from storage on every call so approval and
/// deactivation take effect on the next operation
#[derive(Debug, Clone)]
pub struct SqliteAccountGate {
    pool: SqlitePool,
}

impl SqliteAccountGate {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountGate for SqliteAccountGate {
    async fn standing(&self, account_id: i64) -> AppResult<Option<AccountStanding>> {
        let account = account::find_by_id(&self.pool, account_id).await?;
        Ok(account.map(|a| a.standing()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::Role;

    #[tokio::test]
    async fn test_standing_reflects_storage() {
        let db = DbService::open_in_memory().await.unwrap();
        let standing = AccountStanding {
            role: Role::Subscriber,
            is_active: true,
            is_approved: false,
        };
        account::insert(&db.pool, 1, "Asha", "asha@example.com", "", standing, 1000)
            .await
            .unwrap();

        let gate = SqliteAccountGate::new(db.pool.clone());
        assert_eq!(gate.standing(1).await.unwrap(), Some(standing));
        assert!(!gate.is_approved(1).await.unwrap());

        let approved = AccountStanding {
            is_approved: true,
            ..standing
        };
        account::update(&db.pool, 1, "Asha", "", approved, 2000).await.unwrap();
        assert!(gate.is_approved(1).await.unwrap());
        assert_eq!(gate.standing(2).await.unwrap(), None);
    }
}
