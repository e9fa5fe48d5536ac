//! Per-User Ledger
//!
//! One [`LedgerEntry`] per (user, date), materialized lazily from that
//! date's offering. The entry's price is captured at creation and never
//! re-derived. Creation is a conditional insert on the `(user_id, date)`
//! unique key; a caller that loses the race re-reads the winner's row.

pub mod adhoc;

pub use adhoc::AdhocService;

use std::sync::Arc;

use shared::models::{EntryStatus, LedgerEntry, Offering, TodayView};
use shared::util::snowflake_id;
use shared::{AppError, AppResult, BusinessDate, ErrorCode, MonthKey};
use sqlx::SqlitePool;

use crate::auth::{AccountGate, Actor, require_member, require_operator, require_owner_or_operator};
use crate::db::repository::{RepoError, account, adhoc_entry, ledger_entry, offering};
use crate::utils::Clock;

/// Outcome of pulling a date's offering into a user's ledger
#[derive(Debug, Clone, PartialEq)]
pub enum TodayEntry {
    /// No entry and no offering for the date; nothing was written
    NoOffering,
    /// `offering` is `None` when it was deleted after the entry captured
    /// its price
    Entry {
        offering: Option<Offering>,
        entry: LedgerEntry,
    },
}

impl TodayEntry {
    pub fn entry(&self) -> Option<&LedgerEntry> {
        match self {
            Self::Entry { entry, .. } => Some(entry),
            Self::NoOffering => None,
        }
    }

    pub fn into_parts(self) -> (Option<Offering>, Option<LedgerEntry>) {
        match self {
            Self::Entry { offering, entry } => (offering, Some(entry)),
            Self::NoOffering => (None, None),
        }
    }
}

fn entry_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::LedgerEntryNotFound, format!("Ledger entry {id} not found"))
        .with_detail("entry_id", id)
}

#[derive(Debug, Clone)]
pub struct LedgerService {
    pool: SqlitePool,
    gate: Arc<dyn AccountGate>,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    pub fn new(pool: SqlitePool, gate: Arc<dyn AccountGate>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, gate, clock }
    }

    /// Materialize without authorization.
    ///
    /// An existing entry always wins, whether or not its offering still
    /// exists. Without one, `NoOffering` is returned untouched when the date
    /// has no offering.
    async fn ensure_entry(&self, user_id: i64, date: &BusinessDate) -> AppResult<TodayEntry> {
        if account::find_by_id(&self.pool, user_id).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::AccountNotFound,
                format!("Account {user_id} not found"),
            )
            .with_detail("account_id", user_id));
        }

        if let Some(entry) = ledger_entry::find_by_user_date(&self.pool, user_id, date).await? {
            let offering = offering::find_by_id(&self.pool, entry.offering_id).await?;
            return Ok(TodayEntry::Entry { offering, entry });
        }

        let Some(offering) = offering::find_by_date(&self.pool, date).await? else {
            return Ok(TodayEntry::NoOffering);
        };

        let created = ledger_entry::insert_if_absent(
            &self.pool,
            snowflake_id(),
            user_id,
            offering.id,
            date,
            offering.price,
            self.clock.now_millis(),
        )
        .await?;

        let entry = ledger_entry::find_by_user_date(&self.pool, user_id, date)
            .await?
            .ok_or_else(|| AppError::internal(format!("Ledger entry for user {user_id} on {date} vanished")))?;

        if created {
            tracing::info!(
                user_id,
                date = %date,
                entry_id = entry.id,
                offering_id = offering.id,
                price = entry.price,
                "Ledger entry materialized"
            );
        } else {
            tracing::debug!(user_id, date = %date, entry_id = entry.id, "Concurrent materialization, using existing entry");
        }
        Ok(TodayEntry::Entry {
            offering: Some(offering),
            entry,
        })
    }

    /// Get the user's entry for `today`, creating it from the offering on
    /// first access. The owner must be an approved member; operators may
    /// call it for anyone.
    pub async fn get_or_create_today_entry(
        &self,
        actor: Actor,
        user_id: i64,
        today: &BusinessDate,
    ) -> AppResult<TodayEntry> {
        require_owner_or_operator(self.gate.as_ref(), actor, user_id).await?;
        self.ensure_entry(user_id, today).await
    }

    /// The actor's view of today: offering, ledger entry and ad-hoc entries
    pub async fn today_view(&self, actor: Actor) -> AppResult<TodayView> {
        require_member(self.gate.as_ref(), actor).await?;
        let date = self.clock.today();
        let (offering, entry) = self.ensure_entry(actor.account_id, &date).await?.into_parts();
        let adhoc = adhoc_entry::find_by_user_date(&self.pool, actor.account_id, &date).await?;
        Ok(TodayView {
            date,
            offering,
            entry,
            adhoc,
        })
    }

    /// Operator-explicit creation for any date that has an offering
    pub async fn materialize(&self, actor: Actor, user_id: i64, date: &BusinessDate) -> AppResult<LedgerEntry> {
        require_operator(self.gate.as_ref(), actor).await?;
        match self.ensure_entry(user_id, date).await? {
            TodayEntry::Entry { entry, .. } => Ok(entry),
            TodayEntry::NoOffering => Err(AppError::with_message(
                ErrorCode::NoOfferingForDate,
                format!("No offering published for {date}"),
            )
            .with_detail("date", date.to_string())),
        }
    }

    /// Direct status override; any status may move to any other
    pub async fn set_status(&self, actor: Actor, entry_id: i64, status: EntryStatus) -> AppResult<LedgerEntry> {
        require_operator(self.gate.as_ref(), actor).await?;
        self.write_status(entry_id, status).await
    }

    async fn write_status(&self, entry_id: i64, status: EntryStatus) -> AppResult<LedgerEntry> {
        let entry = ledger_entry::set_status(&self.pool, entry_id, status, self.clock.now_millis())
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => entry_not_found(entry_id),
                other => other.into(),
            })?;
        tracing::info!(
            entry_id,
            user_id = entry.user_id,
            date = %entry.date,
            status = %status,
            "Ledger entry status changed"
        );
        Ok(entry)
    }

    pub async fn deliver(&self, actor: Actor, entry_id: i64) -> AppResult<LedgerEntry> {
        self.set_status(actor, entry_id, EntryStatus::Delivered).await
    }

    pub async fn mark_pending(&self, actor: Actor, entry_id: i64) -> AppResult<LedgerEntry> {
        self.set_status(actor, entry_id, EntryStatus::Pending).await
    }

    /// Skip the user's entry for `date`. The entry must already exist.
    pub async fn skip(&self, actor: Actor, user_id: i64, date: &BusinessDate) -> AppResult<LedgerEntry> {
        require_owner_or_operator(self.gate.as_ref(), actor, user_id).await?;
        let entry = ledger_entry::find_by_user_date(&self.pool, user_id, date)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::LedgerEntryNotFound,
                    format!("No ledger entry for {date}"),
                )
                .with_detail("date", date.to_string())
            })?;
        self.write_status(entry.id, EntryStatus::Skipped).await
    }

    /// Deliver every pending entry of the user in `month` (all history when
    /// `None`). Skipped entries are never touched. Returns the number changed.
    pub async fn bulk_deliver_month(&self, actor: Actor, user_id: i64, month: Option<&MonthKey>) -> AppResult<u64> {
        require_operator(self.gate.as_ref(), actor).await?;
        let changed = ledger_entry::deliver_pending(&self.pool, user_id, month, self.clock.now_millis()).await?;
        tracing::info!(
            user_id,
            month = %month.map(MonthKey::prefix).unwrap_or_else(|| "all".into()),
            changed,
            "Bulk delivered"
        );
        Ok(changed)
    }

    pub async fn find_entry(&self, entry_id: i64) -> AppResult<LedgerEntry> {
        ledger_entry::find_by_id(&self.pool, entry_id)
            .await?
            .ok_or_else(|| entry_not_found(entry_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountService;
    use crate::auth::SqliteAccountGate;
    use crate::db::DbService;
    use crate::offerings::OfferingService;
    use crate::utils::FixedClock;
    use shared::ErrorKind;
    use shared::models::{AccountCreate, OfferingUpdate, OfferingUpsert};

    struct Fixture {
        ledger: LedgerService,
        offerings: OfferingService,
        accounts: AccountService,
        operator: Actor,
    }

    fn date(s: &str) -> BusinessDate {
        BusinessDate::parse(s).unwrap()
    }

    async fn fixture() -> Fixture {
        let db = DbService::open_in_memory().await.unwrap();
        let gate: Arc<dyn AccountGate> = Arc::new(SqliteAccountGate::new(db.pool.clone()));
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(date("2024-03-01")));
        let accounts = AccountService::new(db.pool.clone(), gate.clone(), clock.clone(), None);
        let op = accounts.seed_operator("admin@tiffin.com", "Admin").await.unwrap().unwrap();
        Fixture {
            ledger: LedgerService::new(db.pool.clone(), gate.clone(), clock.clone()),
            offerings: OfferingService::new(db.pool, gate, clock),
            accounts,
            operator: Actor::new(op.id),
        }
    }

    impl Fixture {
        async fn subscriber(&self, email: &str) -> Actor {
            let account = self
                .accounts
                .register_subscriber(AccountCreate {
                    name: "Sub".into(),
                    email: email.into(),
                    phone: None,
                })
                .await
                .unwrap();
            self.accounts.approve(self.operator, account.id).await.unwrap();
            Actor::new(account.id)
        }

        async fn publish(&self, d: &str, price: f64) -> Offering {
            self.offerings
                .upsert_offering(
                    self.operator,
                    OfferingUpsert {
                        date: d.into(),
                        title: "Thali".into(),
                        items: Default::default(),
                        price,
                    },
                )
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_no_offering_no_side_effect() {
        let f = fixture().await;
        let user = f.subscriber("a@x.com").await;

        let view = f.ledger.today_view(user).await.unwrap();
        assert!(view.offering.is_none());
        assert!(view.entry.is_none());

        let err = f.ledger.skip(user, user.account_id, &date("2024-03-01")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::LedgerEntryNotFound);
    }

    #[tokio::test]
    async fn test_price_frozen_at_creation() {
        let f = fixture().await;
        let a = f.subscriber("a@x.com").await;
        let b = f.subscriber("b@x.com").await;
        let offering = f.publish("2024-03-01", 50.0).await;

        let first = f.ledger.today_view(a).await.unwrap().entry.unwrap();
        assert_eq!(first.price, 50.0);
        assert_eq!(first.status, EntryStatus::Pending);

        f.offerings
            .update_offering(
                f.operator,
                offering.id,
                OfferingUpdate {
                    price: Some(60.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let again = f.ledger.today_view(a).await.unwrap();
        assert_eq!(again.entry.unwrap(), first);
        assert_eq!(again.offering.unwrap().price, 60.0);

        let second = f.ledger.today_view(b).await.unwrap().entry.unwrap();
        assert_eq!(second.price, 60.0);
    }

    #[tokio::test]
    async fn test_unapproved_member_rejected() {
        let f = fixture().await;
        f.publish("2024-03-01", 50.0).await;
        let pending = f
            .accounts
            .register_subscriber(AccountCreate {
                name: "P".into(),
                email: "p@x.com".into(),
                phone: None,
            })
            .await
            .unwrap();

        let err = f.ledger.today_view(Actor::new(pending.id)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        // Operators may still materialize for the account
        let entry = f
            .ledger
            .materialize(f.operator, pending.id, &date("2024-03-01"))
            .await
            .unwrap();
        assert_eq!(entry.user_id, pending.id);
    }

    #[tokio::test]
    async fn test_materialize_requires_offering() {
        let f = fixture().await;
        let a = f.subscriber("a@x.com").await;
        let err = f
            .ledger
            .materialize(f.operator, a.account_id, &date("2024-02-10"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NoOfferingForDate);
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_user_never_materialized() {
        let f = fixture().await;
        f.publish("2024-03-01", 50.0).await;

        let err = f
            .ledger
            .materialize(f.operator, 987_654_321, &date("2024-03-01"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountNotFound);
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = f
            .ledger
            .get_or_create_today_entry(f.operator, 987_654_321, &date("2024-03-01"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountNotFound);

        let stored = ledger_entry::find_by_user(&f.ledger.pool, 987_654_321, None).await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_entry_outlives_deleted_offering() {
        let f = fixture().await;
        let a = f.subscriber("a@x.com").await;
        let offering = f.publish("2024-03-01", 50.0).await;
        let entry = f.ledger.today_view(a).await.unwrap().entry.unwrap();

        f.offerings.delete_offering(f.operator, offering.id).await.unwrap();

        let view = f.ledger.today_view(a).await.unwrap();
        assert!(view.offering.is_none());
        assert_eq!(view.entry, Some(entry.clone()));

        let pulled = f
            .ledger
            .get_or_create_today_entry(a, a.account_id, &date("2024-03-01"))
            .await
            .unwrap();
        assert_eq!(
            pulled,
            TodayEntry::Entry {
                offering: None,
                entry: entry.clone(),
            }
        );

        let again = f
            .ledger
            .materialize(f.operator, a.account_id, &date("2024-03-01"))
            .await
            .unwrap();
        assert_eq!(again, entry);

        // Skipping still reaches the entry
        let skipped = f.ledger.skip(a, a.account_id, &date("2024-03-01")).await.unwrap();
        assert_eq!(skipped.price, 50.0);
        assert_eq!(skipped.status, EntryStatus::Skipped);
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let f = fixture().await;
        let a = f.subscriber("a@x.com").await;
        f.publish("2024-03-01", 50.0).await;
        let entry = f.ledger.today_view(a).await.unwrap().entry.unwrap();

        let delivered = f.ledger.deliver(f.operator, entry.id).await.unwrap();
        assert_eq!(delivered.status, EntryStatus::Delivered);
        let pending = f.ledger.mark_pending(f.operator, entry.id).await.unwrap();
        assert_eq!(pending.status, EntryStatus::Pending);

        let skipped = f.ledger.skip(a, a.account_id, &date("2024-03-01")).await.unwrap();
        assert_eq!(skipped.status, EntryStatus::Skipped);

        // Only the direct setter resurrects a skipped entry
        let restored = f.ledger.deliver(f.operator, entry.id).await.unwrap();
        assert_eq!(restored.status, EntryStatus::Delivered);

        let err = f.ledger.deliver(a, entry.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = f.ledger.deliver(f.operator, 404).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::LedgerEntryNotFound);
    }

    #[tokio::test]
    async fn test_skip_other_users_entry_forbidden() {
        let f = fixture().await;
        let a = f.subscriber("a@x.com").await;
        let b = f.subscriber("b@x.com").await;
        f.publish("2024-03-01", 50.0).await;
        f.ledger.today_view(a).await.unwrap();

        let err = f.ledger.skip(b, a.account_id, &date("2024-03-01")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotEntryOwner);

        let skipped = f.ledger.skip(f.operator, a.account_id, &date("2024-03-01")).await.unwrap();
        assert_eq!(skipped.status, EntryStatus::Skipped);
    }

    #[tokio::test]
    async fn test_bulk_deliver_preserves_skip() {
        let f = fixture().await;
        let a = f.subscriber("a@x.com").await;
        for d in ["2024-03-01", "2024-03-02", "2024-03-03"] {
            f.publish(d, 50.0).await;
            f.ledger.materialize(f.operator, a.account_id, &date(d)).await.unwrap();
        }
        f.ledger.skip(a, a.account_id, &date("2024-03-02")).await.unwrap();

        let month = MonthKey::parse("2024-03").unwrap();
        let changed = f
            .ledger
            .bulk_deliver_month(f.operator, a.account_id, Some(&month))
            .await
            .unwrap();
        assert_eq!(changed, 2);

        let mut statuses = Vec::new();
        for d in ["2024-03-01", "2024-03-02", "2024-03-03"] {
            let today = f
                .ledger
                .get_or_create_today_entry(a, a.account_id, &date(d))
                .await
                .unwrap();
            statuses.push(today.entry().unwrap().status);
        }
        assert_eq!(
            statuses,
            vec![EntryStatus::Delivered, EntryStatus::Skipped, EntryStatus::Delivered]
        );
    }
}
