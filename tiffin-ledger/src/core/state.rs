use std::sync::Arc;

use shared::AppResult;

use crate::accounts::AccountService;
use crate::auth::{AccountGate, SqliteAccountGate};
use crate::core::Config;
use crate::db::DbService;
use crate::ledger::{AdhocService, LedgerService};
use crate::offerings::OfferingService;
use crate::reconcile::ReconciliationEngine;
use crate::utils::{Clock, SystemClock};

/// Service state - shared handles to every service
///
/// Cheap to clone: services hold the pool and `Arc`s.
///
/// | Field | Role |
/// |-------|------|
/// | config | Immutable configuration |
/// | db | SQLite pool |
/// | clock | Business clock |
/// | accounts | Registration, approval, cascade delete |
/// | offerings | Offering store |
/// | ledger | Per-user daily entries |
/// | adhoc | Ad-hoc entries |
/// | reconcile | Totals, calendar, history, admin views |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub clock: Arc<dyn Clock>,
    pub accounts: AccountService,
    pub offerings: OfferingService,
    pub ledger: LedgerService,
    pub adhoc: AdhocService,
    pub reconcile: ReconciliationEngine,
}

impl ServerState {
    /// Open the configured database and wire services on the system clock
    pub async fn initialize(config: Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            shared::AppError::internal(format!("Failed to create work dir {}: {e}", config.work_dir))
        })?;
        let db = DbService::new(&config.database_path).await?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(config.timezone));
        Ok(Self::with_parts(config, db, clock))
    }

    /// Wire services over an existing database and clock
    pub fn with_parts(config: Config, db: DbService, clock: Arc<dyn Clock>) -> Self {
        let pool = db.pool.clone();
        let gate: Arc<dyn AccountGate> = Arc::new(SqliteAccountGate::new(pool.clone()));

        Self {
            accounts: AccountService::new(
                pool.clone(),
                gate.clone(),
                clock.clone(),
                config.operator_secret.clone(),
            ),
            offerings: OfferingService::new(pool.clone(), gate.clone(), clock.clone()),
            ledger: LedgerService::new(pool.clone(), gate.clone(), clock.clone()),
            adhoc: AdhocService::new(pool.clone(), gate.clone(), clock.clone()),
            reconcile: ReconciliationEngine::new(pool, gate, clock.clone()),
            config,
            db,
            clock,
        }
    }

    /// Create the configured default operator if no operator exists
    pub async fn seed_operator(&self) -> AppResult<()> {
        let seeded = self
            .accounts
            .seed_operator(&self.config.seed_operator_email, &self.config.seed_operator_name)
            .await?;
        if let Some(account) = seeded {
            tracing::info!(account_id = account.id, email = %account.email, "Default operator created");
        }
        Ok(())
    }
}
