//! Shared harness for integration tests
//!
//! Full `ServerState` over an in-memory database and a pinned clock.

#![allow(dead_code)]

use std::sync::Arc;

use shared::BusinessDate;
use shared::models::{AccountCreate, AdhocEntryCreate, ItemsInput, Offering, OfferingUpsert};
use tiffin_ledger::auth::Actor;
use tiffin_ledger::core::{Config, ServerState};
use tiffin_ledger::db::DbService;
use tiffin_ledger::utils::{Clock, FixedClock};

pub struct Harness {
    pub state: ServerState,
    pub operator: Actor,
}

pub fn date(s: &str) -> BusinessDate {
    BusinessDate::parse(s).unwrap()
}

/// Harness whose clock reads `today`
pub async fn harness(today: &str) -> Harness {
    let db = DbService::open_in_memory().await.unwrap();
    state_over(db, today).await
}

pub async fn state_over(db: DbService, today: &str) -> Harness {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(date(today)));
    let state = ServerState::with_parts(Config::with_overrides("./target/test-data"), db, clock);
    state.seed_operator().await.unwrap();
    let operator = state.accounts.first_operator().await.unwrap().unwrap();
    Harness {
        state,
        operator: Actor::new(operator.id),
    }
}

impl Harness {
    /// Registered and approved subscriber
    pub async fn member(&self, email: &str) -> Actor {
        let actor = self.pending_member(email).await;
        self.state.accounts.approve(self.operator, actor.account_id).await.unwrap();
        actor
    }

    /// Registered, not yet approved
    pub async fn pending_member(&self, email: &str) -> Actor {
        let account = self
            .state
            .accounts
            .register_subscriber(AccountCreate {
                name: email.split('@').next().unwrap_or("member").to_string(),
                email: email.to_string(),
                phone: None,
            })
            .await
            .unwrap();
        Actor::new(account.id)
    }

    pub async fn publish(&self, d: &str, price: f64) -> Offering {
        self.state
            .offerings
            .upsert_offering(
                self.operator,
                OfferingUpsert {
                    date: d.to_string(),
                    title: "Thali".to_string(),
                    items: ItemsInput::from("Roti, Dal, Rice"),
                    price,
                },
            )
            .await
            .unwrap()
    }

    pub async fn adhoc(&self, actor: Actor, d: &str, price: f64) {
        self.state
            .adhoc
            .add_adhoc(
                actor,
                AdhocEntryCreate {
                    date: d.to_string(),
                    title: "Extra".to_string(),
                    items: ItemsInput::default(),
                    price,
                },
            )
            .await
            .unwrap();
    }
}
