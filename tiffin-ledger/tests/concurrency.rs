//! Concurrent first access of a day converges on one ledger entry

mod common;

use std::collections::HashSet;

use common::{date, state_over};
use tiffin_ledger::TodayEntry;
use tiffin_ledger::db::DbService;

const CONCURRENCY: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_get_or_create_yields_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiffin.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    let h = state_over(db, "2024-03-01").await;

    let user = h.member("a@x.com").await;
    h.publish("2024-03-01", 50.0).await;

    let mut handles = Vec::with_capacity(CONCURRENCY);
    for _ in 0..CONCURRENCY {
        let ledger = h.state.ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .get_or_create_today_entry(user, user.account_id, &date("2024-03-01"))
                .await
        }));
    }

    let mut ids = HashSet::new();
    let mut prices = HashSet::new();
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            TodayEntry::Entry { entry, .. } => {
                ids.insert(entry.id);
                prices.insert(entry.price.to_bits());
            }
            TodayEntry::NoOffering => panic!("offering was published"),
        }
    }
    assert_eq!(ids.len(), 1);
    assert_eq!(prices.len(), 1);

    let history = h.state.reconcile.build_history(user.account_id, None).await.unwrap();
    assert_eq!(history.entries.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_users_each_get_their_own_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiffin.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    let h = state_over(db, "2024-03-01").await;
    h.publish("2024-03-01", 50.0).await;

    let mut users = Vec::new();
    for i in 0..4 {
        users.push(h.member(&format!("user{i}@x.com")).await);
    }

    let mut handles = Vec::new();
    for user in users.iter().copied().cycle().take(users.len() * 4) {
        let ledger = h.state.ledger.clone();
        handles.push(tokio::spawn(async move { ledger.today_view(user).await }));
    }
    let mut ids = HashSet::new();
    for handle in handles {
        let view = handle.await.unwrap().unwrap();
        ids.insert(view.entry.unwrap().id);
    }
    assert_eq!(ids.len(), users.len());
}
