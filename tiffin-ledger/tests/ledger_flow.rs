//! Lazy materialization, frozen prices and status transitions end to end

mod common;

use common::{date, harness};
use shared::models::{EntryStatus, OfferingUpdate};
use shared::{ErrorCode, MonthKey};

#[tokio::test]
async fn two_users_one_offering_price_change() {
    let h = harness("2024-03-01").await;
    let a = h.member("a@x.com").await;
    let b = h.member("b@x.com").await;
    let march = MonthKey::parse("2024-03").unwrap();

    let offering = h.publish("2024-03-01", 50.0).await;
    let entry_a = h.state.ledger.today_view(a).await.unwrap().entry.unwrap();
    assert_eq!(entry_a.price, 50.0);
    assert_eq!(entry_a.status, EntryStatus::Pending);

    h.state
        .offerings
        .update_offering(
            h.operator,
            offering.id,
            OfferingUpdate {
                price: Some(60.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let entry_b = h.state.ledger.today_view(b).await.unwrap().entry.unwrap();
    assert_eq!(entry_b.price, 60.0);

    let total = |user: i64| {
        let engine = h.state.reconcile.clone();
        async move { engine.compute_total(user, Some(&march)).await.unwrap().monthly_total }
    };
    assert_eq!(total(a.account_id).await + total(b.account_id).await, 110.0);

    h.state.ledger.skip(a, a.account_id, &date("2024-03-01")).await.unwrap();
    assert_eq!(total(a.account_id).await + total(b.account_id).await, 60.0);
}

#[tokio::test]
async fn upsert_after_entry_keeps_frozen_price() {
    let h = harness("2024-03-01").await;
    let a = h.member("a@x.com").await;

    h.publish("2024-03-01", 50.0).await;
    let first = h.state.ledger.today_view(a).await.unwrap().entry.unwrap();

    // Re-publishing the same date replaces the offering in place
    let replaced = h.publish("2024-03-01", 75.0).await;
    let again = h.state.ledger.today_view(a).await.unwrap();
    assert_eq!(again.entry.unwrap(), first);
    assert_eq!(again.offering.unwrap().id, replaced.id);
    assert_eq!(replaced.id, first.offering_id);
}

#[tokio::test]
async fn skip_then_bulk_deliver() {
    let h = harness("2024-03-03").await;
    let a = h.member("a@x.com").await;
    for d in ["2024-03-01", "2024-03-02", "2024-03-03"] {
        h.publish(d, 50.0).await;
        h.state.ledger.materialize(h.operator, a.account_id, &date(d)).await.unwrap();
    }
    let skipped = h.state.ledger.skip(a, a.account_id, &date("2024-03-02")).await.unwrap();

    let march = MonthKey::parse("2024-03").unwrap();
    let changed = h
        .state
        .ledger
        .bulk_deliver_month(h.operator, a.account_id, Some(&march))
        .await
        .unwrap();
    assert_eq!(changed, 2);

    let after = h.state.ledger.find_entry(skipped.id).await.unwrap();
    assert_eq!(after.status, EntryStatus::Skipped);

    let history = h.state.reconcile.build_history(a.account_id, Some(&march)).await.unwrap();
    let delivered = history
        .entries
        .iter()
        .filter(|v| v.entry.status == EntryStatus::Delivered)
        .count();
    assert_eq!(delivered, 2);
    assert_eq!(history.ledger_total, 100.0);
}

#[tokio::test]
async fn bulk_deliver_without_month_covers_history() {
    let h = harness("2024-03-01").await;
    let a = h.member("a@x.com").await;
    for d in ["2024-01-31", "2024-02-15", "2024-03-01"] {
        h.publish(d, 40.0).await;
        h.state.ledger.materialize(h.operator, a.account_id, &date(d)).await.unwrap();
    }

    let changed = h
        .state
        .ledger
        .bulk_deliver_month(h.operator, a.account_id, None)
        .await
        .unwrap();
    assert_eq!(changed, 3);

    // Already delivered: nothing left to change
    let changed = h
        .state
        .ledger
        .bulk_deliver_month(h.operator, a.account_id, None)
        .await
        .unwrap();
    assert_eq!(changed, 0);
}

#[tokio::test]
async fn pending_member_cannot_mutate() {
    let h = harness("2024-03-01").await;
    h.publish("2024-03-01", 50.0).await;
    let p = h.pending_member("p@x.com").await;

    let err = h.state.ledger.today_view(p).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AccountPendingApproval);

    h.state.accounts.approve(h.operator, p.account_id).await.unwrap();
    assert!(h.state.ledger.today_view(p).await.unwrap().entry.is_some());

    h.state.accounts.toggle_active(h.operator, p.account_id).await.unwrap();
    let err = h.state.ledger.today_view(p).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AccountDisabled);
}
