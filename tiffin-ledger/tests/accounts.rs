//! Account lifecycle and cascade delete

mod common;

use common::{date, harness};
use shared::models::{AccountUpdate, Role};
use shared::{ErrorCode, ErrorKind};

#[tokio::test]
async fn cascade_delete_removes_all_entries() {
    let h = harness("2024-03-01").await;
    let a = h.member("a@x.com").await;
    let b = h.member("b@x.com").await;
    h.publish("2024-03-01", 50.0).await;
    h.state.ledger.today_view(a).await.unwrap();
    h.state.ledger.today_view(b).await.unwrap();
    h.adhoc(a, "2024-03-01", 10.0).await;
    h.adhoc(a, "2024-02-01", 10.0).await;

    let report = h.state.accounts.delete_account(h.operator, a.account_id).await.unwrap();
    assert_eq!(report.ledger_entries, 1);
    assert_eq!(report.adhoc_entries, 2);

    let history = h.state.reconcile.build_history(a.account_id, None).await.unwrap();
    assert!(history.entries.is_empty());
    assert!(history.adhoc.is_empty());

    // Other users untouched
    let other = h.state.reconcile.build_history(b.account_id, None).await.unwrap();
    assert_eq!(other.entries.len(), 1);

    // The deleted account can no longer act
    let err = h.state.ledger.today_view(a).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn demoting_operator_restores_normal_rules() {
    let h = harness("2024-03-01").await;
    let a = h.member("a@x.com").await;

    let promoted = h
        .state
        .accounts
        .update_account(
            h.operator,
            a.account_id,
            AccountUpdate {
                role: Some(Role::Operator),
                is_approved: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(promoted.is_approved);

    // A second operator can now run operator actions
    h.publish("2024-03-01", 50.0).await;
    h.state.ledger.materialize(a, a.account_id, &date("2024-03-01")).await.unwrap();

    let demoted = h
        .state
        .accounts
        .update_account(
            h.operator,
            a.account_id,
            AccountUpdate {
                role: Some(Role::Subscriber),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(demoted.role, Role::Subscriber);
    assert!(!demoted.is_active);

    let err = h.state.ledger.today_view(a).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AccountDisabled);
}

#[tokio::test]
async fn operator_secret_unset_disables_registration() {
    let h = harness("2024-03-01").await;
    let err = h
        .state
        .accounts
        .register_operator(
            shared::models::AccountCreate {
                name: "Op".into(),
                email: "op2@x.com".into(),
                phone: None,
            },
            "",
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OperatorSecretInvalid);
}

#[tokio::test]
async fn subscriber_listing_order() {
    let h = harness("2024-03-01").await;
    let first = h.member("first@x.com").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = h.pending_member("second@x.com").await;

    let subs = h.state.accounts.list_subscribers(h.operator).await.unwrap();
    let ids: Vec<i64> = subs.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![second.account_id, first.account_id]);

    let pending = h.state.accounts.list_pending(h.operator).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.account_id);
}
