use std::sync::Arc;
use std::time::Duration;

use scout::{AttemptOutcome, Scout};
use scout_mock::MockBehavior;

use crate::helpers::{clock, desc, people, returns, with_scripted};

#[tokio::test(start_paused = true)]
async fn concurrent_sessions_are_serialized() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 1));
    let scout = b.build().unwrap();
    a.set_search_behavior(MockBehavior::Slow(
        Duration::from_secs(1),
        people(&[("Ada Lovelace", "ada")]),
    ))
    .await;

    let started = tokio::time::Instant::now();
    let (r1, r2) = tokio::join!(scout.search("ada", 5), scout.search("lovelace", 5));
    assert!(r1.is_ok() && r2.is_ok());
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(a.search_calls().await.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sessions_can_run_from_spawned_tasks() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 1));
    let scout = Arc::new(b.build().unwrap());
    a.set_search_behavior(returns(&[("Ada Lovelace", "ada")])).await;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scout = Arc::clone(&scout);
            tokio::spawn(async move { scout.search("ada", 5).await })
        })
        .collect();
    for h in handles {
        assert_eq!(h.await.unwrap().unwrap().records.len(), 1);
    }
    assert_eq!(scout.describe_registry()[0].state.remaining_quota, 96);
}

#[tokio::test]
async fn initialization_failure_skips_adapter_without_spending_quota() {
    let b = Scout::builder().clock(clock()).attempt_cap(1);
    let (b, a) = with_scripted(b, desc("a", 1).daily_quota(5));
    let (b, bb) = with_scripted(b, desc("b", 2));
    let scout = b.build().unwrap();
    a.set_init_failure(Some("missing api key")).await;
    bb.set_search_behavior(returns(&[("Ada Lovelace", "ada")])).await;

    let report = scout.search("ada", 5).await.unwrap();
    assert!(matches!(
        report.attempts[0].outcome,
        AttemptOutcome::InitializationFailed { .. }
    ));
    assert_eq!(report.records.len(), 1);
    let state = &scout.describe_registry()[0].state;
    assert_eq!(state.remaining_quota, 5);
    assert_eq!(state.consecutive_failures, 0);
    assert!(state.last_error.as_deref().unwrap().contains("missing api key"));
    assert!(a.search_calls().await.is_empty());

    // Initialization is retried by the next session and then sticks.
    a.set_init_failure(None).await;
    a.set_search_behavior(returns(&[("Grace Hopper", "grace")])).await;
    scout.search("grace", 5).await.unwrap();
    scout.search("grace", 5).await.unwrap();
    assert_eq!(a.init_calls().await, 2);
}
