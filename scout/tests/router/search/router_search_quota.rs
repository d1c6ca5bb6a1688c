use std::time::Duration;

use scout::{AttemptOutcome, PlaceholderFallback, Scout, ScoutError, SessionStatus};

use crate::helpers::{TWELVE_HOURS_MS, clock, desc, fails, returns, with_scripted};

#[tokio::test]
async fn all_adapters_out_of_quota_is_quota_exceeded() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 1).daily_quota(0));
    let (b, bb) = with_scripted(b, desc("b", 2).daily_quota(0));
    let scout = b.build().unwrap();

    let err = scout.search("ada", 5).await.unwrap_err();
    assert_eq!(
        err,
        ScoutError::QuotaExceeded {
            remaining: 0,
            reset_in_ms: TWELVE_HOURS_MS,
        }
    );
    assert!(a.search_calls().await.is_empty());
    assert!(bb.search_calls().await.is_empty());
}

#[tokio::test]
async fn spent_adapter_is_not_initialized() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 1).daily_quota(0));
    let scout = b.build().unwrap();
    a.set_init_failure(Some("missing credential")).await;

    let err = scout.search("ada", 5).await.unwrap_err();
    assert!(matches!(err, ScoutError::QuotaExceeded { remaining: 0, .. }));
    assert_eq!(a.init_calls().await, 0);

    a.set_init_failure(None).await;
    assert!(scout.search("ada", 5).await.is_err());
    assert_eq!(a.init_calls().await, 0);
}

#[tokio::test]
async fn quota_exhaustion_wins_over_fallback() {
    let b = Scout::builder()
        .clock(clock())
        .fallback(std::sync::Arc::new(PlaceholderFallback::default()));
    let (b, _a) = with_scripted(b, desc("a", 1).daily_quota(0));
    let scout = b.build().unwrap();

    assert!(matches!(
        scout.search("ada", 5).await,
        Err(ScoutError::QuotaExceeded { remaining: 0, .. })
    ));
}

#[tokio::test]
async fn out_of_quota_adapter_does_not_use_an_attempt() {
    let b = Scout::builder().clock(clock()).attempt_cap(1);
    let (b, _a) = with_scripted(b, desc("a", 1).daily_quota(0));
    let (b, bb) = with_scripted(b, desc("b", 2));
    let scout = b.build().unwrap();
    bb.set_search_behavior(returns(&[("Ada Lovelace", "ada")])).await;

    let report = scout.search("ada", 5).await.unwrap();
    assert_eq!(report.status, SessionStatus::Succeeded);
    assert!(matches!(report.attempts[0].outcome, AttemptOutcome::QuotaExceeded));
    assert!(!report.attempts[0].outcome.invoked());
    assert_eq!(report.records.len(), 1);
}

#[tokio::test]
async fn quota_and_failures_mixed_is_exhausted() {
    let b = Scout::builder().clock(clock());
    let (b, _a) = with_scripted(b, desc("a", 1).daily_quota(0));
    let (b, bb) = with_scripted(b, desc("b", 2));
    let scout = b.build().unwrap();
    bb.set_search_behavior(fails("b")).await;

    match scout.search("ada", 5).await {
        Err(ScoutError::AllBackendsExhausted(errors)) => {
            assert_eq!(errors.len(), 2);
            assert!(matches!(errors[0], ScoutError::QuotaExceeded { .. }));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn quota_is_spent_across_sessions_and_refills_at_midnight() {
    let clock = clock();
    let b = Scout::builder().clock(clock.clone());
    let (b, a) = with_scripted(b, desc("a", 1).daily_quota(2));
    let scout = b.build().unwrap();
    a.set_search_behavior(returns(&[("Ada Lovelace", "ada")])).await;

    scout.search("ada", 1).await.unwrap();
    scout.search("ada", 1).await.unwrap();
    assert!(matches!(
        scout.search("ada", 1).await,
        Err(ScoutError::QuotaExceeded { .. })
    ));
    assert_eq!(a.search_calls().await.len(), 2);

    clock.advance(Duration::from_secs(12 * 3600));
    scout.search("ada", 1).await.unwrap();
    assert_eq!(scout.describe_registry()[0].state.remaining_quota, 1);
}

#[tokio::test(start_paused = true)]
async fn cooldown_blocks_until_elapsed() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 1).cooldown(Duration::from_secs(10)));
    let scout = b.build().unwrap();
    a.set_search_behavior(returns(&[("Ada Lovelace", "ada")])).await;

    let started = tokio::time::Instant::now();
    scout.search("ada", 1).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));

    let report = scout.search("ada", 1).await.unwrap();
    assert_eq!(report.status, SessionStatus::Succeeded);
    assert!(started.elapsed() >= Duration::from_secs(10));
}
