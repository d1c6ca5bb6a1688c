use std::time::Duration;

use scout::{AttemptOutcome, CancellationToken, PlaceholderFallback, Scout, SessionStatus};
use scout_mock::MockBehavior;

use crate::helpers::{clock, desc, returns, with_scripted};

#[tokio::test]
async fn cancelled_before_start_invokes_nothing() {
    let b = Scout::builder()
        .clock(clock())
        .fallback(std::sync::Arc::new(PlaceholderFallback::default()));
    let (b, a) = with_scripted(b, desc("a", 1));
    let scout = b.build().unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let report = scout.search_with_cancel("ada", 5, &token).await.unwrap();
    assert!(report.cancelled);
    assert_eq!(report.status, SessionStatus::Exhausted);
    assert!(report.records.is_empty());
    assert!(report.attempts.is_empty());
    assert!(a.search_calls().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_is_observed_between_adapters() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 1));
    let (b, bb) = with_scripted(b, desc("b", 2));
    let scout = b.build().unwrap();
    a.set_search_behavior(MockBehavior::Slow(Duration::from_secs(2), Vec::new()))
        .await;
    bb.set_search_behavior(returns(&[("Ada Lovelace", "ada")])).await;

    let token = CancellationToken::new();
    let (report, ()) = tokio::join!(scout.search_with_cancel("ada", 5, &token), async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        token.cancel();
    });
    let report = report.unwrap();

    // The in-flight call ran to completion; the next adapter was never invoked.
    assert!(report.cancelled);
    assert_eq!(report.attempts.len(), 1);
    assert!(matches!(report.attempts[0].outcome, AttemptOutcome::Empty));
    assert!(bb.search_calls().await.is_empty());
}
