use std::time::Duration;

use scout::{AttemptOutcome, Scout, ScoutError, SessionStatus};
use scout_mock::MockBehavior;

use crate::helpers::{clock, desc, returns, with_scripted};

#[tokio::test(start_paused = true)]
async fn hung_adapter_times_out_and_fails_over() {
    let b = Scout::builder()
        .clock(clock())
        .adapter_timeout(Duration::from_secs(1));
    let (b, a) = with_scripted(b, desc("a", 1));
    let (b, bb) = with_scripted(b, desc("b", 2));
    let scout = b.build().unwrap();
    a.set_search_behavior(MockBehavior::Hang).await;
    bb.set_search_behavior(returns(&[("Ada Lovelace", "ada")])).await;

    let report = scout.search("ada", 5).await.unwrap();
    assert_eq!(report.status, SessionStatus::Succeeded);
    assert_eq!(
        report.warnings,
        vec![ScoutError::BackendTimeout {
            adapter: "a".into(),
            timeout_ms: 1_000,
        }]
    );
    assert!(matches!(report.attempts[0].outcome, AttemptOutcome::Failed { .. }));
    assert_eq!(scout.describe_registry()[0].state.consecutive_failures, 1);
}

#[tokio::test(start_paused = true)]
async fn slow_adapter_within_timeout_succeeds() {
    let b = Scout::builder()
        .clock(clock())
        .adapter_timeout(Duration::from_secs(5));
    let (b, a) = with_scripted(b, desc("a", 1));
    let scout = b.build().unwrap();
    a.set_search_behavior(MockBehavior::Slow(
        Duration::from_secs(3),
        crate::helpers::people(&[("Ada Lovelace", "ada")]),
    ))
    .await;

    let report = scout.search("ada", 5).await.unwrap();
    assert_eq!(report.records.len(), 1);
    assert!(report.attempts[0].duration_ms >= 3_000);
}
