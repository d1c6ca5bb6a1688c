use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scout::{
    AdapterHealth, AdapterKey, AdapterMode, BackendAdapter, HealthStatus, OverallHealth, Query,
    RawResult, Scout, ScoutError,
};

use crate::helpers::{clock, desc, fails, returns, with_scripted};

#[tokio::test]
async fn fresh_registry_is_healthy() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 2));
    let (b, _bb) = with_scripted(b, desc("b", 1).daily_quota(7));
    let scout = b.build().unwrap();
    a.set_supports_detail(true);

    let snapshot = scout.health_check().await;
    assert_eq!(snapshot.overall, OverallHealth::Healthy);
    assert!(!snapshot.fallback_only);
    assert_eq!(snapshot.checked_at, crate::helpers::noon());

    let ids: Vec<_> = snapshot.per_adapter.iter().map(|r| r.adapter_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(snapshot.per_adapter[0].remaining_quota, 7);
    assert!(!snapshot.per_adapter[0].supports_detail);
    assert!(snapshot.per_adapter[1].supports_detail);
    assert!(snapshot.per_adapter.iter().all(|r| r.status == HealthStatus::Ok));
}

#[tokio::test]
async fn exhausted_quota_everywhere_is_down() {
    let b = Scout::builder().clock(clock());
    let (b, _a) = with_scripted(b, desc("a", 1).daily_quota(0));
    let scout = b.build().unwrap();

    assert_eq!(scout.health_check().await.overall, OverallHealth::Down);
}

#[tokio::test]
async fn disabled_adapter_and_cooling_adapter_make_degraded() {
    let b = Scout::builder().clock(clock()).failure_threshold(1);
    let (b, a) = with_scripted(b, desc("a", 1));
    let (b, bb) = with_scripted(b, desc("b", 2).cooldown(Duration::from_secs(60)));
    let scout = b.build().unwrap();
    a.set_search_behavior(fails("a")).await;
    bb.set_search_behavior(returns(&[("Ada Lovelace", "ada")])).await;

    scout.search("ada", 5).await.unwrap();
    let snapshot = scout.health_check().await;
    assert_eq!(snapshot.per_adapter[0].mode, AdapterMode::Disabled);
    assert_eq!(snapshot.per_adapter[1].mode, AdapterMode::CoolingDown);
    assert_eq!(snapshot.overall, OverallHealth::Degraded);
    assert!(
        snapshot.per_adapter[0]
            .last_error
            .as_deref()
            .unwrap()
            .contains("unparseable")
    );
}

#[tokio::test]
async fn only_adapter_disabled_is_down() {
    let b = Scout::builder().clock(clock()).failure_threshold(1);
    let (b, a) = with_scripted(b, desc("a", 1));
    let scout = b.build().unwrap();
    a.set_search_behavior(fails("a")).await;

    assert!(scout.search("ada", 5).await.is_err());
    assert_eq!(scout.health_check().await.overall, OverallHealth::Down);

    scout.set_mode(false);
    assert_eq!(scout.health_check().await.overall, OverallHealth::Healthy);
}

#[tokio::test]
async fn unavailable_self_check_is_captured_not_propagated() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 1));
    let scout = b.build().unwrap();
    a.set_health(AdapterHealth::unavailable("browser binary missing"))
        .await;

    let snapshot = scout.health_check().await;
    let report = &snapshot.per_adapter[0];
    assert_eq!(report.status, HealthStatus::Unavailable);
    assert_eq!(report.last_error.as_deref(), Some("browser binary missing"));
    // Aggregate health follows quota state, not self-reports.
    assert_eq!(snapshot.overall, OverallHealth::Healthy);
}

#[tokio::test]
async fn fallback_only_mode_caps_overall_at_degraded() {
    let b = Scout::builder().clock(clock());
    let (b, _a) = with_scripted(b, desc("a", 1));
    let scout = b.build().unwrap();

    scout.set_mode(true);
    let snapshot = scout.health_check().await;
    assert!(snapshot.fallback_only);
    assert_eq!(snapshot.overall, OverallHealth::Degraded);
}

#[tokio::test]
async fn snapshot_serializes_with_screaming_modes() {
    let b = Scout::builder().clock(clock());
    let (b, _a) = with_scripted(b, desc("a", 1));
    let scout = b.build().unwrap();

    let json = serde_json::to_value(scout.health_check().await).unwrap();
    assert_eq!(json["overall"], "HEALTHY");
    assert_eq!(json["per_adapter"][0]["mode"], "ACTIVE");
    assert_eq!(json["per_adapter"][0]["adapter_id"], "a");
}

/// Adapter whose self-check never answers.
struct StuckHealth;

#[async_trait]
impl BackendAdapter for StuckHealth {
    fn key(&self) -> AdapterKey {
        AdapterKey::new("stuck")
    }

    async fn search(&self, _query: &Query) -> Result<Vec<RawResult>, ScoutError> {
        Ok(Vec::new())
    }

    async fn health_check(&self) -> AdapterHealth {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn hung_self_check_times_out_as_unavailable() {
    let scout = Scout::builder()
        .clock(clock())
        .health_check_timeout(Duration::from_millis(300))
        .with_adapter(desc("stuck", 1), Arc::new(StuckHealth))
        .build()
        .unwrap();

    let snapshot = scout.health_check().await;
    let report = &snapshot.per_adapter[0];
    assert_eq!(report.status, HealthStatus::Unavailable);
    assert!(report.last_error.as_deref().unwrap().contains("timed out"));
    assert!(!report.supports_detail);
}
