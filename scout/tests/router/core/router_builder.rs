use std::sync::Arc;
use std::time::Duration;

use scout::{AdapterDescriptor, AdapterKey, CacheConfig, CacheMiddleware, Scout, ScoutError};
use scout_mock::MockAdapter;

use crate::helpers::{desc, returns, scripted, with_scripted};

fn invalid(result: Result<Scout, ScoutError>) -> String {
    match result {
        Err(ScoutError::InvalidArg(msg)) => msg,
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("builder accepted an invalid configuration"),
    }
}

#[test]
fn empty_registry_is_rejected() {
    assert!(invalid(Scout::builder().build()).contains("no adapters"));
}

#[test]
fn zero_cap_and_threshold_are_rejected() {
    let (a, _) = scripted("a");
    let msg = invalid(
        Scout::builder()
            .with_adapter(desc("a", 1), a.clone())
            .attempt_cap(0)
            .build(),
    );
    assert!(msg.contains("attempt_cap"));
    let msg = invalid(
        Scout::builder()
            .with_adapter(desc("a", 1), a)
            .failure_threshold(0)
            .build(),
    );
    assert!(msg.contains("failure_threshold"));
}

#[test]
fn duplicate_and_mismatched_ids_are_rejected() {
    let (a, _) = scripted("a");
    let msg = invalid(
        Scout::builder()
            .with_adapter(desc("a", 1), a.clone())
            .with_adapter(desc("a", 2), a.clone())
            .build(),
    );
    assert!(msg.contains("registered twice"));

    let msg = invalid(Scout::builder().with_adapter(desc("b", 1), a).build());
    assert!(msg.contains("does not match"));
}

#[test]
fn out_of_range_trust_is_rejected() {
    let (a, _) = scripted("a");
    let msg = invalid(
        Scout::builder()
            .with_adapter(desc("a", 1).trust(101), a)
            .build(),
    );
    assert!(msg.contains("trust"));
}

#[test]
fn middleware_for_unknown_adapter_is_rejected() {
    let (a, _) = scripted("a");
    let msg = invalid(
        Scout::builder()
            .with_adapter(desc("a", 1), a)
            .with_middleware(
                AdapterKey::new("ghost"),
                Box::new(CacheMiddleware::new(CacheConfig::default())),
            )
            .build(),
    );
    assert!(msg.contains("ghost"));
}

#[test]
fn config_reflects_builder_modifiers() {
    let scout = Scout::builder()
        .with_adapter(
            AdapterDescriptor::new(AdapterKey::new("scout-mock"), "Mock"),
            Arc::new(MockAdapter::new()),
        )
        .attempt_cap(4)
        .adapter_timeout(Duration::from_secs(30))
        .failure_threshold(5)
        .health_check_timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let cfg = scout.config();
    assert_eq!(cfg.attempt_cap, 4);
    assert_eq!(cfg.adapter_timeout, Duration::from_secs(30));
    assert_eq!(cfg.failure_threshold, 5);
    assert_eq!(cfg.health_check_timeout, Duration::from_secs(2));

    let registry = scout.describe_registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry[0].descriptor.priority, 100);
    assert_eq!(registry[0].state.remaining_quota, 50);
    assert!(registry[0].supports_detail);
}

#[tokio::test]
async fn cache_middleware_serves_repeats_without_reaching_the_backend() {
    let b = Scout::builder().clock(crate::helpers::clock());
    let (b, a) = with_scripted(b, desc("a", 1));
    let scout = b
        .with_middleware(
            AdapterKey::new("a"),
            Box::new(CacheMiddleware::new(CacheConfig::default())),
        )
        .build()
        .unwrap();
    a.set_search_behavior(returns(&[("Ada Lovelace", "ada")])).await;

    let first = scout.search("Ada  Lovelace", 5).await.unwrap();
    let second = scout.search("ada lovelace", 5).await.unwrap();
    assert_eq!(first.records, second.records);
    assert_eq!(a.search_calls().await.len(), 1);
}

#[tokio::test]
async fn close_is_idempotent_and_sessions_reinitialize() {
    let b = Scout::builder().clock(crate::helpers::clock());
    let (b, a) = with_scripted(b, desc("a", 1));
    let scout = b.build().unwrap();
    a.set_search_behavior(returns(&[("Ada Lovelace", "ada")])).await;

    scout.search("ada", 5).await.unwrap();
    scout.close().await;
    scout.close().await;
    assert_eq!(a.close_calls().await, 2);

    scout.search("ada", 5).await.unwrap();
    assert_eq!(a.init_calls().await, 2);
}
