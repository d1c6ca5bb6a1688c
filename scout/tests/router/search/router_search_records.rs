use scout::{RawResult, Scout, SessionStatus};
use scout_mock::MockBehavior;

use crate::helpers::{clock, desc, raw_person, with_scripted};

#[tokio::test]
async fn duplicates_keep_the_most_confident_record() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 1));
    let scout = b.build().unwrap();
    a.set_search_behavior(MockBehavior::Return(vec![
        RawResult::new()
            .with("name", "Ada L.")
            .with("url", "https://people.example.com/in/ada-lovelace?trk=feed")
            .with("confidence", 60),
        RawResult::new()
            .with("name", "Ada Lovelace")
            .with("url", "https://people.example.com/in/ada-lovelace")
            .with("confidence", 90),
    ]))
    .await;

    let report = scout.search("ada", 10).await.unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].confidence, 90);
    assert_eq!(report.records[0].display_name, "Ada Lovelace");
    assert_eq!(report.records[0].identity_key.as_str(), "ada-lovelace");
}

#[tokio::test]
async fn unusable_raw_records_are_dropped_and_counted() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 1));
    let (b, bb) = with_scripted(b, desc("b", 2));
    let scout = b.build().unwrap();
    a.set_search_behavior(MockBehavior::Return(vec![
        RawResult::new().with("name", "No Link"),
        RawResult::new().with("url", "https://people.example.com/in/nameless"),
    ]))
    .await;
    bb.set_search_behavior(MockBehavior::Return(vec![
        raw_person("Ada Lovelace", "ada"),
        RawResult::new().with("headline", "Mathematician"),
    ]))
    .await;

    let report = scout.search("ada", 10).await.unwrap();
    assert_eq!(report.status, SessionStatus::Succeeded);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.dropped, 3);
}

#[tokio::test]
async fn records_are_ranked_and_truncated_to_limit() {
    let b = Scout::builder().clock(clock());
    let (b, a) = with_scripted(b, desc("a", 1).trust(50));
    let scout = b.build().unwrap();
    let raws = [("d", 40), ("b", 80), ("a", 80), ("c", 100)]
        .iter()
        .map(|(slug, score)| raw_person(slug, slug).with("score", *score))
        .collect();
    a.set_search_behavior(MockBehavior::Return(raws)).await;

    let report = scout.search("anyone", 3).await.unwrap();
    let keys: Vec<_> = report
        .records
        .iter()
        .map(|r| (r.identity_key.as_str().to_string(), r.confidence))
        .collect();
    assert_eq!(
        keys,
        vec![("c".to_string(), 50), ("a".to_string(), 40), ("b".to_string(), 40)]
    );
}
