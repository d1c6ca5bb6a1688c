use proptest::prelude::*;
use scout::{Scout, ScoutError, SessionStatus};
use scout_mock::MockBehavior;

use crate::helpers::{clock, desc, fails, returns, with_scripted};

const NAMES: [&str; 4] = ["p0", "p1", "p2", "p3"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Answer,
    Empty,
    Fail,
    NoQuota,
}

fn script() -> impl Strategy<Value = Script> {
    prop_oneof![
        Just(Script::Answer),
        Just(Script::Empty),
        Just(Script::Fail),
        Just(Script::NoQuota),
    ]
}

#[derive(Debug, PartialEq, Eq)]
enum Expected {
    Succeeded { invoked: usize },
    QuotaExceeded,
    Exhausted { invoked: usize, errors: usize },
}

/// Reference walk over adapters already sorted into failover order.
fn model(order: &[Script], cap: usize) -> Expected {
    let (mut invoked, mut consulted, mut quota, mut errors) = (0, 0, 0, 0);
    for s in order {
        if invoked >= cap {
            break;
        }
        consulted += 1;
        match s {
            Script::Answer => return Expected::Succeeded { invoked: invoked + 1 },
            Script::Empty => invoked += 1,
            Script::Fail => {
                invoked += 1;
                errors += 1;
            }
            Script::NoQuota => {
                quota += 1;
                errors += 1;
            }
        }
    }
    if invoked == 0 && consulted > 0 && quota == consulted {
        Expected::QuotaExceeded
    } else {
        Expected::Exhausted { invoked, errors }
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn session_matches_reference_walk(
        adapters in prop::collection::vec((script(), 0u32..3), 1..=4),
        cap in 1usize..=4,
    ) {
        tokio_test::block_on(async move {
            let mut b = Scout::builder().clock(clock()).attempt_cap(cap);
            let mut ctrls = Vec::new();
            for (i, (s, priority)) in adapters.iter().enumerate() {
                let quota = if *s == Script::NoQuota { 0 } else { 10 };
                let (next, ctrl) = with_scripted(b, desc(NAMES[i], *priority).daily_quota(quota));
                b = next;
                match s {
                    Script::Answer => {
                        ctrl.set_search_behavior(returns(&[("Ada Lovelace", "ada")]))
                            .await;
                    }
                    Script::Empty => {
                        ctrl.set_search_behavior(MockBehavior::Return(Vec::new()))
                            .await;
                    }
                    Script::Fail => ctrl.set_search_behavior(fails(NAMES[i])).await,
                    Script::NoQuota => {}
                }
                ctrls.push(ctrl);
            }
            let scout = b.build().unwrap();

            let mut order: Vec<usize> = (0..adapters.len()).collect();
            order.sort_by_key(|&i| adapters[i].1);
            let scripts: Vec<Script> = order.iter().map(|&i| adapters[i].0).collect();
            let expected = model(&scripts, cap);

            let mut calls = 0;
            let result = scout.search("ada", 5).await;
            for c in &ctrls {
                calls += c.search_calls().await.len();
            }

            match (expected, result) {
                (Expected::Succeeded { invoked }, Ok(report)) => {
                    assert_eq!(report.status, SessionStatus::Succeeded);
                    assert_eq!(report.records.len(), 1);
                    assert_eq!(calls, invoked);
                }
                (Expected::QuotaExceeded, Err(ScoutError::QuotaExceeded { .. })) => {
                    assert_eq!(calls, 0);
                }
                (
                    Expected::Exhausted { invoked, errors },
                    Err(ScoutError::AllBackendsExhausted(es)),
                ) => {
                    assert_eq!(es.len(), errors);
                    assert_eq!(calls, invoked);
                    assert!(invoked <= cap);
                }
                (expected, got) => panic!("expected {expected:?}, got {got:?}"),
            }
        });
    }
}
