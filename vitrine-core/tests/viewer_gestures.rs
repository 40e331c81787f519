mod support;

use std::time::Duration;

use support::{ViewerHarness, slide};
use vitrine_core::prelude::*;
use vitrine_core::testing::{AnimateMode, StageEvent};

#[tokio::test]
async fn drag_follows_pointer_then_commits_forward() {
    let harness = ViewerHarness::start("?slide=10", AnimateMode::AutoComplete).await;

    harness.handle.drag_started(400.0).unwrap();
    harness.handle.drag_moved(380.0).unwrap();
    harness.handle.drag_moved(320.0).unwrap();
    harness.handle.drag_released(300.0).unwrap();
    harness.wait_for_rests(2).await;

    let events = harness.stage.events();
    assert!(events.contains(&StageEvent::Followed(-20.0)));
    assert!(events.contains(&StageEvent::Followed(-80.0)));
    assert_eq!(harness.counter(), "11 / 40");
    harness.shutdown().await;
}

#[tokio::test]
async fn drag_right_commits_backward() {
    let harness = ViewerHarness::start("?slide=10", AnimateMode::AutoComplete).await;

    harness.handle.drag_started(100.0).unwrap();
    harness.handle.drag_released(190.0).unwrap();
    harness.wait_for_rests(2).await;

    assert_eq!(harness.counter(), "9 / 40");
    harness.shutdown().await;
}

#[tokio::test]
async fn short_drag_snaps_back() {
    let harness = ViewerHarness::start("?slide=10", AnimateMode::AutoComplete).await;

    harness.handle.drag_started(400.0).unwrap();
    harness.handle.drag_moved(396.0).unwrap();
    harness.handle.drag_released(395.0).unwrap();
    harness
        .stage
        .wait_until(|events| {
            events
                .iter()
                .any(|event| matches!(event, StageEvent::Rested(Motion::Animated(_))))
        })
        .await;

    assert!(harness.stage.events().contains(&StageEvent::Rested(
        Motion::Animated(Duration::from_millis(450))
    )));
    assert_eq!(harness.animations(), 0);
    assert_eq!(harness.counter(), "10 / 40");
    assert_eq!(harness.shutdown().await, slide(10));
}

#[tokio::test]
async fn drag_started_while_animating_is_ignored() {
    let harness = ViewerHarness::start("?slide=10", AnimateMode::Manual).await;

    harness.handle.next().unwrap();
    harness.wait_for_animations(1).await;

    harness.handle.drag_started(400.0).unwrap();
    harness.handle.drag_moved(200.0).unwrap();
    harness.handle.drag_released(100.0).unwrap();
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    harness.stage.complete_pending();
    harness.wait_for_rests(2).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    assert_eq!(harness.animations(), 1);
    assert_eq!(
        harness
            .stage
            .count(|event| matches!(event, StageEvent::Followed(_))),
        0
    );
    assert_eq!(harness.counter(), "11 / 40");
    harness.shutdown().await;
}

#[tokio::test]
async fn resize_cancels_an_active_drag() {
    let harness = ViewerHarness::start("?slide=10", AnimateMode::AutoComplete).await;

    harness.handle.drag_started(400.0).unwrap();
    harness.handle.resized(900.0).unwrap();
    harness.handle.drag_released(100.0).unwrap();
    harness.wait_for_rests(2).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    assert_eq!(harness.animations(), 0);
    assert_eq!(harness.counter(), "10 / 40");
    harness.shutdown().await;
}
