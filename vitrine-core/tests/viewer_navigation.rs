mod support;

use std::path::Path;

use support::{ViewerHarness, slide};
use vitrine_core::prelude::*;
use vitrine_core::testing::{AnimateMode, ScriptedDecoder, StageEvent};

#[tokio::test]
async fn initial_deep_link_is_clamped() {
    let harness = ViewerHarness::start("?slide=999", AnimateMode::AutoComplete).await;

    assert_eq!(harness.counter(), "40 / 40");
    assert_eq!(harness.location_slide().as_deref(), Some("40"));
    assert_eq!(harness.shutdown().await, slide(40));
}

#[tokio::test]
async fn missing_deep_link_starts_at_first_slide() {
    let harness = ViewerHarness::start("?theme=dark", AnimateMode::AutoComplete).await;

    assert_eq!(harness.counter(), "1 / 40");
    assert_eq!(harness.location.current().query(), Some("theme=dark&slide=1"));
    harness.shutdown().await;
}

#[tokio::test]
async fn next_wraps_past_the_last_slide() {
    let harness = ViewerHarness::start("?slide=39", AnimateMode::AutoComplete).await;

    harness.handle.next().unwrap();
    harness.wait_for_rests(2).await;
    assert_eq!(harness.counter(), "40 / 40");

    harness.handle.next().unwrap();
    harness.wait_for_rests(3).await;
    assert_eq!(harness.counter(), "1 / 40");
    assert_eq!(harness.location_slide().as_deref(), Some("1"));

    assert_eq!(harness.shutdown().await, slide(1));
}

#[tokio::test]
async fn previous_from_first_slide_wraps_and_animates_backward() {
    let harness = ViewerHarness::start("?slide=1", AnimateMode::AutoComplete).await;

    harness.handle.previous().unwrap();
    harness.wait_for_rests(2).await;

    assert_eq!(harness.counter(), "40 / 40");
    assert!(harness.stage.events().iter().any(|event| matches!(
        event,
        StageEvent::Animated(Direction::Backward, _)
    )));
    harness.shutdown().await;
}

#[tokio::test]
async fn navigation_replaces_the_location() {
    let harness = ViewerHarness::start("?slide=5", AnimateMode::AutoComplete).await;

    for expected in 6..=9 {
        harness.handle.next().unwrap();
        harness.wait_for_rests(expected - 4).await;
    }

    let history = harness.location.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].query(), Some("slide=9"));
    harness.shutdown().await;
}

#[tokio::test]
async fn rebinding_includes_neighbours_and_counter() {
    let harness = ViewerHarness::start("?slide=12", AnimateMode::AutoComplete).await;

    harness.handle.next().unwrap();
    harness.wait_for_rests(2).await;

    let frame = harness.stage.last_frame().expect("bound frame");
    assert_eq!(frame.previous.slide, slide(12));
    assert_eq!(frame.current.slide, slide(13));
    assert_eq!(frame.next.slide, slide(14));
    assert_eq!(frame.current.location, Path::new("img/13.jpeg"));
    assert_eq!(frame.counter.to_string(), "13 / 40");
    harness.shutdown().await;
}

#[tokio::test]
async fn decode_failure_does_not_block_advance() {
    let decoder = ScriptedDecoder::failing(["img/02.jpeg"]);
    let harness = ViewerHarness::start_with(
        "?slide=1",
        AnimateMode::AutoComplete,
        decoder,
        support::patient_settings(),
    )
    .await;

    harness.handle.next().unwrap();
    harness.wait_for_rests(2).await;

    let frame = harness.stage.last_frame().expect("bound frame");
    assert_eq!(frame.counter.to_string(), "2 / 40");
    assert_eq!(frame.current.image, None);
    assert_eq!(frame.next.image.as_deref(), Some(Path::new("img/03.jpeg")));
    assert_eq!(harness.location_slide().as_deref(), Some("2"));
    harness.shutdown().await;
}

#[tokio::test]
async fn go_to_jumps_without_animating() {
    let harness = ViewerHarness::start("?slide=3", AnimateMode::AutoComplete).await;

    harness.handle.go_to(slide(25)).unwrap();
    harness.wait_for_rests(2).await;

    assert_eq!(harness.counter(), "25 / 40");
    assert_eq!(harness.animations(), 0);
    assert_eq!(harness.location_slide().as_deref(), Some("25"));
    assert_eq!(harness.location.history().len(), 1);
    harness.shutdown().await;
}

#[tokio::test]
async fn navigation_engages_once() {
    let harness = ViewerHarness::start("?slide=3", AnimateMode::AutoComplete).await;

    harness.handle.next().unwrap();
    harness.wait_for_rests(2).await;
    harness.handle.next().unwrap();
    harness.wait_for_rests(3).await;

    let engaged = harness
        .stage
        .count(|event| matches!(event, StageEvent::Engaged(true)));
    assert_eq!(engaged, 1);
    harness.shutdown().await;
}

#[tokio::test]
async fn resize_recentres_without_moving() {
    let harness = ViewerHarness::start("?slide=8", AnimateMode::AutoComplete).await;

    harness.handle.resized(1280.0).unwrap();
    harness.wait_for_rests(2).await;

    assert_eq!(harness.counter(), "8 / 40");
    assert_eq!(harness.animations(), 0);
    harness.shutdown().await;
}

#[tokio::test]
async fn exit_leaves_the_viewer() {
    let harness = ViewerHarness::start("?slide=4", AnimateMode::AutoComplete).await;
    let stage = harness.stage.clone();

    assert_eq!(harness.shutdown().await, slide(4));
    assert!(matches!(stage.events().last(), Some(StageEvent::Exited)));
}

#[tokio::test]
async fn dropping_every_handle_stops_the_viewer() {
    let ViewerHarness { handle, task, stage, .. } =
        ViewerHarness::start("?slide=6", AnimateMode::AutoComplete).await;

    drop(handle);

    assert_eq!(task.await.unwrap(), slide(6));
    assert!(!stage.events().contains(&StageEvent::Exited));
}

#[tokio::test]
async fn initial_window_is_preloaded() {
    let harness = ViewerHarness::start("?slide=20", AnimateMode::AutoComplete).await;

    // Radius 2 around slide 20.
    assert_eq!(harness.decoder.decode_count(), 5);
    let frame = harness.stage.last_frame().expect("bound frame");
    assert!(frame.previous.image.is_some());
    assert!(frame.current.image.is_some());
    assert!(frame.next.image.is_some());
    harness.shutdown().await;
}
