mod support;

use std::time::Duration;

use support::{ViewerHarness, patient_settings, slide};
use vitrine_core::prelude::*;
use vitrine_core::testing::{AnimateMode, ScriptedDecoder, StageEvent};

#[tokio::test]
async fn navigation_while_animating_is_dropped() {
    let harness = ViewerHarness::start("?slide=5", AnimateMode::Manual).await;

    harness.handle.next().unwrap();
    harness.wait_for_animations(1).await;

    harness.handle.next().unwrap();
    harness.handle.previous().unwrap();
    harness.handle.go_to(slide(30)).unwrap();
    harness.handle.resized(640.0).unwrap();
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    assert_eq!(harness.counter(), "5 / 40");

    assert_eq!(harness.stage.complete_pending(), 1);
    harness.wait_for_rests(2).await;

    // Give any queued request a chance to (wrongly) start another transition.
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    assert_eq!(harness.animations(), 1);
    assert_eq!(harness.counter(), "6 / 40");
    assert_eq!(harness.shutdown().await, slide(6));
}

#[tokio::test]
async fn navigation_resumes_after_transition_finishes() {
    let harness = ViewerHarness::start("?slide=10", AnimateMode::Manual).await;

    harness.handle.next().unwrap();
    harness.wait_for_animations(1).await;
    harness.stage.complete_pending();
    harness.wait_for_rests(2).await;

    harness.handle.next().unwrap();
    harness.wait_for_animations(2).await;
    harness.stage.complete_pending();
    harness.wait_for_rests(3).await;

    assert_eq!(harness.counter(), "12 / 40");
    harness.shutdown().await;
}

#[tokio::test]
async fn exit_during_transition_is_honoured() {
    let harness = ViewerHarness::start("?slide=2", AnimateMode::Manual).await;

    harness.handle.next().unwrap();
    harness.wait_for_animations(1).await;

    let stage = harness.stage.clone();
    assert_eq!(harness.shutdown().await, slide(2));
    assert!(matches!(stage.events().last(), Some(StageEvent::Exited)));
}

#[tokio::test(start_paused = true)]
async fn missed_completion_finishes_on_safety_timeout() {
    let harness = ViewerHarness::start_with(
        "?slide=7",
        AnimateMode::Manual,
        ScriptedDecoder::default(),
        ViewerSettings::default(),
    )
    .await;

    let started = tokio::time::Instant::now();
    harness.handle.next().unwrap();
    harness.wait_for_rests(2).await;

    assert!(started.elapsed() >= Duration::from_millis(1200));
    assert_eq!(harness.counter(), "8 / 40");
    assert_eq!(harness.location_slide().as_deref(), Some("8"));
    harness.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn dropped_completion_signal_falls_through_to_timeout() {
    let harness = ViewerHarness::start_with(
        "?slide=7",
        AnimateMode::Discard,
        ScriptedDecoder::default(),
        ViewerSettings::default(),
    )
    .await;

    let started = tokio::time::Instant::now();
    harness.handle.previous().unwrap();
    harness.wait_for_rests(2).await;

    assert!(started.elapsed() >= Duration::from_millis(1200));
    assert_eq!(harness.counter(), "6 / 40");
    harness.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn slow_incoming_slide_waits_at_most_the_ready_timeout() {
    // Slide 3 decodes far slower than the ready timeout.
    let decoder = ScriptedDecoder::default()
        .with_delay_for("img/03.jpeg", Duration::from_secs(30));
    let harness = ViewerHarness::start_with(
        "?slide=2",
        AnimateMode::AutoComplete,
        decoder,
        patient_settings(),
    )
    .await;

    let started = tokio::time::Instant::now();
    harness.handle.next().unwrap();
    harness.wait_for_rests(2).await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(600));
    assert!(elapsed < Duration::from_secs(30));
    let frame = harness.stage.last_frame().expect("bound frame");
    assert_eq!(frame.counter.to_string(), "3 / 40");
    assert_eq!(frame.current.image, None);
    harness.shutdown().await;
}

#[tokio::test]
async fn animation_uses_configured_duration() {
    let mut settings = patient_settings();
    settings.transition.animation_ms = 300;
    let harness = ViewerHarness::start_with(
        "?slide=1",
        AnimateMode::AutoComplete,
        ScriptedDecoder::default(),
        settings,
    )
    .await;

    harness.handle.next().unwrap();
    harness.wait_for_rests(2).await;

    assert!(harness.stage.events().contains(&StageEvent::Animated(
        Direction::Forward,
        Duration::from_millis(300)
    )));
    harness.shutdown().await;
}

#[tokio::test]
async fn transition_yields_a_frame_before_animating() {
    let harness = ViewerHarness::start("?slide=1", AnimateMode::AutoComplete).await;

    harness.handle.next().unwrap();
    harness.wait_for_rests(2).await;

    let events = harness.stage.events();
    let animated = events
        .iter()
        .position(|event| matches!(event, StageEvent::Animated(..)))
        .expect("animation started");
    assert_eq!(events[animated - 1], StageEvent::Frame);
    assert_eq!(events.last(), Some(&StageEvent::Rested(Motion::Instant)));
    harness.shutdown().await;
}
