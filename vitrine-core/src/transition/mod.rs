//! The `Idle -> Animating -> Idle` slide handoff.

pub mod stage;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use vitrine_model::Direction;

use crate::settings::TransitionSettings;
pub use stage::{
    AnimationCompletion, CompletionSignal, Motion, Panels, SlideBinding, Stage,
    StageFrame, completion_pair,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    #[default]
    Idle,
    Animating,
}

/// How the animation phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Completed,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub direction: Direction,
    pub finish: Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    pub ready_timeout: Duration,
    pub animation: Duration,
    pub safety_timeout: Duration,
}

impl From<&TransitionSettings> for TransitionTimings {
    fn from(settings: &TransitionSettings) -> Self {
        Self {
            ready_timeout: settings.ready_timeout(),
            animation: settings.animation(),
            safety_timeout: settings.safety_timeout(),
        }
    }
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self::from(&TransitionSettings::default())
    }
}

/// Animates one panel towards `direction`.
///
/// Waits (bounded) for the incoming slide to decode and rebinds the stage
/// with it, yields a frame, then starts the animation. Always finishes:
/// either the stage reports completion or the safety timeout fires.
pub async fn run_transition<I>(
    stage: Arc<dyn Stage<I>>,
    direction: Direction,
    panels: Panels<I>,
    timings: TransitionTimings,
) -> TransitionOutcome
where
    I: Clone + Send + Sync + 'static,
{
    let incoming = panels.incoming(direction);
    if tokio::time::timeout(timings.ready_timeout, incoming.ready())
        .await
        .is_err()
    {
        debug!(slide = %incoming.slide(), "incoming slide not ready; animating anyway");
    }
    stage.bind(panels.frame());

    stage.next_frame().await;
    let completion = stage.animate(direction, timings.animation);
    let finish = first_of(completion, timings.safety_timeout).await;

    TransitionOutcome { direction, finish }
}

/// Resolves on the first of the completion signal or `safety`. A dropped
/// signal never resolves, so it falls through to the timeout.
pub async fn first_of(completion: AnimationCompletion, safety: Duration) -> Finish {
    let signalled = async {
        if !completion.wait().await {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = signalled => Finish::Completed,
        () = tokio::time::sleep(safety) => {
            debug!(?safety, "animation completion missed; finishing on timeout");
            Finish::TimedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn completion_before_timeout_wins() {
        let (signal, completion) = completion_pair();
        signal.complete();
        assert_eq!(
            first_of(completion, Duration::from_millis(1200)).await,
            Finish::Completed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn silent_stage_times_out() {
        let (_signal, completion) = completion_pair();
        let started = tokio::time::Instant::now();
        assert_eq!(
            first_of(completion, Duration::from_millis(1200)).await,
            Finish::TimedOut
        );
        assert!(started.elapsed() >= Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_signal_falls_through_to_timeout() {
        let (signal, completion) = completion_pair();
        drop(signal);
        assert_eq!(
            first_of(completion, Duration::from_millis(50)).await,
            Finish::TimedOut
        );
    }
}
