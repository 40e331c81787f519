use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use vitrine_model::{Direction, SlideCounter, SlideNumber};

use crate::cache::ResidentImage;

/// One panel of the three-panel strip.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideBinding<I> {
    pub slide: SlideNumber,
    pub location: PathBuf,
    /// `None` while the decode is pending or after it failed.
    pub image: Option<I>,
}

impl<I: Clone + Send + Sync + 'static> SlideBinding<I> {
    pub fn from_resident(resident: &ResidentImage<I>) -> Self {
        Self {
            slide: resident.slide(),
            location: resident.location().to_path_buf(),
            image: resident.peek().cloned(),
        }
    }
}

/// Everything the stage shows at rest.
#[derive(Debug, Clone, PartialEq)]
pub struct StageFrame<I> {
    pub previous: SlideBinding<I>,
    pub current: SlideBinding<I>,
    pub next: SlideBinding<I>,
    pub counter: SlideCounter,
}

/// How the viewport returns to the centre panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Instant,
    Animated(Duration),
}

/// Resolves when the stage reports that an animation finished.
#[derive(Debug)]
pub struct AnimationCompletion {
    signal: oneshot::Receiver<()>,
}

impl AnimationCompletion {
    /// `true` when completion was reported, `false` when the stage dropped
    /// the signal without reporting.
    pub async fn wait(self) -> bool {
        self.signal.await.is_ok()
    }
}

/// Stage-side half of an [`AnimationCompletion`]. Clones share one signal;
/// only the first `complete` is delivered.
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl CompletionSignal {
    pub fn complete(&self) {
        if let Some(sender) = self.sender.lock().take() {
            let _ = sender.send(());
        }
    }

    pub fn is_completed(&self) -> bool {
        self.sender.lock().is_none()
    }
}

pub fn completion_pair() -> (CompletionSignal, AnimationCompletion) {
    let (sender, signal) = oneshot::channel();
    (
        CompletionSignal {
            sender: Arc::new(Mutex::new(Some(sender))),
        },
        AnimationCompletion { signal },
    )
}

/// The display surface a viewer drives.
///
/// Calls other than [`Stage::next_frame`] must not block: they hand work to
/// the surface and return.
#[async_trait]
pub trait Stage<I>: Send + Sync {
    /// Shows three panels and the position counter.
    fn bind(&self, frame: StageFrame<I>);

    /// Shifts the strip by `offset` pixels from rest while a drag is active.
    fn follow(&self, offset: f32);

    /// Slides the strip one panel towards `direction`.
    fn animate(&self, direction: Direction, duration: Duration) -> AnimationCompletion;

    fn rest(&self, motion: Motion);

    fn set_engaged(&self, engaged: bool);

    /// Resolves once the surface has presented a frame.
    async fn next_frame(&self);

    /// Leaves the viewer.
    fn exit(&self);
}

/// The residents behind the three panels around one slide.
#[derive(Debug, Clone)]
pub struct Panels<I> {
    pub previous: ResidentImage<I>,
    pub current: ResidentImage<I>,
    pub next: ResidentImage<I>,
    pub counter: SlideCounter,
}

impl<I: Clone + Send + Sync + 'static> Panels<I> {
    /// The panel revealed by moving towards `direction`.
    pub fn incoming(&self, direction: Direction) -> &ResidentImage<I> {
        match direction {
            Direction::Forward => &self.next,
            Direction::Backward => &self.previous,
        }
    }

    /// Snapshot of whatever has decoded so far.
    pub fn frame(&self) -> StageFrame<I> {
        StageFrame {
            previous: SlideBinding::from_resident(&self.previous),
            current: SlideBinding::from_resident(&self.current),
            next: SlideBinding::from_resident(&self.next),
            counter: self.counter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_completion_wins() {
        let (signal, completion) = completion_pair();
        let clone = signal.clone();
        signal.complete();
        clone.complete();
        assert!(clone.is_completed());
        assert!(completion.wait().await);
    }

    #[tokio::test]
    async fn dropped_signal_reports_missed() {
        let (signal, completion) = completion_pair();
        drop(signal);
        assert!(!completion.wait().await);
    }
}
