//! Recording and scripted doubles for exercising viewers without a UI.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use vitrine_model::Direction;

use crate::error::{Result, ViewerError};
use crate::resources::{ImageDecoder, ResourceProbe};
use crate::transition::{
    AnimationCompletion, CompletionSignal, Motion, Stage, StageFrame, completion_pair,
};

/// Everything a [`RecordingStage`] was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent<I> {
    Bound(StageFrame<I>),
    Followed(f32),
    Animated(Direction, Duration),
    Rested(Motion),
    Engaged(bool),
    Frame,
    Exited,
}

/// How a [`RecordingStage`] answers `animate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimateMode {
    /// Reports completion immediately.
    AutoComplete,
    /// Holds the signal until [`RecordingStage::complete_pending`].
    Manual,
    /// Drops the signal without reporting.
    Discard,
}

#[derive(Debug)]
pub struct RecordingStage<I> {
    mode: AnimateMode,
    events: Mutex<Vec<StageEvent<I>>>,
    pending: Mutex<Vec<CompletionSignal>>,
    version: watch::Sender<u64>,
}

impl<I: Clone + Send + Sync + 'static> RecordingStage<I> {
    pub fn new(mode: AnimateMode) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            mode,
            events: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            version,
        }
    }

    pub fn events(&self) -> Vec<StageEvent<I>> {
        self.events.lock().clone()
    }

    /// Counter text of every bound frame, in order.
    pub fn counters(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                StageEvent::Bound(frame) => Some(frame.counter.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn last_frame(&self) -> Option<StageFrame<I>> {
        self.events.lock().iter().rev().find_map(|event| match event {
            StageEvent::Bound(frame) => Some(frame.clone()),
            _ => None,
        })
    }

    pub fn count(&self, matches: impl Fn(&StageEvent<I>) -> bool) -> usize {
        self.events.lock().iter().filter(|event| matches(event)).count()
    }

    /// Reports completion for every held animation. Returns how many.
    pub fn complete_pending(&self) -> usize {
        let pending: Vec<CompletionSignal> = self.pending.lock().drain(..).collect();
        for signal in &pending {
            signal.complete();
        }
        pending.len()
    }

    /// Resolves once `done` holds for the recorded events.
    pub async fn wait_until(&self, done: impl Fn(&[StageEvent<I>]) -> bool) {
        let mut changes = self.version.subscribe();
        loop {
            if done(&self.events.lock()) {
                return;
            }
            if changes.changed().await.is_err() {
                return;
            }
        }
    }

    fn record(&self, event: StageEvent<I>) {
        self.events.lock().push(event);
        self.version.send_modify(|version| *version += 1);
    }
}

#[async_trait]
impl<I: Clone + Send + Sync + 'static> Stage<I> for RecordingStage<I> {
    fn bind(&self, frame: StageFrame<I>) {
        self.record(StageEvent::Bound(frame));
    }

    fn follow(&self, offset: f32) {
        self.record(StageEvent::Followed(offset));
    }

    fn animate(&self, direction: Direction, duration: Duration) -> AnimationCompletion {
        let (signal, completion) = completion_pair();
        match self.mode {
            AnimateMode::AutoComplete => signal.complete(),
            AnimateMode::Manual => self.pending.lock().push(signal),
            AnimateMode::Discard => drop(signal),
        }
        self.record(StageEvent::Animated(direction, duration));
        completion
    }

    fn rest(&self, motion: Motion) {
        self.record(StageEvent::Rested(motion));
    }

    fn set_engaged(&self, engaged: bool) {
        self.record(StageEvent::Engaged(engaged));
    }

    async fn next_frame(&self) {
        self.record(StageEvent::Frame);
        tokio::task::yield_now().await;
    }

    fn exit(&self) {
        self.record(StageEvent::Exited);
    }
}

/// Decoder whose "image" is the location it was asked for.
#[derive(Debug, Default)]
pub struct ScriptedDecoder {
    failing: HashSet<PathBuf>,
    delays: HashMap<PathBuf, Duration>,
    default_delay: Duration,
    decodes: AtomicUsize,
}

impl ScriptedDecoder {
    /// Fails every location in `paths`.
    pub fn failing<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            failing: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn with_delay_for(mut self, path: impl AsRef<Path>, delay: Duration) -> Self {
        self.delays.insert(path.as_ref().to_path_buf(), delay);
        self
    }

    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageDecoder for ScriptedDecoder {
    type Image = PathBuf;

    async fn decode(&self, location: &Path) -> Result<PathBuf> {
        self.decodes.fetch_add(1, Ordering::SeqCst);

        let delay = self
            .delays
            .get(location)
            .copied()
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(location) {
            return Err(ViewerError::Decode {
                path: location.to_path_buf(),
                message: "scripted failure".into(),
            });
        }
        Ok(location.to_path_buf())
    }
}

/// Probe that accepts a fixed set of locations and records every query.
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    accepted: HashSet<PathBuf>,
    probed: Mutex<Vec<PathBuf>>,
}

impl ScriptedProbe {
    pub fn accepting<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            accepted: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn probed(&self) -> Vec<PathBuf> {
        self.probed.lock().clone()
    }
}

#[async_trait]
impl ResourceProbe for ScriptedProbe {
    async fn probe(&self, location: &Path) -> bool {
        self.probed.lock().push(location.to_path_buf());
        self.accepted.contains(location)
    }
}
