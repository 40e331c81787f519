//! Shared harness for viewer integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use url::Url;
use vitrine_core::prelude::*;
use vitrine_core::testing::{AnimateMode, RecordingStage, ScriptedDecoder, ScriptedProbe, StageEvent};
use vitrine_core::viewer;

pub const TOTAL_SLIDES: u32 = 40;

/// A running viewer over 40 scripted slides in `img/`.
pub struct ViewerHarness {
    pub stage: Arc<RecordingStage<PathBuf>>,
    pub location: MemoryLocation,
    pub decoder: Arc<ScriptedDecoder>,
    pub handle: ViewerHandle,
    pub task: JoinHandle<SlideNumber>,
}

impl ViewerHarness {
    pub async fn start(link: &str, mode: AnimateMode) -> Self {
        Self::start_with(link, mode, ScriptedDecoder::default(), patient_settings()).await
    }

    pub async fn start_with(
        link: &str,
        mode: AnimateMode,
        decoder: ScriptedDecoder,
        settings: ViewerSettings,
    ) -> Self {
        let gallery = GallerySettings {
            total_slides: TOTAL_SLIDES,
            ..GallerySettings::default()
        };
        let probe = Arc::new(ScriptedProbe::accepting(Vec::<&str>::new()));
        let session = Arc::new(GallerySession::new(&gallery, probe).expect("session"));

        let stage = Arc::new(RecordingStage::new(mode));
        let location = MemoryLocation::new(
            Url::parse(&format!("vitrine://viewer{link}")).expect("viewer url"),
        );
        let decoder = Arc::new(decoder);

        let (handle, inbox) = viewer::channel();
        let viewer = ViewerBuilder::new(
            session,
            Arc::clone(&decoder),
            stage.clone(),
            Arc::new(location.clone()),
        )
        .settings(settings)
        .build(inbox)
        .await;
        let task = tokio::spawn(viewer.run());

        let harness = Self {
            stage,
            location,
            decoder,
            handle,
            task,
        };
        harness.wait_for_rests(1).await;
        harness
    }

    /// Waits until the viewport was reset to rest without animation `count`
    /// times. The initial presentation counts as one.
    pub async fn wait_for_rests(&self, count: usize) {
        self.stage
            .wait_until(|events| instant_rests(events) >= count)
            .await;
    }

    pub async fn wait_for_animations(&self, count: usize) {
        self.stage
            .wait_until(|events| {
                events
                    .iter()
                    .filter(|event| matches!(event, StageEvent::Animated(..)))
                    .count()
                    >= count
            })
            .await;
    }

    pub fn animations(&self) -> usize {
        self.stage
            .count(|event| matches!(event, StageEvent::Animated(..)))
    }

    pub fn counter(&self) -> String {
        self.stage
            .last_frame()
            .map(|frame| frame.counter.to_string())
            .unwrap_or_default()
    }

    pub fn location_slide(&self) -> Option<String> {
        DeepLink::default().requested_slide(&self.location.current())
    }

    /// Asks the viewer to exit and returns the slide it ended on.
    pub async fn shutdown(self) -> SlideNumber {
        let _ = self.handle.exit();
        self.task.await.expect("viewer task")
    }
}

pub fn instant_rests(events: &[StageEvent<PathBuf>]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, StageEvent::Rested(Motion::Instant)))
        .count()
}

/// Defaults with a safety timeout long enough that only the stage finishes
/// animations.
pub fn patient_settings() -> ViewerSettings {
    let mut settings = ViewerSettings::default();
    settings.transition.safety_timeout_ms = 60_000;
    settings
}

pub fn slide(n: u32) -> SlideNumber {
    SlideNumber::new(n).expect("non-zero slide")
}

