use std::sync::Arc;
use std::time::{Duration, Instant};

use iced::Task;
use iced::widget::Id as ScrollableId;
use iced::widget::scrollable::AbsoluteOffset;
use url::Url;
use vitrine_core::GallerySession;
use vitrine_core::gallery::{Engagement, Thumbnail};
use vitrine_core::navigation::{DeepLink, Location, MemoryLocation};
use vitrine_core::settings::ViewerSettings;
use vitrine_core::transition::{CompletionSignal, Motion};
use vitrine_core::viewer::{self, ViewerBuilder, ViewerHandle};
use vitrine_model::Direction;

use crate::animator::{Easing, SnapAnimator};
use crate::app::AppConfig;
use crate::app::bootstrap::Links;
use crate::decoder::HandleDecoder;
use crate::messages::Message;
use crate::stage::{ChannelStage, FrameTicket, SlideFrame, StageReceiver};

pub const DEFAULT_WINDOW_SIZE: iced::Size = iced::Size::new(1280.0, 720.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Index,
    Viewer,
}

#[derive(Debug, Default)]
pub struct IndexState {
    /// `None` until the naming scheme has been resolved.
    pub thumbnails: Option<Vec<Thumbnail>>,
}

/// Horizontal position of the three-panel strip, in panel widths.
/// `1.0` shows the centre panel.
#[derive(Debug)]
pub struct Strip {
    width: f32,
    position: f32,
    animator: SnapAnimator,
    pending: Option<CompletionSignal>,
    pub scrollable_id: ScrollableId,
}

impl Strip {
    const REST: f32 = 1.0;

    pub fn new(width: f32) -> Self {
        Self {
            width: width.max(1.0),
            position: Self::REST,
            animator: SnapAnimator::new(),
            pending: None,
            scrollable_id: ScrollableId::unique(),
        }
    }

    pub fn panel_width(&self) -> f32 {
        self.width
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_active()
    }

    pub fn scroll_offset(&self) -> AbsoluteOffset {
        AbsoluteOffset {
            x: self.position * self.width,
            y: 0.0,
        }
    }

    /// Drags the strip `offset` pixels from rest; negative reveals the next
    /// panel.
    pub fn follow(&mut self, offset: f32) {
        self.animator.cancel();
        self.position = (Self::REST - offset / self.width).clamp(0.0, 2.0);
    }

    pub fn animate(
        &mut self,
        direction: Direction,
        duration: Duration,
        done: CompletionSignal,
        now: Instant,
    ) {
        let target = match direction {
            Direction::Forward => 2.0,
            Direction::Backward => 0.0,
        };
        if let Some(stale) = self.pending.replace(done) {
            stale.complete();
        }
        self.animator
            .start(self.position, target, duration, Easing::EaseInOut, now);
    }

    pub fn rest(&mut self, motion: Motion, now: Instant) {
        match motion {
            Motion::Instant => {
                self.animator.cancel();
                self.position = Self::REST;
            }
            Motion::Animated(duration) => {
                self.animator.start(
                    self.position,
                    Self::REST,
                    duration,
                    Easing::EaseOut,
                    now,
                );
            }
        }
    }

    /// Advances the running animation. Reports animation completion when
    /// the strip lands. Returns whether the position changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(position) = self.animator.tick(now) else {
            return false;
        };
        self.position = position;
        if !self.animator.is_active()
            && let Some(done) = self.pending.take()
        {
            done.complete();
        }
        true
    }

    /// New panels replace the ones the strip landed on; recentre so the
    /// landed slide stays in view.
    pub fn settle_after_rebind(&mut self) -> bool {
        let landed = self.position <= 0.0 || self.position >= 2.0;
        if self.animator.is_active() || !landed {
            return false;
        }
        self.position = Self::REST;
        true
    }

    pub fn resize(&mut self, width: f32) {
        self.width = width.max(1.0);
    }
}

#[derive(Debug)]
pub struct ViewerState {
    pub id: u64,
    pub handle: ViewerHandle,
    pub receiver: StageReceiver,
    pub frame: Option<SlideFrame>,
    pub strip: Strip,
    pub frame_tickets: Vec<FrameTicket>,
    pub cursor_x: f32,
    pub pressed: bool,
}

impl ViewerState {
    fn new(
        id: u64,
        handle: ViewerHandle,
        receiver: StageReceiver,
        width: f32,
    ) -> Self {
        Self {
            id,
            handle,
            receiver,
            frame: None,
            strip: Strip::new(width),
            frame_tickets: Vec::new(),
            cursor_x: 0.0,
            pressed: false,
        }
    }

    /// Whether the viewer needs animation ticks right now.
    pub fn needs_ticks(&self) -> bool {
        self.strip.is_animating() || !self.frame_tickets.is_empty()
    }

    pub fn resolve_frame_tickets(&mut self) {
        for ticket in self.frame_tickets.drain(..) {
            ticket.presented();
        }
    }
}

#[derive(Debug)]
pub struct State {
    pub session: Arc<GallerySession>,
    pub settings: ViewerSettings,
    pub decoder: Arc<HandleDecoder>,
    pub location: MemoryLocation,
    pub deep_link: DeepLink,
    pub links: Links,
    pub page: Page,
    pub index: IndexState,
    pub engagement: Engagement,
    pub viewer: Option<ViewerState>,
    pub window_size: iced::Size,
    next_viewer: u64,
}

impl State {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            session: Arc::clone(&config.session),
            settings: config.settings.clone(),
            decoder: Arc::new(HandleDecoder),
            location: MemoryLocation::new(config.links.index.clone()),
            deep_link: DeepLink::new(config.settings.deep_link_param.clone()),
            links: config.links.clone(),
            page: Page::Index,
            index: IndexState::default(),
            engagement: Engagement::new(config.settings.engaged_scroll_px),
            viewer: None,
            window_size: DEFAULT_WINDOW_SIZE,
            next_viewer: 0,
        }
    }

    /// Navigates the location to `link` and starts a viewer task reading
    /// its starting slide from there.
    pub fn open_viewer(&mut self, link: Url) -> Task<Message> {
        self.location.push(link);

        let id = self.next_viewer;
        self.next_viewer += 1;

        let (stage, receiver) = ChannelStage::new();
        let (handle, inbox) = viewer::channel();
        let builder = ViewerBuilder::new(
            Arc::clone(&self.session),
            Arc::clone(&self.decoder),
            Arc::new(stage),
            Arc::new(self.location.clone()),
        )
        .settings(self.settings.clone());

        self.viewer = Some(ViewerState::new(
            id,
            handle,
            receiver,
            self.window_size.width,
        ));
        self.page = Page::Viewer;
        log::debug!("opening viewer {id} at {}", self.location.current());

        Task::perform(
            async move { builder.build(inbox).await.run().await },
            move |last| Message::ViewerStopped { viewer: id, last },
        )
    }

    /// Back to the index page. Dropping the handle stops a viewer task that
    /// is still running.
    pub fn leave_viewer(&mut self) {
        if self.viewer.take().is_some() {
            self.location.push(self.links.index.clone());
        }
        self.page = Page::Index;
    }

    pub fn viewer_mut(&mut self, id: u64) -> Option<&mut ViewerState> {
        self.viewer.as_mut().filter(|viewer| viewer.id == id)
    }

    pub fn title(&self) -> String {
        match (&self.page, &self.viewer) {
            (Page::Viewer, Some(ViewerState { frame: Some(frame), .. })) => {
                format!("Vitrine - {}", frame.counter)
            }
            _ => "Vitrine".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::transition::completion_pair;

    #[test]
    fn follow_tracks_the_pointer_in_panels() {
        let mut strip = Strip::new(800.0);
        strip.follow(-200.0);
        assert_eq!(strip.position(), 1.25);
        assert_eq!(strip.scroll_offset().x, 1000.0);

        strip.follow(-5000.0);
        assert_eq!(strip.position(), 2.0);
    }

    #[tokio::test]
    async fn landing_reports_completion() {
        let start = Instant::now();
        let mut strip = Strip::new(800.0);
        let (done, completion) = completion_pair();
        strip.animate(Direction::Backward, Duration::from_millis(100), done, start);

        assert!(strip.tick(start + Duration::from_millis(50)));
        assert!(strip.is_animating());
        assert!(strip.tick(start + Duration::from_millis(100)));
        assert_eq!(strip.position(), 0.0);
        assert!(completion.wait().await);
    }

    #[tokio::test]
    async fn a_new_animation_releases_the_previous_signal() {
        let start = Instant::now();
        let mut strip = Strip::new(800.0);
        let (first, first_completion) = completion_pair();
        let (second, _second_completion) = completion_pair();
        strip.animate(Direction::Forward, Duration::from_millis(100), first, start);
        strip.animate(Direction::Forward, Duration::from_millis(100), second, start);
        assert!(first_completion.wait().await);
    }

    #[test]
    fn resize_keeps_the_panel_position() {
        let mut strip = Strip::new(800.0);
        strip.follow(-400.0);
        strip.resize(1200.0);
        assert_eq!(strip.position(), 1.5);
        assert_eq!(strip.scroll_offset().x, 1800.0);
    }

    #[tokio::test]
    async fn rebinding_after_landing_recentres() {
        let start = Instant::now();
        let mut strip = Strip::new(500.0);
        let (done, _completion) = completion_pair();
        strip.animate(Direction::Forward, Duration::from_millis(10), done, start);
        assert!(!strip.settle_after_rebind());
        strip.tick(start + Duration::from_millis(10));
        assert!(strip.settle_after_rebind());
        assert_eq!(strip.position(), 1.0);

        strip.follow(-100.0);
        assert!(!strip.settle_after_rebind());
    }

    #[test]
    fn instant_rest_recentres() {
        let mut strip = Strip::new(640.0);
        strip.follow(100.0);
        strip.rest(Motion::Instant, Instant::now());
        assert_eq!(strip.scroll_offset().x, 640.0);
        assert!(!strip.is_animating());
    }
}
