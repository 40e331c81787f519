//! The viewer actor.
//!
//! A [`Viewer`] owns every piece of mutable viewer state and runs as a single
//! task. Callers talk to it through a cloneable [`ViewerHandle`]; commands
//! that arrive while a transition is in flight are observed and dropped.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tracing::{debug, trace};
use vitrine_model::{Direction, SlideNumber};

use crate::cache::Preloader;
use crate::error::{Result, ViewerError};
use crate::navigation::{DeepLink, DragDecision, DragTracker, Location, SlideController};
use crate::resources::ImageDecoder;
use crate::session::GallerySession;
use crate::settings::ViewerSettings;
use crate::transition::{
    Motion, Panels, Stage, TransitionOutcome, TransitionTimings, run_transition,
};

/// Input the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    Navigate(Direction),
    GoTo(SlideNumber),
    DragStarted { x: f32 },
    DragMoved { x: f32 },
    DragReleased { x: f32 },
    Resized { width: f32 },
    Exit,
}

/// Sends commands to a running viewer.
#[derive(Debug, Clone)]
pub struct ViewerHandle {
    sender: mpsc::UnboundedSender<ViewerCommand>,
}

/// Receiving end handed to [`ViewerBuilder::build`].
#[derive(Debug)]
pub struct ViewerInbox {
    receiver: mpsc::UnboundedReceiver<ViewerCommand>,
}

pub fn channel() -> (ViewerHandle, ViewerInbox) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ViewerHandle { sender }, ViewerInbox { receiver })
}

impl ViewerHandle {
    pub fn send(&self, command: ViewerCommand) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| ViewerError::ViewerClosed)
    }

    pub fn navigate(&self, direction: Direction) -> Result<()> {
        self.send(ViewerCommand::Navigate(direction))
    }

    pub fn next(&self) -> Result<()> {
        self.navigate(Direction::Forward)
    }

    pub fn previous(&self) -> Result<()> {
        self.navigate(Direction::Backward)
    }

    pub fn go_to(&self, slide: SlideNumber) -> Result<()> {
        self.send(ViewerCommand::GoTo(slide))
    }

    pub fn drag_started(&self, x: f32) -> Result<()> {
        self.send(ViewerCommand::DragStarted { x })
    }

    pub fn drag_moved(&self, x: f32) -> Result<()> {
        self.send(ViewerCommand::DragMoved { x })
    }

    pub fn drag_released(&self, x: f32) -> Result<()> {
        self.send(ViewerCommand::DragReleased { x })
    }

    pub fn resized(&self, width: f32) -> Result<()> {
        self.send(ViewerCommand::Resized { width })
    }

    pub fn exit(&self) -> Result<()> {
        self.send(ViewerCommand::Exit)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Assembles a [`Viewer`] for a session.
pub struct ViewerBuilder<D: ImageDecoder> {
    session: Arc<GallerySession>,
    decoder: Arc<D>,
    stage: Arc<dyn Stage<D::Image>>,
    location: Arc<dyn Location>,
    settings: ViewerSettings,
}

impl<D: ImageDecoder> ViewerBuilder<D> {
    pub fn new(
        session: Arc<GallerySession>,
        decoder: Arc<D>,
        stage: Arc<dyn Stage<D::Image>>,
        location: Arc<dyn Location>,
    ) -> Self {
        Self {
            session,
            decoder,
            stage,
            location,
            settings: ViewerSettings::default(),
        }
    }

    pub fn settings(mut self, settings: ViewerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Resolves the session's naming and reads the starting slide from the
    /// location.
    pub async fn build(self, inbox: ViewerInbox) -> Viewer<D> {
        let locator = self.session.locator().await;
        let deep_link = DeepLink::new(self.settings.deep_link_param.clone());
        let requested = deep_link.requested_slide(&self.location.current());
        let controller =
            SlideController::initialize(requested.as_deref(), locator.total());

        debug!(
            start = %controller.current(),
            total = %controller.total(),
            scheme = %locator.scheme(),
            "viewer starting"
        );

        Viewer {
            controller,
            preloader: Preloader::new(
                self.decoder,
                locator,
                self.settings.preload.capacity,
            ),
            drag: DragTracker::new(self.settings.swipe.clone()),
            engaged: false,
            stage: self.stage,
            location: self.location,
            deep_link,
            timings: TransitionTimings::from(&self.settings.transition),
            settings: self.settings,
            inbox,
        }
    }
}

impl<D: ImageDecoder> std::fmt::Debug for ViewerBuilder<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerBuilder")
            .field("session", &self.session)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

enum Flow {
    Continue,
    Start(BoxFuture<'static, TransitionOutcome>),
    Exit,
}

pub struct Viewer<D: ImageDecoder> {
    controller: SlideController,
    preloader: Preloader<D>,
    drag: DragTracker,
    engaged: bool,
    stage: Arc<dyn Stage<D::Image>>,
    location: Arc<dyn Location>,
    deep_link: DeepLink,
    timings: TransitionTimings,
    settings: ViewerSettings,
    inbox: ViewerInbox,
}

impl<D: ImageDecoder> Viewer<D> {
    pub fn current(&self) -> SlideNumber {
        self.controller.current()
    }

    /// Presents the starting slide and processes commands until `Exit` or
    /// until every handle is dropped. Returns the slide shown last.
    pub async fn run(mut self) -> SlideNumber {
        self.present().await;

        let mut in_flight: Option<BoxFuture<'static, TransitionOutcome>> = None;
        loop {
            tokio::select! {
                biased;
                outcome = async {
                    match in_flight.as_mut() {
                        Some(transition) => transition.await,
                        None => std::future::pending().await,
                    }
                } => {
                    in_flight = None;
                    if self.finish_transition(outcome).await {
                        self.stage.exit();
                        break;
                    }
                }
                command = self.inbox.receiver.recv() => {
                    let Some(command) = command else {
                        debug!("viewer handles dropped; stopping");
                        break;
                    };
                    match self.handle(command).await {
                        Flow::Continue => {}
                        Flow::Start(transition) => in_flight = Some(transition),
                        Flow::Exit => {
                            self.stage.exit();
                            break;
                        }
                    }
                }
            }
        }

        self.controller.current()
    }

    async fn present(&mut self) {
        let current = self.controller.current();
        let report = self
            .preloader
            .settle_window(
                current,
                self.settings.preload.radius,
                self.settings.preload.window_timeout(),
            )
            .await;
        debug!(
            %current,
            requested = report.requested,
            decoded = report.decoded,
            timed_out = report.timed_out,
            "initial window settled"
        );

        self.bind_current();
        self.stage.rest(Motion::Instant);
        self.deep_link.sync(self.location.as_ref(), current);
    }

    async fn handle(&mut self, command: ViewerCommand) -> Flow {
        match command {
            ViewerCommand::Navigate(direction) => self.start_transition(direction),
            ViewerCommand::GoTo(slide) => {
                self.jump_to(slide).await;
                Flow::Continue
            }
            ViewerCommand::DragStarted { x } => {
                if self.controller.is_transitioning() {
                    trace!("drag ignored while animating");
                } else {
                    self.drag.begin(x, now());
                }
                Flow::Continue
            }
            ViewerCommand::DragMoved { x } => {
                if let Some(offset) = self.drag.update(x) {
                    self.stage.follow(offset);
                }
                Flow::Continue
            }
            ViewerCommand::DragReleased { x } => match self.drag.release(x, now()) {
                Some(DragDecision::Commit(direction)) => {
                    self.start_transition(direction)
                }
                Some(DragDecision::SnapBack) => {
                    self.stage.rest(Motion::Animated(self.timings.animation));
                    Flow::Continue
                }
                None => Flow::Continue,
            },
            ViewerCommand::Resized { width } => {
                if self.controller.is_transitioning() {
                    trace!(width, "resize during transition; recentred on finish");
                } else {
                    self.drag.cancel();
                    self.stage.rest(Motion::Instant);
                }
                Flow::Continue
            }
            ViewerCommand::Exit => Flow::Exit,
        }
    }

    fn start_transition(&mut self, direction: Direction) -> Flow {
        if !self.controller.begin_transition() {
            trace!(%direction, "navigation dropped while animating");
            return Flow::Continue;
        }
        self.engage();

        let panels = self.panels();
        let incoming = panels.incoming(direction).slide();
        self.preloader
            .ensure_window(incoming, self.settings.preload.radius);

        let transition = run_transition(
            Arc::clone(&self.stage),
            direction,
            panels,
            self.timings,
        );
        Flow::Start(transition.boxed())
    }

    /// Returns `true` when an `Exit` arrived while the transition finished.
    async fn finish_transition(&mut self, outcome: TransitionOutcome) -> bool {
        let current = self.controller.advance(outcome.direction.delta());
        trace!(%current, finish = ?outcome.finish, "transition finished");

        self.preloader
            .ensure_window(current, self.settings.preload.radius);
        self.bind_current();
        self.stage.next_frame().await;
        self.stage.rest(Motion::Instant);
        self.deep_link.sync(self.location.as_ref(), current);

        let exit = self.drain_stale();
        self.controller.end_transition();
        exit
    }

    async fn jump_to(&mut self, slide: SlideNumber) {
        if !self.controller.begin_transition() {
            trace!(%slide, "jump dropped while animating");
            return;
        }
        self.engage();

        self.drag.cancel();
        let target = self.controller.go_to(slide);
        self.preloader
            .settle_window(
                target,
                self.settings.preload.radius,
                self.settings.preload.window_timeout(),
            )
            .await;
        self.bind_current();
        self.stage.rest(Motion::Instant);
        self.deep_link.sync(self.location.as_ref(), target);

        self.controller.end_transition();
    }

    /// Drops commands that queued up while the transition finished.
    fn drain_stale(&mut self) -> bool {
        let mut exit = false;
        while let Ok(command) = self.inbox.receiver.try_recv() {
            match command {
                ViewerCommand::Exit => exit = true,
                stale => trace!(?stale, "dropped while animating"),
            }
        }
        exit
    }

    fn panels(&mut self) -> Panels<D::Image> {
        let (previous, next) = self.controller.neighbours();
        Panels {
            previous: self.preloader.ensure_resident(previous),
            current: self.preloader.ensure_resident(self.controller.current()),
            next: self.preloader.ensure_resident(next),
            counter: self.controller.counter(),
        }
    }

    fn bind_current(&mut self) {
        let frame = self.panels().frame();
        self.stage.bind(frame);
    }

    fn engage(&mut self) {
        if !self.engaged {
            self.engaged = true;
            self.stage.set_engaged(true);
        }
    }
}

impl<D: ImageDecoder> std::fmt::Debug for Viewer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("controller", &self.controller)
            .field("preloader", &self.preloader)
            .field("engaged", &self.engaged)
            .finish_non_exhaustive()
    }
}

fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}
