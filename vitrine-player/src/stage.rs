//! Bridge between the viewer task and the iced runtime.
//!
//! The viewer drives a [`ChannelStage`]; every call becomes a [`StageEvent`]
//! on an unbounded channel, and [`stage_feed`] turns the receiving end into a
//! subscription that feeds `update`.

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use iced::Subscription;
use iced::widget::image::Handle;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use vitrine_core::transition::{
    AnimationCompletion, CompletionSignal, Motion, Stage, StageFrame,
    completion_pair,
};
use vitrine_model::Direction;

use crate::messages::Message;

pub type SlideFrame = StageFrame<Handle>;

#[derive(Debug, Clone)]
pub enum StageEvent {
    Bind(Box<SlideFrame>),
    Follow(f32),
    Animate {
        direction: Direction,
        duration: Duration,
        done: CompletionSignal,
    },
    Rest(Motion),
    Engaged(bool),
    FrameRequested(FrameTicket),
    Exit,
}

/// Resolves a pending `next_frame` once the surface has drawn.
#[derive(Debug, Clone)]
pub struct FrameTicket {
    sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl FrameTicket {
    fn new() -> (Self, oneshot::Receiver<()>) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Arc::new(Mutex::new(Some(sender))),
            },
            receiver,
        )
    }

    pub fn presented(&self) {
        if let Some(sender) = self.sender.lock().take() {
            let _ = sender.send(());
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChannelStage {
    events: mpsc::UnboundedSender<StageEvent>,
}

impl ChannelStage {
    pub fn new() -> (Self, StageReceiver) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self { events },
            StageReceiver {
                inner: Arc::new(Mutex::new(Some(receiver))),
            },
        )
    }

    fn emit(&self, event: StageEvent) {
        if self.events.send(event).is_err() {
            log::trace!("stage event dropped; surface is gone");
        }
    }
}

#[async_trait]
impl Stage<Handle> for ChannelStage {
    fn bind(&self, frame: SlideFrame) {
        self.emit(StageEvent::Bind(Box::new(frame)));
    }

    fn follow(&self, offset: f32) {
        self.emit(StageEvent::Follow(offset));
    }

    fn animate(
        &self,
        direction: Direction,
        duration: Duration,
    ) -> AnimationCompletion {
        let (done, completion) = completion_pair();
        self.emit(StageEvent::Animate {
            direction,
            duration,
            done,
        });
        completion
    }

    fn rest(&self, motion: Motion) {
        self.emit(StageEvent::Rest(motion));
    }

    fn set_engaged(&self, engaged: bool) {
        self.emit(StageEvent::Engaged(engaged));
    }

    async fn next_frame(&self) {
        let (ticket, presented) = FrameTicket::new();
        self.emit(StageEvent::FrameRequested(ticket));
        // A closed surface never presents; returning keeps the viewer moving.
        let _ = presented.await;
    }

    fn exit(&self) {
        self.emit(StageEvent::Exit);
    }
}

/// Receiving half of a [`ChannelStage`], taken once by the feed stream.
#[derive(Debug, Clone)]
pub struct StageReceiver {
    inner: Arc<Mutex<Option<mpsc::UnboundedReceiver<StageEvent>>>>,
}

impl StageReceiver {
    pub(crate) fn take(&self) -> Option<mpsc::UnboundedReceiver<StageEvent>> {
        self.inner.lock().take()
    }
}

#[derive(Debug, Clone)]
struct StageFeedId {
    viewer: u64,
    receiver: StageReceiver,
}

impl Hash for StageFeedId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.viewer.hash(state);
    }
}

/// Stage events of one viewer instance, tagged with its id.
pub fn stage_feed(viewer: u64, receiver: StageReceiver) -> Subscription<Message> {
    Subscription::run_with(StageFeedId { viewer, receiver }, build_stage_stream)
}

fn build_stage_stream(id: &StageFeedId) -> BoxStream<'static, Message> {
    let viewer = id.viewer;
    let Some(receiver) = id.receiver.take() else {
        log::debug!("stage feed for viewer {viewer} already consumed");
        return Box::pin(stream::empty());
    };

    Box::pin(stream::unfold(receiver, move |mut receiver| async move {
        let event = receiver.recv().await?;
        Some((Message::Stage { viewer, event }, receiver))
    }))
}
