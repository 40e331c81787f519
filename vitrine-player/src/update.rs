use std::time::Instant;

use iced::Task;
use iced::widget::operation::scroll_to;
use vitrine_core::gallery::thumbnails;
use vitrine_core::transition::Motion;

use crate::messages::Message;
use crate::stage::StageEvent;
use crate::state::{Page, State};

pub fn update(state: &mut State, message: Message) -> Task<Message> {
    log::trace!("update::{}", message.name());

    match message {
        Message::IndexReady(locator) => {
            log::debug!(
                "index ready: {} slides, naming {}",
                locator.total(),
                locator.scheme()
            );
            state.index.thumbnails =
                Some(thumbnails(&locator, &state.links.viewer, &state.deep_link));
            Task::none()
        }
        Message::IndexScrolled(viewport) => {
            if let Some(engaged) =
                state.engagement.on_scroll(viewport.absolute_offset().y)
            {
                log::debug!("index engaged: {engaged}");
            }
            Task::none()
        }
        Message::OpenSlide(slide) => {
            let link = state.deep_link.with_slide(&state.links.viewer, slide);
            state.open_viewer(link)
        }

        Message::Navigate(direction) => {
            if let Some(viewer) = &state.viewer
                && let Err(err) = viewer.handle.navigate(direction)
            {
                log::debug!("navigate {direction}: {err}");
            }
            Task::none()
        }
        Message::Exit => {
            let closed = match &state.viewer {
                Some(viewer) => viewer.handle.exit().is_err(),
                None => false,
            };
            // A stopped viewer cannot acknowledge; leave locally.
            if closed {
                state.leave_viewer();
            }
            Task::none()
        }
        Message::PointerMoved(x) => {
            if let Some(viewer) = state.viewer.as_mut() {
                viewer.cursor_x = x;
                if viewer.pressed
                    && let Err(err) = viewer.handle.drag_moved(x)
                {
                    log::debug!("drag moved: {err}");
                }
            }
            Task::none()
        }
        Message::PointerPressed => {
            if let Some(viewer) = state.viewer.as_mut() {
                viewer.pressed = true;
                if let Err(err) = viewer.handle.drag_started(viewer.cursor_x) {
                    log::debug!("drag started: {err}");
                }
            }
            Task::none()
        }
        Message::PointerReleased => {
            if let Some(viewer) = state.viewer.as_mut()
                && std::mem::take(&mut viewer.pressed)
            {
                if let Err(err) = viewer.handle.drag_released(viewer.cursor_x) {
                    log::debug!("drag released: {err}");
                }
            }
            Task::none()
        }
        Message::WindowResized(size) => {
            state.window_size = size;
            match state.viewer.as_mut() {
                Some(viewer) => {
                    viewer.strip.resize(size.width);
                    if let Err(err) = viewer.handle.resized(size.width) {
                        log::debug!("resize: {err}");
                    }
                    scroll_strip(state)
                }
                None => Task::none(),
            }
        }

        Message::Stage { viewer, event } => handle_stage_event(state, viewer, event),
        Message::ViewerStopped { viewer, last } => {
            log::debug!("viewer {viewer} stopped on slide {last}");
            if state.viewer.as_ref().is_some_and(|open| open.id == viewer) {
                state.leave_viewer();
            }
            Task::none()
        }
        Message::Tick(now) => {
            let Some(viewer) = state.viewer.as_mut() else {
                return Task::none();
            };
            viewer.resolve_frame_tickets();
            if viewer.strip.tick(now) {
                scroll_strip(state)
            } else {
                Task::none()
            }
        }
    }
}

fn handle_stage_event(state: &mut State, id: u64, event: StageEvent) -> Task<Message> {
    if matches!(event, StageEvent::Exit) {
        if state.viewer.as_ref().is_some_and(|viewer| viewer.id == id) {
            state.leave_viewer();
        }
        return Task::none();
    }
    if let StageEvent::Engaged(engaged) = event {
        if engaged {
            state.engagement.engage();
        }
        return Task::none();
    }

    let Some(viewer) = state.viewer_mut(id) else {
        log::trace!("dropping stage event for closed viewer {id}");
        return Task::none();
    };

    match event {
        StageEvent::Bind(frame) => {
            viewer.frame = Some(*frame);
            if viewer.strip.settle_after_rebind() {
                scroll_strip(state)
            } else {
                Task::none()
            }
        }
        StageEvent::Follow(offset) => {
            viewer.strip.follow(offset);
            scroll_strip(state)
        }
        StageEvent::Animate {
            direction,
            duration,
            done,
        } => {
            viewer.strip.animate(direction, duration, done, Instant::now());
            Task::none()
        }
        StageEvent::Rest(motion) => {
            viewer.strip.rest(motion, Instant::now());
            match motion {
                Motion::Instant => scroll_strip(state),
                Motion::Animated(_) => Task::none(),
            }
        }
        StageEvent::FrameRequested(ticket) => {
            viewer.frame_tickets.push(ticket);
            Task::none()
        }
        StageEvent::Engaged(_) | StageEvent::Exit => Task::none(),
    }
}

fn scroll_strip(state: &State) -> Task<Message> {
    match (&state.page, &state.viewer) {
        (Page::Viewer, Some(viewer)) => scroll_to::<Message>(
            viewer.strip.scrollable_id.clone(),
            viewer.strip.scroll_offset(),
        ),
        _ => Task::none(),
    }
}
