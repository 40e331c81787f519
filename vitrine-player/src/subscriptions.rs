//! Root-level subscription composition

use std::time::Duration;

use iced::Subscription;
use iced::keyboard::{Key, key::Named};
use vitrine_model::Direction;

use crate::messages::Message;
use crate::stage::stage_feed;
use crate::state::State;

/// ~120 FPS while the strip moves or a frame is owed to the viewer.
const TICK_INTERVAL: Duration = Duration::from_nanos(8_333_333);

pub fn subscription(state: &State) -> Subscription<Message> {
    let mut subscriptions = vec![
        iced::window::resize_events()
            .map(|(_id, size)| Message::WindowResized(size)),
    ];

    if let Some(viewer) = &state.viewer {
        subscriptions.push(stage_feed(viewer.id, viewer.receiver.clone()));
        subscriptions.push(iced::keyboard::on_key_press(viewer_key));

        if viewer.needs_ticks() {
            subscriptions.push(iced::time::every(TICK_INTERVAL).map(Message::Tick));
        }
    }

    Subscription::batch(subscriptions)
}

fn viewer_key(key: Key, _modifiers: iced::keyboard::Modifiers) -> Option<Message> {
    match key {
        Key::Named(Named::ArrowRight) => Some(Message::Navigate(Direction::Forward)),
        Key::Named(Named::ArrowLeft) => Some(Message::Navigate(Direction::Backward)),
        Key::Named(Named::Escape) => Some(Message::Exit),
        _ => None,
    }
}
