use std::time::Instant;

use iced::widget::scrollable::Viewport;
use vitrine_core::resources::SlideLocator;
use vitrine_model::{Direction, SlideNumber};

use crate::stage::StageEvent;

#[derive(Debug, Clone)]
pub enum Message {
    /// Naming resolved; the index can list the collection.
    IndexReady(SlideLocator),
    IndexScrolled(Viewport),
    OpenSlide(SlideNumber),

    Navigate(Direction),
    Exit,
    PointerMoved(f32),
    PointerPressed,
    PointerReleased,
    WindowResized(iced::Size),

    Stage { viewer: u64, event: StageEvent },
    ViewerStopped { viewer: u64, last: SlideNumber },
    Tick(Instant),
}

impl Message {
    pub fn name(&self) -> &'static str {
        match self {
            Message::IndexReady(_) => "IndexReady",
            Message::IndexScrolled(_) => "IndexScrolled",
            Message::OpenSlide(_) => "OpenSlide",
            Message::Navigate(_) => "Navigate",
            Message::Exit => "Exit",
            Message::PointerMoved(_) => "PointerMoved",
            Message::PointerPressed => "PointerPressed",
            Message::PointerReleased => "PointerReleased",
            Message::WindowResized(_) => "WindowResized",
            Message::Stage { .. } => "Stage",
            Message::ViewerStopped { .. } => "ViewerStopped",
            Message::Tick(_) => "Tick",
        }
    }
}
