//! Slide position, deep links and pointer gestures.

pub mod controller;
pub mod deep_link;
pub mod gesture;

pub use controller::SlideController;
pub use deep_link::{DeepLink, Location, MemoryLocation, parse_link};
pub use gesture::{DragDecision, DragTracker};
