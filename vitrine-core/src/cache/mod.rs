//! Decoded-image residency: the bounded FIFO cache and the preloader that
//! keeps a window of slides warm around the current one.

pub mod preload;
pub mod residency;

pub use preload::{Preloader, WindowReport};
pub use residency::{ResidencyCache, ResidentImage};
