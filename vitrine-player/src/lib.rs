//! Desktop front-end for Vitrine.
//!
//! An iced application with two pages: the thumbnail index and the viewer.
//! The viewer page is a [`stage::ChannelStage`] surface driven by a
//! `vitrine_core` viewer task; stage calls arrive as messages through a
//! subscription and pointer, keyboard and resize input flows back through
//! the viewer handle.

pub mod animator;
pub mod app;
pub mod cli;
pub mod decoder;
pub mod messages;
pub mod stage;
pub mod state;
pub mod subscriptions;
pub mod update;
pub mod view;
