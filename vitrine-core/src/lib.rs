//! # Vitrine Core
//!
//! UI-agnostic library behind the Vitrine slideshow: the slide position state
//! machine, the bounded image residency cache and the transition sequencer
//! that couples them.
//!
//! ## Overview
//!
//! - **Navigation**: [`navigation::SlideController`] owns the current slide,
//!   clamps initial input, wraps on navigation and guards the single
//!   transition slot. Deep links and drag gestures live next to it.
//! - **Residency**: [`cache::Preloader`] keeps a window of decoded images warm
//!   around the current slide inside a first-in-first-out
//!   [`cache::ResidencyCache`].
//! - **Transitions**: [`transition::run_transition`] waits for the incoming
//!   slide, animates the [`transition::Stage`] and finishes on the first of
//!   the completion signal or the safety timeout.
//! - **Viewer**: [`viewer::Viewer`] runs all of the above as one task fed by
//!   [`viewer::ViewerHandle`] commands.
//!
//! ## Feature Flags
//!
//! - `image`: filesystem decoder and probe backed by the `image` crate
//! - `test-utils`: recording stage and scripted decoder/probe
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use url::Url;
//! use vitrine_core::prelude::*;
//!
//! async fn open(stage: Arc<dyn Stage<DecodedImage>>) -> vitrine_core::Result<()> {
//!     let session = Arc::new(GallerySession::new(
//!         &GallerySettings::default(),
//!         Arc::new(FsProbe),
//!     )?);
//!     let location = Arc::new(MemoryLocation::new(Url::parse("vitrine://viewer?slide=3")?));
//!
//!     let (handle, inbox) = vitrine_core::viewer::channel();
//!     let viewer = ViewerBuilder::new(session, Arc::new(RgbaDecoder), stage, location)
//!         .build(inbox)
//!         .await;
//!     let running = tokio::spawn(viewer.run());
//!
//!     handle.next()?;
//!     handle.exit()?;
//!     let _last = running.await;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Decoded-image residency cache and preloader
pub mod cache;
pub mod error;
/// Thumbnail index and scroll engagement
pub mod gallery;
/// Slide position, deep links and drag gestures
pub mod navigation;
/// Slide addressing, naming detection and decoding
pub mod resources;
pub mod session;
/// Tunables deserialized by the configuration layer
pub mod settings;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod transition;
pub mod viewer;

pub use error::{Result, ViewerError};
pub use session::GallerySession;
pub use vitrine_model as model;

/// Common imports for front-ends.
pub mod prelude {
    pub use crate::cache::{Preloader, ResidencyCache, ResidentImage, WindowReport};
    pub use crate::error::{Result, ViewerError};
    pub use crate::gallery::{Engagement, Thumbnail, thumbnails};
    pub use crate::navigation::{
        DeepLink, DragDecision, DragTracker, Location, MemoryLocation, SlideController,
        parse_link,
    };
    #[cfg(feature = "image")]
    pub use crate::resources::{DecodedImage, FsProbe, RgbaDecoder};
    pub use crate::resources::{ImageDecoder, ResourceProbe, SchemeResolver, SlideLocator};
    pub use crate::session::GallerySession;
    pub use crate::settings::{
        GallerySettings, NamingSettings, PreloadSettings, SwipeSettings,
        TransitionSettings, ViewerSettings,
    };
    pub use crate::transition::{
        AnimationCompletion, CompletionSignal, Motion, SlideBinding, Stage, StageFrame,
        completion_pair,
    };
    pub use crate::viewer::{Viewer, ViewerBuilder, ViewerCommand, ViewerHandle};
    pub use vitrine_model::{
        Direction, NamingScheme, SlideCount, SlideCounter, SlideNumber,
    };
}
