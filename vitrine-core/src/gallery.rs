//! The thumbnail index that fronts the viewer.

use std::path::PathBuf;

use url::Url;
use vitrine_model::SlideNumber;

use crate::navigation::DeepLink;
use crate::resources::SlideLocator;

/// One grid entry on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub slide: SlideNumber,
    pub location: PathBuf,
    pub alt: String,
    /// Opens the viewer on this slide.
    pub link: Url,
}

/// Every slide of the collection, in order.
pub fn thumbnails(
    locator: &SlideLocator,
    viewer_link: &Url,
    deep_link: &DeepLink,
) -> Vec<Thumbnail> {
    locator
        .total()
        .iter()
        .map(|slide| Thumbnail {
            slide,
            location: locator.location(slide),
            alt: format!("Slide {slide}"),
            link: deep_link.with_slide(viewer_link, slide),
        })
        .collect()
}

/// Scroll-driven "engaged" display mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Engagement {
    threshold: f32,
    engaged: bool,
}

impl Engagement {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            engaged: false,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Feeds a vertical scroll offset. Returns the new mode when it changed.
    pub fn on_scroll(&mut self, offset_y: f32) -> Option<bool> {
        self.set(offset_y > self.threshold)
    }

    pub fn engage(&mut self) -> Option<bool> {
        self.set(true)
    }

    fn set(&mut self, engaged: bool) -> Option<bool> {
        if self.engaged == engaged {
            return None;
        }
        self.engaged = engaged;
        Some(engaged)
    }
}
