//! Resource addressing: where a slide's image lives and how it is decoded.

pub mod decoder;
pub mod locator;
pub mod probe;
pub mod resolver;

#[cfg(feature = "image")]
pub use decoder::{DecodedImage, RgbaDecoder};
pub use decoder::ImageDecoder;
pub use locator::SlideLocator;
#[cfg(feature = "image")]
pub use probe::FsProbe;
pub use probe::ResourceProbe;
pub use resolver::SchemeResolver;
