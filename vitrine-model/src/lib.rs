//! Core data model definitions shared across Vitrine crates.
#![allow(missing_docs)]

pub mod direction;
pub mod error;
pub mod naming;
pub mod slide;

// Intentionally curated re-exports for downstream consumers.
pub use direction::Direction;
pub use error::{ModelError, Result as ModelResult};
pub use naming::{DEFAULT_EXTENSION, DEFAULT_PADDING, NamingScheme};
pub use slide::{SlideCount, SlideCounter, SlideNumber, parse_leading_int};
