use std::path::{Path, PathBuf};

use crate::slide::SlideNumber;

pub const DEFAULT_PADDING: usize = 2;
pub const DEFAULT_EXTENSION: &str = "jpeg";

/// File naming convention for a numbered image directory, e.g. `07.jpeg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamingScheme {
    /// Minimum digit count; shorter numbers are left-padded with zeros.
    pub padding: usize,
    /// Extension without the leading dot.
    pub extension: String,
}

impl NamingScheme {
    pub fn new(padding: usize, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            padding,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn file_name(&self, slide: SlideNumber) -> String {
        format!(
            "{:0width$}.{}",
            slide.get(),
            self.extension,
            width = self.padding
        )
    }

    pub fn location_in(&self, directory: &Path, slide: SlideNumber) -> PathBuf {
        directory.join(self.file_name(slide))
    }
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self::new(DEFAULT_PADDING, DEFAULT_EXTENSION)
    }
}

impl std::fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", "0".repeat(self.padding.max(1)), self.extension)
    }
}
