use std::path::{Path, PathBuf};
use std::sync::Arc;

use vitrine_model::{NamingScheme, SlideCount, SlideNumber};

/// Resolved addressing for one session: directory, naming scheme and
/// collection size. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideLocator {
    directory: Arc<Path>,
    scheme: NamingScheme,
    total: SlideCount,
}

impl SlideLocator {
    pub fn new(
        directory: impl Into<PathBuf>,
        scheme: NamingScheme,
        total: SlideCount,
    ) -> Self {
        Self {
            directory: Arc::from(directory.into()),
            scheme,
            total,
        }
    }

    pub fn location(&self, slide: SlideNumber) -> PathBuf {
        self.scheme.location_in(&self.directory, slide)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn scheme(&self) -> &NamingScheme {
        &self.scheme
    }

    pub fn total(&self) -> SlideCount {
        self.total
    }
}
