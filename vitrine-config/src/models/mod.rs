pub mod sources;

use std::path::PathBuf;

use vitrine_core::settings::{GallerySettings, ViewerSettings};

/// Fully composed configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gallery: GallerySettings,
    pub viewer: ViewerSettings,
    pub metadata: ConfigMetadata,
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
    /// Environment variables that overrode a file or default value.
    pub env_overrides: Vec<&'static str>,
}
