use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vitrine_core::settings::{NamingSettings, SwipeSettings};

use crate::util::{humantime_opt, parse_bool, parse_duration};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub gallery: FileGalleryConfig,
    #[serde(default)]
    pub preload: FilePreloadConfig,
    #[serde(default)]
    pub transition: FileTransitionConfig,
    pub swipe: Option<SwipeSettings>,
    #[serde(default)]
    pub viewer: FileViewerConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileGalleryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_slides: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naming: Option<NamingSettings>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FilePreloadConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<usize>,
    #[serde(default, with = "humantime_opt", skip_serializing_if = "Option::is_none")]
    pub window_timeout: Option<Duration>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileTransitionConfig {
    #[serde(default, with = "humantime_opt", skip_serializing_if = "Option::is_none")]
    pub ready_timeout: Option<Duration>,
    #[serde(default, with = "humantime_opt", skip_serializing_if = "Option::is_none")]
    pub animation: Option<Duration>,
    #[serde(default, with = "humantime_opt", skip_serializing_if = "Option::is_none")]
    pub safety_timeout: Option<Duration>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileViewerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_link_param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engaged_scroll_px: Option<f32>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub total_slides: Option<u32>,
    pub image_dir: Option<PathBuf>,
    pub image_padding: Option<usize>,
    pub image_extension: Option<String>,
    pub detect_format: Option<bool>,
    pub cache_capacity: Option<usize>,
    pub preload_radius: Option<usize>,
    pub window_timeout: Option<Duration>,
    pub ready_timeout: Option<Duration>,
    pub safety_timeout: Option<Duration>,
    pub animation: Option<Duration>,
    pub deep_link_param: Option<String>,
    /// Variables that were set but could not be parsed, as `(name, value)`.
    pub rejected: Vec<(&'static str, String)>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the overrides from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env = EnvReader {
            lookup,
            rejected: Vec::new(),
        };

        let mut env_config = Self::default();
        env_config.config_path = env.string("VITRINE_CONFIG").map(PathBuf::from);
        env_config.total_slides = env.parsed("VITRINE_TOTAL_SLIDES");
        env_config.image_dir = env.string("VITRINE_IMAGE_DIR").map(PathBuf::from);
        env_config.image_padding = env.parsed("VITRINE_IMAGE_PADDING");
        env_config.image_extension = env.string("VITRINE_IMAGE_EXTENSION");
        env_config.detect_format = env.with("VITRINE_DETECT_FORMAT", parse_bool);
        env_config.cache_capacity = env.parsed("VITRINE_CACHE_CAPACITY");
        env_config.preload_radius = env.parsed("VITRINE_PRELOAD_RADIUS");
        env_config.window_timeout = env.with("VITRINE_WINDOW_TIMEOUT", parse_duration);
        env_config.ready_timeout = env.with("VITRINE_READY_TIMEOUT", parse_duration);
        env_config.safety_timeout = env.with("VITRINE_SAFETY_TIMEOUT", parse_duration);
        env_config.animation = env.with("VITRINE_ANIMATION", parse_duration);
        env_config.deep_link_param = env.string("VITRINE_DEEP_LINK_PARAM");

        env_config.rejected = env.rejected;
        env_config
    }
}

struct EnvReader<F> {
    lookup: F,
    rejected: Vec<(&'static str, String)>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Non-blank value of `name`.
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|value| !value.trim().is_empty())
    }

    fn with<T>(&mut self, name: &'static str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let raw = self.string(name)?;
        match parse(&raw) {
            Some(value) => Some(value),
            None => {
                self.rejected.push((name, raw));
                None
            }
        }
    }

    fn parsed<T: FromStr>(&mut self, name: &'static str) -> Option<T> {
        self.with(name, |raw| raw.trim().parse().ok())
    }
}
