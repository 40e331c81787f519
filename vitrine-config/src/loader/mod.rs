pub mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use vitrine_core::settings::{
    GallerySettings, NamingSettings, PreloadSettings, TransitionSettings,
    ViewerSettings,
};
use vitrine_model::{DEFAULT_EXTENSION, DEFAULT_PADDING};

use crate::models::sources::{EnvConfig, FileConfig};
use crate::models::{Config, ConfigMetadata};
use crate::validation::{self, ConfigWarnings};
pub use error::ConfigLoadError;

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] = ["vitrine.toml", "config/vitrine.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

/// Layers defaults, the TOML file and the environment, in that order.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Loads the `.env` file into the process environment, then composes the
    /// configuration from it.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        self.compose(EnvConfig::gather(), env_file_loaded)
    }

    /// Composes against explicit environment overrides; the process
    /// environment and `.env` files are not consulted.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        self.compose(env, false)
    }

    fn compose(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            compose_config(file_config, env, config_path, env_file_loaded)?;

        debug!(
            config_path = ?config.metadata.config_path,
            env_file_loaded,
            overrides = ?config.metadata.env_overrides,
            "configuration loaded"
        );
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(Path::new)
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.to_path_buf(),
                None => return Ok((None, None)),
            },
        };

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();
    for (name, raw) in &env.rejected {
        warnings.push_with_hint(
            format!("ignoring {name}={raw:?}: not a valid value"),
            "Durations accept forms like `350ms` or `1.2s`; booleans accept true/false",
        );
    }

    let FileConfig {
        gallery: file_gallery,
        preload: file_preload,
        transition: file_transition,
        swipe: file_swipe,
        viewer: file_viewer,
    } = file_config.unwrap_or_default();

    let mut overrides = Overrides::default();
    let gallery_defaults = GallerySettings::default();
    let preload_defaults = PreloadSettings::default();
    let transition_defaults = TransitionSettings::default();
    let viewer_defaults = ViewerSettings::default();

    let gallery = GallerySettings {
        total_slides: overrides.layer(
            "VITRINE_TOTAL_SLIDES",
            env.total_slides,
            file_gallery.total_slides,
            gallery_defaults.total_slides,
        ),
        image_dir: overrides.layer(
            "VITRINE_IMAGE_DIR",
            env.image_dir.clone(),
            file_gallery.image_dir,
            gallery_defaults.image_dir,
        ),
        naming: compose_naming(
            file_gallery.naming.unwrap_or_default(),
            &env,
            &mut overrides,
        ),
    };

    let preload = PreloadSettings {
        capacity: overrides.layer(
            "VITRINE_CACHE_CAPACITY",
            env.cache_capacity,
            file_preload.capacity,
            preload_defaults.capacity,
        ),
        radius: overrides.layer(
            "VITRINE_PRELOAD_RADIUS",
            env.preload_radius,
            file_preload.radius,
            preload_defaults.radius,
        ),
        window_timeout_ms: overrides.layer_millis(
            "VITRINE_WINDOW_TIMEOUT",
            env.window_timeout,
            file_preload.window_timeout,
            preload_defaults.window_timeout_ms,
        ),
    };

    let transition = TransitionSettings {
        ready_timeout_ms: overrides.layer_millis(
            "VITRINE_READY_TIMEOUT",
            env.ready_timeout,
            file_transition.ready_timeout,
            transition_defaults.ready_timeout_ms,
        ),
        animation_ms: overrides.layer_millis(
            "VITRINE_ANIMATION",
            env.animation,
            file_transition.animation,
            transition_defaults.animation_ms,
        ),
        safety_timeout_ms: overrides.layer_millis(
            "VITRINE_SAFETY_TIMEOUT",
            env.safety_timeout,
            file_transition.safety_timeout,
            transition_defaults.safety_timeout_ms,
        ),
    };

    let viewer = ViewerSettings {
        preload,
        transition,
        swipe: file_swipe.unwrap_or(viewer_defaults.swipe),
        deep_link_param: overrides.layer(
            "VITRINE_DEEP_LINK_PARAM",
            env.deep_link_param.clone(),
            file_viewer.deep_link_param,
            viewer_defaults.deep_link_param,
        ),
        engaged_scroll_px: file_viewer
            .engaged_scroll_px
            .unwrap_or(viewer_defaults.engaged_scroll_px),
    };

    let config = Config {
        gallery,
        viewer,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
            env_overrides: overrides.applied,
        },
    };

    let guard_warnings = validation::apply_guard_rails(&config)?;
    warnings.extend(guard_warnings);

    Ok((config, warnings))
}

/// Applies the environment's naming overrides on top of the file's naming.
///
/// `VITRINE_DETECT_FORMAT=true` switches to detection (keeping file
/// candidates when the file already detects). An explicit padding or
/// extension, or `VITRINE_DETECT_FORMAT=false`, pins a fixed scheme.
fn compose_naming(
    base: NamingSettings,
    env: &EnvConfig,
    overrides: &mut Overrides,
) -> NamingSettings {
    if env.detect_format == Some(true) {
        overrides.applied.push("VITRINE_DETECT_FORMAT");
        return if base.is_detect() {
            base
        } else {
            NamingSettings::detect()
        };
    }

    let pinned = env.detect_format == Some(false)
        || env.image_padding.is_some()
        || env.image_extension.is_some();
    if !pinned {
        return base;
    }

    if env.detect_format == Some(false) {
        overrides.applied.push("VITRINE_DETECT_FORMAT");
    }
    let (base_padding, base_extension) = match base {
        NamingSettings::Fixed { padding, extension } => (padding, extension),
        NamingSettings::Detect { .. } => {
            (DEFAULT_PADDING, DEFAULT_EXTENSION.to_string())
        }
    };
    NamingSettings::Fixed {
        padding: overrides.layer(
            "VITRINE_IMAGE_PADDING",
            env.image_padding,
            None,
            base_padding,
        ),
        extension: overrides.layer(
            "VITRINE_IMAGE_EXTENSION",
            env.image_extension.clone(),
            None,
            base_extension,
        ),
    }
}

#[derive(Debug, Default)]
struct Overrides {
    applied: Vec<&'static str>,
}

impl Overrides {
    fn layer<T>(
        &mut self,
        name: &'static str,
        env: Option<T>,
        file: Option<T>,
        default: T,
    ) -> T {
        if let Some(value) = env {
            self.applied.push(name);
            return value;
        }
        file.unwrap_or(default)
    }

    fn layer_millis(
        &mut self,
        name: &'static str,
        env: Option<Duration>,
        file: Option<Duration>,
        default: u64,
    ) -> u64 {
        self.layer(name, env.map(millis), file.map(millis), default)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
