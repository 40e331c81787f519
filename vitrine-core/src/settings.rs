//! Tunables for a gallery session and its viewer.
//!
//! These structs are what the configuration layer deserializes into, so every
//! field has a default and durations are stored as milliseconds.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vitrine_model::{DEFAULT_EXTENSION, DEFAULT_PADDING, NamingScheme};

pub const DEFAULT_TOTAL_SLIDES: u32 = 40;
pub const DEFAULT_IMAGE_DIR: &str = "img";
pub const DEFAULT_DEEP_LINK_PARAM: &str = "slide";

/// The numbered image collection a session presents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GallerySettings {
    /// Number of slides; validated into a `SlideCount` when the session starts.
    pub total_slides: u32,
    /// Directory holding `01.jpeg`, `02.jpeg`, ...
    pub image_dir: PathBuf,
    pub naming: NamingSettings,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            total_slides: DEFAULT_TOTAL_SLIDES,
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            naming: NamingSettings::default(),
        }
    }
}

/// How slide numbers map to file names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NamingSettings {
    /// A single known pattern.
    Fixed { padding: usize, extension: String },
    /// Probe slide 1 with every `(padding, extension)` pair, paddings outermost,
    /// and adopt the first one that loads.
    Detect {
        #[serde(default = "default_detect_paddings")]
        paddings: Vec<usize>,
        #[serde(default = "default_detect_extensions")]
        extensions: Vec<String>,
    },
}

impl NamingSettings {
    pub fn detect() -> Self {
        NamingSettings::Detect {
            paddings: default_detect_paddings(),
            extensions: default_detect_extensions(),
        }
    }

    /// Candidate schemes in probe order. A fixed scheme yields one candidate.
    pub fn candidates(&self) -> Vec<NamingScheme> {
        match self {
            NamingSettings::Fixed { padding, extension } => {
                vec![NamingScheme::new(*padding, extension.as_str())]
            }
            NamingSettings::Detect {
                paddings,
                extensions,
            } => paddings
                .iter()
                .flat_map(|padding| {
                    extensions
                        .iter()
                        .map(move |ext| NamingScheme::new(*padding, ext.as_str()))
                })
                .collect(),
        }
    }

    pub fn is_detect(&self) -> bool {
        matches!(self, NamingSettings::Detect { .. })
    }
}

impl Default for NamingSettings {
    fn default() -> Self {
        NamingSettings::Fixed {
            padding: DEFAULT_PADDING,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

pub fn default_detect_paddings() -> Vec<usize> {
    vec![2, 0, 3]
}

pub fn default_detect_extensions() -> Vec<String> {
    ["jpeg", "jpg", "png", "webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Residency cache and preload window sizing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PreloadSettings {
    /// Maximum decoded images kept alive. Eviction is first-in-first-out.
    pub capacity: usize,
    /// Slides on each side of the current one kept warm.
    pub radius: usize,
    /// Upper bound on waiting for a window to decode before presenting.
    pub window_timeout_ms: u64,
}

impl PreloadSettings {
    pub fn window_timeout(&self) -> Duration {
        Duration::from_millis(self.window_timeout_ms)
    }

    /// Number of slots a full window occupies.
    pub fn window_len(&self) -> usize {
        self.radius.saturating_mul(2).saturating_add(1)
    }
}

impl Default for PreloadSettings {
    fn default() -> Self {
        Self {
            capacity: 8,
            radius: 2,
            window_timeout_ms: 350,
        }
    }
}

/// Timing of a single slide transition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// How long to wait for the incoming slide to decode before animating anyway.
    pub ready_timeout_ms: u64,
    /// Visual animation duration requested from the stage.
    pub animation_ms: u64,
    /// Finish the transition even if the stage never reports completion.
    pub safety_timeout_ms: u64,
}

impl TransitionSettings {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    pub fn safety_timeout(&self) -> Duration {
        Duration::from_millis(self.safety_timeout_ms)
    }
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            ready_timeout_ms: 600,
            animation_ms: 450,
            safety_timeout_ms: 1200,
        }
    }
}

/// Drag release thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SwipeSettings {
    /// Horizontal travel that always commits.
    pub distance_px: f32,
    /// Average release speed that commits a short flick.
    pub velocity_px_per_ms: f32,
    /// Flicks shorter than this never commit.
    pub min_flick_px: f32,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            distance_px: 50.0,
            velocity_px_per_ms: 0.5,
            min_flick_px: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub preload: PreloadSettings,
    pub transition: TransitionSettings,
    pub swipe: SwipeSettings,
    /// Query parameter that carries the current slide.
    pub deep_link_param: String,
    /// Vertical scroll offset past which the index switches to engaged mode.
    pub engaged_scroll_px: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            preload: PreloadSettings::default(),
            transition: TransitionSettings::default(),
            swipe: SwipeSettings::default(),
            deep_link_param: DEFAULT_DEEP_LINK_PARAM.to_string(),
            engaged_scroll_px: 40.0,
        }
    }
}
