use std::time::Duration;

use thiserror::Error;
use vitrine_core::settings::NamingSettings;

use super::models::Config;

/// Widest zero padding accepted for slide file names.
pub const MAX_PADDING: usize = 9;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigGuardRailError {
    #[error("total_slides must be at least 1")]
    EmptyCollection,
    #[error("preload capacity must be at least 1")]
    ZeroCapacity,
    #[error("image padding {padding} exceeds the maximum of {MAX_PADDING}")]
    PaddingTooWide { padding: usize },
    #[error("image extension must not be empty")]
    EmptyExtension,
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
    #[error(
        "safety timeout ({safety:?}) must be longer than the animation ({animation:?})"
    )]
    SafetyNotAfterAnimation { safety: Duration, animation: Duration },
    #[error("swipe threshold {field} must be positive")]
    InvalidSwipe { field: &'static str },
    #[error("deep link parameter must not be empty")]
    EmptyDeepLinkParam,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.gallery.total_slides == 0 {
        return Err(ConfigGuardRailError::EmptyCollection);
    }

    validate_naming(&config.gallery.naming, &mut warnings)?;

    let preload = &config.viewer.preload;
    if preload.capacity == 0 {
        return Err(ConfigGuardRailError::ZeroCapacity);
    }
    if preload.window_timeout_ms == 0 {
        return Err(ConfigGuardRailError::ZeroDuration {
            field: "window_timeout",
        });
    }

    let transition = &config.viewer.transition;
    for (field, millis) in [
        ("ready_timeout", transition.ready_timeout_ms),
        ("animation", transition.animation_ms),
        ("safety_timeout", transition.safety_timeout_ms),
    ] {
        if millis == 0 {
            return Err(ConfigGuardRailError::ZeroDuration { field });
        }
    }
    if transition.safety_timeout_ms <= transition.animation_ms {
        return Err(ConfigGuardRailError::SafetyNotAfterAnimation {
            safety: transition.safety_timeout(),
            animation: transition.animation(),
        });
    }

    let swipe = &config.viewer.swipe;
    for (field, value) in [
        ("distance_px", swipe.distance_px),
        ("velocity_px_per_ms", swipe.velocity_px_per_ms),
    ] {
        if !(value > 0.0) {
            return Err(ConfigGuardRailError::InvalidSwipe { field });
        }
    }
    if !(swipe.min_flick_px >= 0.0) {
        return Err(ConfigGuardRailError::InvalidSwipe {
            field: "min_flick_px",
        });
    }

    if config.viewer.deep_link_param.trim().is_empty() {
        return Err(ConfigGuardRailError::EmptyDeepLinkParam);
    }

    let distinct_window =
        preload.window_len().min(config.gallery.total_slides as usize);
    if preload.capacity < distinct_window {
        warnings.push_with_hint(
            format!(
                "preload capacity {} is smaller than the preload window ({} slides)",
                preload.capacity, distinct_window
            ),
            "Raise VITRINE_CACHE_CAPACITY or lower VITRINE_PRELOAD_RADIUS; otherwise the window evicts itself",
        );
    }

    Ok(warnings)
}

fn validate_naming(
    naming: &NamingSettings,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    match naming {
        NamingSettings::Fixed { padding, extension } => {
            check_padding(*padding)?;
            check_extension(extension)?;
        }
        NamingSettings::Detect {
            paddings,
            extensions,
        } => {
            for padding in paddings {
                check_padding(*padding)?;
            }
            for extension in extensions {
                check_extension(extension)?;
            }
            if paddings.is_empty() || extensions.is_empty() {
                warnings.push_with_hint(
                    "format detection is enabled without candidates; the default naming will be used",
                    "List paddings and extensions under [gallery.naming] or switch to mode = \"fixed\"",
                );
            }
        }
    }
    Ok(())
}

fn check_padding(padding: usize) -> Result<(), ConfigGuardRailError> {
    if padding > MAX_PADDING {
        return Err(ConfigGuardRailError::PaddingTooWide { padding });
    }
    Ok(())
}

fn check_extension(extension: &str) -> Result<(), ConfigGuardRailError> {
    if extension.trim().trim_start_matches('.').is_empty() {
        return Err(ConfigGuardRailError::EmptyExtension);
    }
    Ok(())
}
