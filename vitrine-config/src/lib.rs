//! Configuration loading for Vitrine.
//!
//! Settings are layered: built-in defaults, then a TOML file
//! (`vitrine.toml` or `config/vitrine.toml`, or the path given explicitly or
//! through `VITRINE_CONFIG`), then `VITRINE_*` environment variables, which
//! may come from a `.env` file. The composed [`Config`] passes through guard
//! rails before it is handed out; soft problems surface as
//! [`ConfigWarnings`].

pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{Config, ConfigMetadata};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
