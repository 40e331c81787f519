//! Command line for the `vitrine` binary.

use std::path::PathBuf;

use clap::Parser;
use vitrine_config::{ConfigLoader, ConfigLoaderOptions};

#[derive(Debug, Parser)]
#[command(name = "vitrine", version, about = "Browse a numbered image collection")]
pub struct Args {
    /// TOML configuration file (defaults to `vitrine.toml` when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Environment file loaded before reading `VITRINE_*` variables
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Open the viewer directly, e.g. `vitrine://viewer?slide=12` or `?slide=12`
    #[arg(value_name = "LINK")]
    pub link: Option<String>,
}

impl Args {
    pub fn loader(&self) -> ConfigLoader {
        ConfigLoader::with_options(ConfigLoaderOptions {
            config_path: self.config.clone(),
            env_file: self.env_file.clone(),
        })
    }
}
