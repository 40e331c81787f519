use anyhow::Context;
use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use vitrine_player::app::{self, AppConfig};
use vitrine_player::cli::Args;

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("vitrine_player", LevelFilter::Debug)
        .filter_module("vitrine_core", LevelFilter::Info)
        .init();
}

fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let args = Args::parse();
    let load = args
        .loader()
        .load()
        .context("failed to load vitrine configuration")?;

    for warning in load.warnings.iter() {
        match &warning.hint {
            Some(hint) => log::warn!("{} ({hint})", warning.message),
            None => log::warn!("{}", warning.message),
        }
    }

    let config = AppConfig::new(load.config, args.link.as_deref())
        .context("invalid deep link")?;

    app::application(config).run()?;
    Ok(())
}
