// src/main.rs
use anyhow::{Context, Result};
use log::info;
use pyro_reader::config::AppConfig;
use pyro_reader::engine;
fn main() -> Result<()> {
    env_logger::init();
    let config = AppConfig::load().context("failed to load configuration")?;
    info!(
        "pyro-reader starting: {:?} source, window of {} samples",
        config.source, config.window_capacity
    );
    engine::run(config)
}
