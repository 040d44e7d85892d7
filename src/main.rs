mod cli;
mod config;
mod logging;
mod parser;
mod scheduler;
mod state;
mod supervisor;

use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use cli::Args;
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init();

    let config =
        Config::load_from_file(args.config.as_deref()).context("loading configuration failed")?;

    cli::run(&args, config).await
}
