mod once;
mod status;
mod watch;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use crate::{config::Config, supervisor::Event};

pub use once::sync_once;
pub use status::StatusTable;
pub use watch::watch;

/// Periodically runs mbsync for each account and tracks mailbox counts.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Config file [default: $XDG_CONFIG_HOME/mbwatch/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only sync this account, may be given multiple times
    #[arg(short, long = "account", value_name = "ACCOUNT")]
    pub accounts: Vec<String>,

    /// Sync every account once, print the status table and exit
    #[arg(long)]
    pub once: bool,
}

pub async fn run(args: &Args, config: Config) -> Result<ExitCode> {
    if args.once {
        let accounts = config.select(&args.accounts)?;
        Ok(sync_once(&config, &accounts).await)
    } else {
        watch(args, config).await
    }
}

fn log_event(event: &Event) {
    match event {
        Event::Synced { .. } => info!("{event}"),
        Event::Failed { .. } => warn!("{event}"),
    }
}
