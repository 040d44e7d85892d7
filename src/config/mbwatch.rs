use std::{
    collections::HashSet,
    fs::read_to_string,
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use derive_getters::Getters;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    config::{AccountSpec, default_config_file},
    parser::Parser,
    scheduler::DEFAULT_INTERVAL,
    supervisor::SyncCommand,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    NoHome,
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no accounts configured")]
    NoAccounts,
    #[error("interval of {0} must be at least one second")]
    ZeroInterval(String),
    #[error("account {0} is configured twice")]
    DuplicateAccount(String),
    #[error("account {0} is not configured")]
    UnknownAccount(String),
}

fn program() -> String {
    "mbsync".to_string()
}

fn args() -> Vec<String> {
    vec!["-V".to_string()]
}

fn side() -> String {
    "master".to_string()
}

fn interval() -> u64 {
    DEFAULT_INTERVAL.as_secs()
}

#[derive(Debug, Deserialize, Getters)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "program")]
    program: String,
    #[serde(default = "args")]
    args: Vec<String>,
    #[serde(default = "side")]
    side: String,
    #[serde(default = "interval")]
    #[getter(skip)]
    interval: u64,
    accounts: Vec<AccountSpec>,
}

impl Config {
    pub fn load_from_file(file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = match file {
            Some(file) => file.to_path_buf(),
            None => default_config_file()?,
        };
        debug!("loading config from {}", config_file.display());
        let contents = read_to_string(&config_file).map_err(|source| ConfigError::Read {
            path: config_file,
            source,
        })?;

        contents.parse()
    }

    /// Default interval of accounts that do not set their own.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn sync_command(&self) -> SyncCommand {
        SyncCommand::new(self.program(), self.args().clone())
    }

    pub fn parser(&self) -> Parser {
        Parser::new(self.side())
    }

    /// Configured accounts, restricted to `only` unless it is empty.
    pub fn select(&self, only: &[String]) -> Result<Vec<AccountSpec>, ConfigError> {
        if let Some(unknown) = only
            .iter()
            .find(|name| !self.accounts().iter().any(|spec| spec.name() == name.as_str()))
        {
            return Err(ConfigError::UnknownAccount(unknown.clone()));
        }

        Ok(self
            .accounts()
            .iter()
            .filter(|spec| only.is_empty() || only.iter().any(|name| name == spec.name()))
            .cloned()
            .collect())
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.accounts.is_empty() {
            return Err(ConfigError::NoAccounts);
        }
        if self.interval == 0 {
            return Err(ConfigError::ZeroInterval("default".to_string()));
        }
        let mut seen = HashSet::new();
        for spec in &self.accounts {
            if !seen.insert(spec.name()) {
                return Err(ConfigError::DuplicateAccount(spec.name().to_string()));
            }
            if spec.interval().is_some_and(|interval| interval.is_zero()) {
                return Err(ConfigError::ZeroInterval(spec.name().to_string()));
            }
        }

        Ok(self)
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        toml::from_str::<Config>(contents)?.validate()
    }
}
