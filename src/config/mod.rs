mod account;
mod mbwatch;

use std::env;
use std::path::PathBuf;

pub use account::AccountSpec;
pub use mbwatch::{Config, ConfigError};

fn default_config_file() -> Result<PathBuf, ConfigError> {
    let mut config_file = if let Some(config_home) = env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(config_home)
    } else {
        let mut config_home = PathBuf::from(env::var_os("HOME").ok_or(ConfigError::NoHome)?);
        config_home.push(".config");
        config_home
    };
    config_file.push(env!("CARGO_PKG_NAME"));
    config_file.push("config.toml");

    Ok(config_file)
}
