use std::time::Duration;

use serde::Deserialize;

/// An account to sync, optionally with its own interval in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AccountSpec {
    Name(String),
    WithInterval { name: String, interval: u64 },
}

impl AccountSpec {
    pub fn name(&self) -> &str {
        match self {
            AccountSpec::Name(name) | AccountSpec::WithInterval { name, .. } => name,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        match self {
            AccountSpec::Name(_) => None,
            AccountSpec::WithInterval { interval, .. } => Some(Duration::from_secs(*interval)),
        }
    }

    pub fn interval_or(&self, default: Duration) -> Duration {
        self.interval().unwrap_or(default)
    }
}
