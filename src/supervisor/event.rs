use std::fmt::{Display, Formatter, Result};

use crate::state::MailboxState;

/// Diagnostics about finished runs, consumed by whoever hosts the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Synced {
        account: String,
        inbox: Option<MailboxState>,
    },
    Failed {
        account: String,
        reason: String,
    },
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Event::Synced {
                account,
                inbox: Some(inbox),
            } => write!(
                f,
                "synced {account}: {}/{} in {}",
                inbox.recent(),
                inbox.total(),
                inbox.mailbox()
            ),
            Event::Synced {
                account,
                inbox: None,
            } => write!(f, "synced {account}"),
            Event::Failed { account, reason } => write!(f, "sync of {account} failed: {reason}"),
        }
    }
}
