mod event;
mod run;

use std::{io, process::Stdio, sync::Arc};

use derive_getters::Getters;
use log::{debug, trace, warn};
use thiserror::Error;
use tokio::{
    process::{Child, Command},
    sync::mpsc,
};

use crate::{parser::Parser, scheduler::Launch, state::StateStore};

pub use event::Event;
pub use run::{RunHandle, RunOutcome};

#[derive(Debug, Error)]
#[error("cannot launch {program}: {source}")]
pub struct SpawnError {
    program: String,
    source: io::Error,
}

/// Invocation of the sync utility, completed by the account name.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SyncCommand {
    program: String,
    args: Vec<String>,
}

impl SyncCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn spawn(&self, account: &str) -> Result<Child, SpawnError> {
        Command::new(self.program())
            .args(self.args())
            .arg(account)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SpawnError {
                program: self.program.clone(),
                source,
            })
    }
}

/// Launches sync runs and is the only writer of the [`StateStore`].
#[derive(Clone)]
pub struct Supervisor {
    command: Arc<SyncCommand>,
    parser: Arc<Parser>,
    store: StateStore,
    events: mpsc::UnboundedSender<Event>,
}

impl Supervisor {
    pub fn new(
        command: SyncCommand,
        parser: Parser,
        store: StateStore,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            command: Arc::new(command),
            parser: Arc::new(parser),
            store,
            events,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn start_run(&self, account: &str) -> RunHandle {
        match self.command.spawn(account) {
            Ok(child) => {
                debug!(
                    "started {} for {account} as pid {:?}",
                    self.command.program(),
                    child.id()
                );
                let supervisor = self.clone();
                let account = account.to_string();
                RunHandle::running(tokio::spawn(supervisor.finish(account, child)))
            }
            Err(error) => {
                let reason = error.to_string();
                self.emit(Event::Failed {
                    account: account.to_string(),
                    reason: reason.clone(),
                });
                RunHandle::not_started(reason)
            }
        }
    }

    async fn finish(self, account: String, child: Child) -> RunOutcome {
        let output = match child.wait_with_output().await {
            Ok(output) => output,
            Err(error) => {
                let reason = error.to_string();
                self.emit(Event::Failed {
                    account,
                    reason: reason.clone(),
                });
                return RunOutcome::Failed(reason);
            }
        };
        if !output.status.success() {
            let reason = run::exit_reason(output.status);
            debug!(
                "{account} stderr: {}",
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
            self.emit(Event::Failed {
                account,
                reason: reason.clone(),
            });
            return RunOutcome::Failed(reason);
        }

        let mut buffer = String::from_utf8_lossy(&output.stdout).into_owned();
        buffer.push_str(&String::from_utf8_lossy(&output.stderr));
        trace!("{account} produced {} bytes of output", buffer.len());
        let state = self.parser.parse(&account, &buffer);
        drop(buffer);

        let mailboxes = state.len();
        let inbox = state.inbox().cloned();
        self.store.commit(&account, state);
        self.emit(Event::Synced { account, inbox });

        RunOutcome::Committed { mailboxes }
    }

    fn emit(&self, event: Event) {
        if let Err(mpsc::error::SendError(event)) = self.events.send(event) {
            warn!("nobody listens for events, dropping: {event}");
        }
    }
}

impl Launch for Supervisor {
    fn launch(&self, account: &str) {
        drop(self.start_run(account));
    }
}
