use std::process::ExitCode;

use futures::future::join_all;
use jiff::tz::TimeZone;
use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::{
    cli::{StatusTable, log_event},
    config::{AccountSpec, Config},
    state::StateStore,
    supervisor::{RunHandle, RunOutcome, Supervisor},
};

/// Runs every account once and waits for all of them.
pub async fn sync_once(config: &Config, accounts: &[AccountSpec]) -> ExitCode {
    let store = StateStore::default();
    let (sender, mut events) = mpsc::unbounded_channel();
    let supervisor = Supervisor::new(config.sync_command(), config.parser(), store.clone(), sender);

    let runs: Vec<RunHandle> = accounts
        .iter()
        .map(|spec| supervisor.start_run(spec.name()))
        .collect();
    debug!(
        "{} of {} runs started",
        runs.iter().filter(|run| run.is_started()).count(),
        runs.len()
    );
    let outcomes = join_all(runs.into_iter().map(RunHandle::wait)).await;
    while let Ok(event) = events.try_recv() {
        log_event(&event);
    }

    for (spec, outcome) in accounts.iter().zip(&outcomes) {
        match outcome {
            RunOutcome::Committed { mailboxes } => {
                debug!("{}: {mailboxes} mailboxes reported", spec.name());
            }
            RunOutcome::Failed(reason) | RunOutcome::NotStarted(reason) => {
                debug!("{}: {reason}", spec.name());
            }
        }
        if store.get(spec.name()).is_none() {
            warn!("{}: mailbox counts are unknown", spec.name());
        }
    }
    let failed = outcomes.iter().filter(|outcome| !outcome.is_committed()).count();
    info!("{} of {} accounts synced", outcomes.len() - failed, outcomes.len());

    print!("{}", StatusTable::new(&store.snapshot(), TimeZone::system()));
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
