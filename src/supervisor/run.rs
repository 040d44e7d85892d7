use std::process::ExitStatus;

use tokio::task::JoinHandle;

/// How a single run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Committed { mailboxes: usize },
    Failed(String),
    NotStarted(String),
}

impl RunOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, RunOutcome::Committed { .. })
    }
}

enum Run {
    Running(JoinHandle<RunOutcome>),
    NotStarted(String),
}

/// Handle to a launched run.
///
/// Dropping it detaches the run, which still commits its result.
pub struct RunHandle {
    run: Run,
}

impl RunHandle {
    pub(super) fn running(task: JoinHandle<RunOutcome>) -> Self {
        Self {
            run: Run::Running(task),
        }
    }

    pub(super) fn not_started(reason: String) -> Self {
        Self {
            run: Run::NotStarted(reason),
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self.run, Run::Running(_))
    }

    pub async fn wait(self) -> RunOutcome {
        match self.run {
            Run::Running(task) => task
                .await
                .unwrap_or_else(|error| RunOutcome::Failed(error.to_string())),
            Run::NotStarted(reason) => RunOutcome::NotStarted(reason),
        }
    }
}

pub(super) fn exit_reason(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt as _;

    match (status.code(), status.signal()) {
        (Some(code), _) => format!("exited abnormally with code {code}"),
        (None, Some(signal)) => format!("killed by signal {signal}"),
        (None, None) => status.to_string(),
    }
}
