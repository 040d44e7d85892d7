mod entry;

use std::{collections::HashMap, time::Duration};

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::AccountSpec;

pub use entry::ScheduleEntry;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot schedule {account} with a zero interval")]
pub struct ZeroIntervalError {
    account: String,
}

/// Starts a run for an account without waiting for it to finish.
pub trait Launch: Clone + Send + Sync + 'static {
    fn launch(&self, account: &str);
}

/// One recurring timer per account.
///
/// Cancelling a timer never touches a run it already launched.
pub struct Scheduler<L: Launch> {
    launcher: L,
    entries: HashMap<String, ScheduleEntry>,
}

impl<L: Launch> std::fmt::Debug for Scheduler<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl<L: Launch> Scheduler<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            entries: HashMap::new(),
        }
    }

    /// Fires once right away, then every `period`, replacing an existing timer
    /// of `account`. A zero `period` is rejected and leaves the existing timer
    /// alone. Must be called from within a tokio runtime.
    pub fn start_schedule(
        &mut self,
        account: &str,
        period: Duration,
    ) -> Result<(), ZeroIntervalError> {
        if period.is_zero() {
            return Err(ZeroIntervalError {
                account: account.to_string(),
            });
        }
        let entry = ScheduleEntry::start(self.launcher.clone(), account, period);
        if let Some(previous) = self.entries.insert(account.to_string(), entry) {
            debug!(
                "replaced schedule of {account} (every {:?})",
                previous.interval()
            );
        }
        info!("syncing {account} every {period:?}");

        Ok(())
    }

    /// Schedules exactly the given accounts, stopping every other timer.
    ///
    /// Timers whose interval is unchanged keep running in their current phase.
    pub fn refresh(&mut self, accounts: &[AccountSpec], default_interval: Duration) {
        let unlisted: Vec<String> = self
            .accounts()
            .filter(|account| !accounts.iter().any(|spec| spec.name() == *account))
            .map(str::to_string)
            .collect();
        for account in unlisted {
            self.stop(&account);
            info!("stopped syncing {account}");
        }
        for spec in accounts {
            let period = spec.interval_or(default_interval);
            if self.interval(spec.name()) == Some(period) {
                continue;
            }
            if let Err(error) = self.start_schedule(spec.name(), period) {
                warn!("{error}");
            }
        }
    }

    pub fn stop(&mut self, account: &str) -> bool {
        self.entries.remove(account).is_some()
    }

    pub fn interval(&self, account: &str) -> Option<Duration> {
        self.entries.get(account).map(ScheduleEntry::interval)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use assertables::*;
    use rstest::*;
    use tokio::time::sleep;

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingLauncher {
        launched: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingLauncher {
        fn count(&self, account: &str) -> usize {
            self.launched
                .lock()
                .expect("launch log should be lockable")
                .iter()
                .filter(|launched| *launched == account)
                .count()
        }
    }

    impl Launch for RecordingLauncher {
        fn launch(&self, account: &str) {
            self.launched
                .lock()
                .expect("launch log should be lockable")
                .push(account.to_string());
        }
    }

    #[fixture]
    fn launcher() -> RecordingLauncher {
        RecordingLauncher::default()
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_schedule_fires_immediately_then_every_interval(launcher: RecordingLauncher) {
        let mut scheduler = Scheduler::new(launcher.clone());
        assert_ok!(scheduler.start_schedule("gmail", Duration::from_secs(60)));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(1, launcher.count("gmail"));
        sleep(Duration::from_secs(150)).await;
        assert_eq!(3, launcher.count("gmail"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_restarting_schedule_keeps_one_timer(launcher: RecordingLauncher) {
        let mut scheduler = Scheduler::new(launcher.clone());
        assert_ok!(scheduler.start_schedule("acct", Duration::from_secs(60)));
        assert_ok!(scheduler.start_schedule("acct", Duration::from_secs(60)));

        sleep(Duration::from_secs(150)).await;

        assert_eq!(vec!["acct"], scheduler.accounts().collect::<Vec<_>>());
        assert_eq!(Some(Duration::from_secs(60)), scheduler.interval("acct"));
        assert_eq!(3, launcher.count("acct"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_restarting_schedule_changes_interval(launcher: RecordingLauncher) {
        let mut scheduler = Scheduler::new(launcher.clone());
        assert_ok!(scheduler.start_schedule("acct", Duration::from_secs(60)));
        sleep(Duration::from_secs(1)).await;
        assert_ok!(scheduler.start_schedule("acct", Duration::from_secs(10)));

        sleep(Duration::from_secs(25)).await;

        assert_eq!(Some(Duration::from_secs(10)), scheduler.interval("acct"));
        assert_eq!(4, launcher.count("acct"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_accounts_run_on_independent_timers(launcher: RecordingLauncher) {
        let mut scheduler = Scheduler::new(launcher.clone());
        assert_ok!(scheduler.start_schedule("gmail", Duration::from_secs(60)));
        assert_ok!(scheduler.start_schedule("work", Duration::from_secs(30)));

        sleep(Duration::from_secs(100)).await;

        assert_eq!(2, launcher.count("gmail"));
        assert_eq!(4, launcher.count("work"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer(launcher: RecordingLauncher) {
        let mut scheduler = Scheduler::new(launcher.clone());
        assert_ok!(scheduler.start_schedule("gmail", Duration::from_secs(60)));
        sleep(Duration::from_secs(1)).await;

        assert!(scheduler.stop("gmail"));
        assert!(!scheduler.stop("gmail"));
        sleep(Duration::from_secs(300)).await;

        assert_eq!(1, launcher.count("gmail"));
        assert_none!(scheduler.interval("gmail"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_refresh_drops_unlisted_accounts(launcher: RecordingLauncher) {
        let mut scheduler = Scheduler::new(launcher.clone());
        assert_ok!(scheduler.start_schedule("old", Duration::from_secs(60)));
        let accounts = vec![
            AccountSpec::Name("gmail".to_string()),
            AccountSpec::WithInterval {
                name: "work".to_string(),
                interval: 30,
            },
        ];

        scheduler.refresh(&accounts, DEFAULT_INTERVAL);
        sleep(Duration::from_secs(1)).await;

        let mut scheduled: Vec<_> = scheduler.accounts().collect();
        scheduled.sort_unstable();
        assert_eq!(vec!["gmail", "work"], scheduled);
        assert_eq!(Some(DEFAULT_INTERVAL), scheduler.interval("gmail"));
        assert_eq!(Some(Duration::from_secs(30)), scheduler.interval("work"));
        assert_eq!(0, launcher.count("old"));
        assert_eq!(1, launcher.count("gmail"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_dropping_scheduler_stops_all_timers(launcher: RecordingLauncher) {
        let mut scheduler = Scheduler::new(launcher.clone());
        assert_ok!(scheduler.start_schedule("gmail", Duration::from_secs(60)));
        sleep(Duration::from_secs(1)).await;

        drop(scheduler);
        sleep(Duration::from_secs(600)).await;

        assert_eq!(1, launcher.count("gmail"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_rejected(launcher: RecordingLauncher) {
        let mut scheduler = Scheduler::new(launcher.clone());

        let error = assert_err!(scheduler.start_schedule("acct", Duration::ZERO));
        sleep(Duration::from_secs(5)).await;

        assert_eq!("cannot schedule acct with a zero interval", error.to_string());
        assert_none!(scheduler.interval("acct"));
        assert_eq!(0, launcher.count("acct"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_keeps_running_timer(launcher: RecordingLauncher) {
        let mut scheduler = Scheduler::new(launcher.clone());
        assert_ok!(scheduler.start_schedule("acct", Duration::from_secs(60)));

        assert_err!(scheduler.start_schedule("acct", Duration::ZERO));
        sleep(Duration::from_secs(90)).await;

        assert_eq!(Some(Duration::from_secs(60)), scheduler.interval("acct"));
        assert_eq!(2, launcher.count("acct"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_refresh_keeps_phase_of_unchanged_accounts(launcher: RecordingLauncher) {
        let mut scheduler = Scheduler::new(launcher.clone());
        let accounts = vec![
            AccountSpec::Name("gmail".to_string()),
            AccountSpec::WithInterval {
                name: "work".to_string(),
                interval: 60,
            },
        ];
        scheduler.refresh(&accounts, DEFAULT_INTERVAL);
        sleep(Duration::from_secs(1)).await;

        let changed = vec![
            AccountSpec::Name("gmail".to_string()),
            AccountSpec::WithInterval {
                name: "work".to_string(),
                interval: 30,
            },
        ];
        scheduler.refresh(&changed, DEFAULT_INTERVAL);
        sleep(Duration::from_secs(1)).await;

        assert_eq!(1, launcher.count("gmail"));
        assert_eq!(2, launcher.count("work"));
        assert_eq!(Some(Duration::from_secs(30)), scheduler.interval("work"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_refresh_skips_zero_interval_and_schedules_the_rest(
        launcher: RecordingLauncher,
    ) {
        let mut scheduler = Scheduler::new(launcher.clone());
        let accounts = vec![
            AccountSpec::WithInterval {
                name: "broken".to_string(),
                interval: 0,
            },
            AccountSpec::Name("gmail".to_string()),
        ];

        scheduler.refresh(&accounts, DEFAULT_INTERVAL);
        sleep(Duration::from_secs(1)).await;

        assert_eq!(vec!["gmail"], scheduler.accounts().collect::<Vec<_>>());
        assert_eq!(0, launcher.count("broken"));
        assert_eq!(1, launcher.count("gmail"));
    }
}
