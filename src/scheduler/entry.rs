use std::time::Duration;

use log::trace;
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::scheduler::Launch;

/// Timer of one account. Aborts its timer task when dropped.
#[derive(Debug)]
pub struct ScheduleEntry {
    account: String,
    interval: Duration,
    timer: JoinHandle<()>,
}

impl ScheduleEntry {
    pub(super) fn start(launcher: impl Launch, account: &str, period: Duration) -> Self {
        let timer = tokio::spawn(tick(launcher, account.to_string(), period));

        Self {
            account: account.to_string(),
            interval: period,
            timer,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for ScheduleEntry {
    fn drop(&mut self) {
        trace!("cancelling timer of {}", self.account);
        self.timer.abort();
    }
}

async fn tick(launcher: impl Launch, account: String, period: Duration) {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        timer.tick().await;
        trace!("tick for {account}");
        launcher.launch(&account);
    }
}
