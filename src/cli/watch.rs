use std::process::ExitCode;

use anyhow::{Context as _, Result};
use jiff::tz::TimeZone;
use log::{info, warn};
use tokio::{
    select,
    signal::{
        ctrl_c,
        unix::{SignalKind, signal},
    },
    sync::mpsc,
};

use crate::{
    cli::{Args, StatusTable, log_event},
    config::Config,
    scheduler::Scheduler,
    state::StateStore,
    supervisor::{Event, Supervisor},
};

fn schedule(
    args: &Args,
    config: &Config,
    store: &StateStore,
    events: &mpsc::UnboundedSender<Event>,
) -> Result<Scheduler<Supervisor>> {
    let accounts = config.select(&args.accounts)?;
    let supervisor = Supervisor::new(
        config.sync_command(),
        config.parser(),
        store.clone(),
        events.clone(),
    );
    let mut scheduler = Scheduler::new(supervisor);
    scheduler.refresh(&accounts, config.interval());

    Ok(scheduler)
}

/// Applies a reloaded config, refreshing the live schedule unless the way the
/// utility is invoked or parsed changed.
fn reschedule(
    args: &Args,
    current: &Config,
    reloaded: &Config,
    scheduler: &mut Scheduler<Supervisor>,
    store: &StateStore,
    events: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    if reloaded.sync_command() == current.sync_command() && reloaded.side() == current.side() {
        let accounts = reloaded.select(&args.accounts)?;
        scheduler.refresh(&accounts, reloaded.interval());
    } else {
        info!("sync command changed, restarting every schedule");
        *scheduler = schedule(args, reloaded, store, events)?;
    }

    Ok(())
}

/// Keeps every account on its schedule until interrupted.
///
/// SIGHUP reloads the config and reschedules, SIGUSR1 prints the schedule and
/// the status table.
pub async fn watch(args: &Args, mut config: Config) -> Result<ExitCode> {
    let store = StateStore::default();
    let (sender, mut events) = mpsc::unbounded_channel();
    let mut scheduler = schedule(args, &config, &store, &sender)?;

    let mut hangup = signal(SignalKind::hangup()).context("installing SIGHUP handler")?;
    let mut user1 =
        signal(SignalKind::user_defined1()).context("installing SIGUSR1 handler")?;
    let mut terminate = signal(SignalKind::terminate()).context("installing SIGTERM handler")?;

    loop {
        select! {
            Some(event) = events.recv() => log_event(&event),
            _ = hangup.recv() => {
                let reloaded = Config::load_from_file(args.config.as_deref())
                    .map_err(anyhow::Error::from)
                    .and_then(|reloaded| {
                        reschedule(args, &config, &reloaded, &mut scheduler, &store, &sender)?;
                        Ok(reloaded)
                    });
                match reloaded {
                    Ok(reloaded) => {
                        info!("config reloaded");
                        config = reloaded;
                    }
                    Err(error) => warn!("keeping current schedule, reload failed: {error:#}"),
                }
            }
            _ = user1.recv() => {
                for account in scheduler.accounts() {
                    if let Some(interval) = scheduler.interval(account) {
                        info!("{account} syncs every {interval:?}");
                    }
                }
                print!("{}", StatusTable::new(&store.snapshot(), TimeZone::system()));
            }
            _ = terminate.recv() => break,
            result = ctrl_c() => {
                result.context("waiting for Ctrl-C")?;
                break;
            }
        }
    }

    drop(scheduler);
    print!("{}", StatusTable::new(&store.snapshot(), TimeZone::system()));
    Ok(ExitCode::SUCCESS)
}
