mod connected_to_journal;

use std::io::Write as _;

use anstyle::{AnsiColor, Effects, Style};
use env_logger::Env;
use jiff::Timestamp;
use log::Level;

use connected_to_journal::connected_to_journal;

/// Installs the global logger, `info` unless `RUST_LOG` says otherwise.
pub fn init() {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if connected_to_journal() {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "<{}>{}: {}",
                syslog_priority(record.level()),
                record.target(),
                record.args()
            )
        });
    } else {
        let subtle = AnsiColor::BrightBlack.on_default();
        builder.format(move |buf, record| {
            let level_style = level_style(record.level());
            write!(
                buf,
                "{subtle}[{subtle:#}{:.3} {level_style}{}{level_style:#} {}",
                Timestamp::now(),
                record.level(),
                record.target(),
            )?;
            if let Some(line) = record.line() {
                write!(buf, ":{line}")?;
            }
            writeln!(buf, "{subtle}]{subtle:#} {}", record.args())
        });
    }
    builder.init();
}

fn syslog_priority(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

fn level_style(level: Level) -> Style {
    match level {
        Level::Error => AnsiColor::Red.on_default().effects(Effects::BOLD),
        Level::Warn => AnsiColor::Yellow.on_default(),
        Level::Info => AnsiColor::Green.on_default(),
        Level::Debug => AnsiColor::Blue.on_default(),
        Level::Trace => AnsiColor::Cyan.on_default(),
    }
}
