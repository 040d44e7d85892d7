use std::fmt::{Display, Formatter, Result};

use jiff::tz::TimeZone;

use crate::state::{MailboxState, Snapshot};

const HEADER: [&str; 5] = ["ACCOUNT", "MAILBOX", "RECENT", "TOTAL", "LAST CHECKED"];

/// Plain-text table of a snapshot, one row per mailbox.
pub struct StatusTable<'a> {
    snapshot: &'a Snapshot,
    time_zone: TimeZone,
}

impl<'a> StatusTable<'a> {
    pub fn new(snapshot: &'a Snapshot, time_zone: TimeZone) -> Self {
        Self {
            snapshot,
            time_zone,
        }
    }

    fn rows(&self) -> Vec<[String; 5]> {
        let mut rows = Vec::new();
        for (account, state) in self.snapshot.iter() {
            if state.is_empty() {
                rows.push([
                    account.clone(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ]);
            }
            for mailbox in state.iter() {
                rows.push(self.row(account, mailbox));
            }
        }
        rows
    }

    fn row(&self, account: &str, mailbox: &MailboxState) -> [String; 5] {
        [
            account.to_string(),
            mailbox.mailbox().clone(),
            mailbox.recent().to_string(),
            mailbox.total().to_string(),
            mailbox
                .last_checked()
                .to_zoned(self.time_zone.clone())
                .strftime("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ]
    }
}

impl Display for StatusTable<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.snapshot.is_empty() {
            return writeln!(f, "no account synced yet");
        }
        let rows = self.rows();
        let mut widths = HEADER.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let header = HEADER.map(str::to_string);
        for row in std::iter::once(&header).chain(&rows) {
            writeln!(
                f,
                "{:<w0$}  {:<w1$}  {:>w2$}  {:>w3$}  {}",
                row[0],
                row[1],
                row[2],
                row[3],
                row[4],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
            )?;
        }
        Ok(())
    }
}
