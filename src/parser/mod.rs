mod lines;

use std::num::ParseIntError;

use jiff::Timestamp;
use log::{trace, warn};
use thiserror::Error;

use crate::state::{AccountState, CountError, MailboxState};

use lines::{Summary, opening_line, summary_line};

#[derive(Debug, Error)]
enum EntryError {
    #[error("count out of range: {0}")]
    Number(#[from] ParseIntError),
    #[error(transparent)]
    Count(#[from] CountError),
}

#[derive(Clone, Copy)]
enum Scan<'a> {
    SeekingOpening,
    SeekingSummary(&'a str),
}

/// Turns the verbose progress output of the sync utility into mailbox counts.
#[derive(Debug, Clone)]
pub struct Parser {
    side: String,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new("master")
    }
}

impl Parser {
    /// `side` is the store label the utility prints, `master` for mbsync < 1.4.
    pub fn new(side: impl Into<String>) -> Self {
        Self { side: side.into() }
    }

    pub fn parse(&self, account: &str, output: &str) -> AccountState {
        self.parse_at(account, output, Timestamp::now())
    }

    /// Mailboxes whose opening line is not followed by a summary before the
    /// next opening line are left out.
    pub fn parse_at(&self, account: &str, output: &str, checked_at: Timestamp) -> AccountState {
        let mut state = AccountState::default();
        let mut scan = Scan::SeekingOpening;

        for line in output.lines() {
            if let Some(mailbox) = opening_line(&self.side, line) {
                if let Scan::SeekingSummary(unfinished) = scan {
                    trace!("{account}: no summary for {unfinished}, skipping");
                }
                scan = Scan::SeekingSummary(mailbox);
                continue;
            }
            let Scan::SeekingSummary(mailbox) = scan else {
                continue;
            };
            if let Some(summary) = summary_line(&self.side, line) {
                match Self::mailbox_state(mailbox, &summary, checked_at) {
                    Ok(mailbox_state) => state.upsert(mailbox_state),
                    Err(error) => warn!("{account}: ignoring counts of {mailbox}: {error}"),
                }
                scan = Scan::SeekingOpening;
            }
        }
        if let Scan::SeekingSummary(unfinished) = scan {
            trace!("{account}: output ended before summary of {unfinished}");
        }

        state
    }

    fn mailbox_state(
        mailbox: &str,
        summary: &Summary,
        checked_at: Timestamp,
    ) -> Result<MailboxState, EntryError> {
        let total = summary.total.parse()?;
        let recent = summary.recent.parse()?;

        Ok(MailboxState::new(mailbox, checked_at, total, recent)?)
    }
}
