use derive_getters::Getters;
use jiff::Timestamp;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("mailbox {mailbox} reports {recent} recent of only {total} messages")]
pub struct CountError {
    mailbox: String,
    total: u32,
    recent: u32,
}

/// Message counts of one mailbox as reported by a single completed run.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MailboxState {
    mailbox: String,
    #[getter(skip)]
    last_checked: Timestamp,
    #[getter(skip)]
    total: u32,
    #[getter(skip)]
    recent: u32,
}

impl MailboxState {
    pub fn new(
        mailbox: impl Into<String>,
        last_checked: Timestamp,
        total: u32,
        recent: u32,
    ) -> Result<Self, CountError> {
        let mailbox = mailbox.into();
        if recent > total {
            return Err(CountError {
                mailbox,
                total,
                recent,
            });
        }
        Ok(Self {
            mailbox,
            last_checked,
            total,
            recent,
        })
    }

    pub fn last_checked(&self) -> Timestamp {
        self.last_checked
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn recent(&self) -> u32 {
        self.recent
    }
}
