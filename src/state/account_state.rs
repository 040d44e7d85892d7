use crate::state::MailboxState;

/// Mailboxes of one account in the order the sync utility first reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    mailboxes: Vec<MailboxState>,
}

impl AccountState {
    /// Adds `state`, replacing an earlier entry of the same mailbox in place.
    pub fn upsert(&mut self, state: MailboxState) {
        if let Some(existing) = self
            .mailboxes
            .iter_mut()
            .find(|existing| existing.mailbox() == state.mailbox())
        {
            *existing = state;
        } else {
            self.mailboxes.push(state);
        }
    }

    pub fn get(&self, mailbox: &str) -> Option<&MailboxState> {
        self.mailboxes
            .iter()
            .find(|state| state.mailbox() == mailbox)
    }

    pub fn inbox(&self) -> Option<&MailboxState> {
        self.get("INBOX")
    }

    pub fn iter(&self) -> impl Iterator<Item = &MailboxState> {
        self.mailboxes.iter()
    }

    pub fn len(&self) -> usize {
        self.mailboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mailboxes.is_empty()
    }
}

impl<'a> IntoIterator for &'a AccountState {
    type Item = &'a MailboxState;

    type IntoIter = std::slice::Iter<'a, MailboxState>;

    fn into_iter(self) -> Self::IntoIter {
        self.mailboxes.iter()
    }
}
