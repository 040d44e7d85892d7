use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock},
};

use log::trace;

use crate::state::AccountState;

/// Point-in-time view of every account that completed at least one run.
pub type Snapshot = Arc<BTreeMap<String, Arc<AccountState>>>;

/// Last known good state of every account.
///
/// Commits swap in a fresh map, so a [`Snapshot`] taken before a commit is
/// never touched by it and readers only hold the lock for an `Arc` clone.
#[derive(Clone, Default)]
pub struct StateStore {
    accounts: Arc<RwLock<Snapshot>>,
}

impl StateStore {
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.accounts.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn get(&self, account: &str) -> Option<Arc<AccountState>> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(account)
            .cloned()
    }

    pub(crate) fn commit(&self, account: &str, state: AccountState) {
        let state = Arc::new(state);
        let mut accounts = self
            .accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next = BTreeMap::clone(&accounts);
        next.insert(account.to_string(), state);
        *accounts = Arc::new(next);
        trace!("committed state of {account}");
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use jiff::Timestamp;
    use rstest::*;

    use super::*;
    use crate::state::MailboxState;

    fn account_state(total: u32, recent: u32) -> AccountState {
        let mut state = AccountState::default();
        state.upsert(assert_ok!(MailboxState::new(
            "INBOX",
            Timestamp::UNIX_EPOCH,
            total,
            recent
        )));
        state
    }

    #[rstest]
    fn test_get_returns_none_before_first_commit() {
        let store = StateStore::default();
        assert_none!(store.get("gmail"));
        assert!(store.snapshot().is_empty());
    }

    #[rstest]
    fn test_commit_replaces_whole_account_state() {
        let store = StateStore::default();
        store.commit("gmail", account_state(10, 1));
        store.commit("gmail", AccountState::default());

        let state = assert_some!(store.get("gmail"));
        assert!(state.is_empty());
    }

    #[rstest]
    fn test_snapshot_is_not_affected_by_later_commits() {
        let store = StateStore::default();
        store.commit("gmail", account_state(10, 1));
        let before = store.snapshot();

        store.commit("gmail", account_state(11, 2));
        store.commit("work", account_state(5, 0));

        assert_eq!(1, before.len());
        let inbox = assert_some!(assert_some!(before.get("gmail")).inbox());
        assert_eq!(10, inbox.total());
        assert_eq!(2, store.snapshot().len());
    }

    #[rstest]
    fn test_snapshot_lists_accounts_by_name() {
        let store = StateStore::default();
        store.commit("work", account_state(5, 0));
        store.commit("gmail", account_state(10, 1));

        let accounts: Vec<_> = store.snapshot().keys().cloned().collect();
        assert_eq!(vec!["gmail".to_string(), "work".to_string()], accounts);
    }

    #[rstest]
    fn test_clones_share_the_same_state() {
        let store = StateStore::default();
        let reader = store.clone();
        store.commit("gmail", account_state(10, 1));

        assert_some!(reader.get("gmail"));
    }
}
