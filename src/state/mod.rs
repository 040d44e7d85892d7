mod account_state;
mod mailbox_state;
mod store;

pub use account_state::AccountState;
pub use mailbox_state::{CountError, MailboxState};
pub use store::{Snapshot, StateStore};
