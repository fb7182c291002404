//! The active conversation: message log, chat identity, and the
//! send / reload paths that keep them consistent with the backend.

mod busy;
mod conversation;
mod guard;

pub use conversation::{ConversationSession, Reply, Selection, NO_RESPONSE_TEXT};
pub use guard::SessionGuard;
