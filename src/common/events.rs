use super::error::Action;
use super::types::{Message, Session, User};

/// Events the network worker sends up to the UI.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    SignedIn(Session),
    LoggedOut,
    ContactsLoaded(Vec<User>),
    SearchResults {
        query: String,
        users: Vec<User>,
    },
    ThreadLoaded {
        contact_id: String,
        messages: Vec<Message>,
    },
    MessageSent {
        contact_id: String,
        message: Message,
    },
    ProfileUpdated(User),
    Failed(Action),
}
