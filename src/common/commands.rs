use super::types::{MessageDraft, ProfileUpdate};

/// Commands the UI sends down to the network worker.
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    Login {
        username: String,
        password: String,
    },
    Signup {
        name: String,
        username: String,
        password: String,
    },
    Logout,
    /// Fetch the contact list now instead of waiting for the next tick.
    RefreshContacts,
    /// A blank query clears the results without a request.
    SearchContacts(String),
    /// Make this contact's thread the one being polled.
    SelectContact(String),
    SendMessage {
        contact_id: String,
        draft: MessageDraft,
    },
    UpdateProfile(ProfileUpdate),
}
