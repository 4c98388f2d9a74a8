use std::path::PathBuf;

use crate::common::{
    Action, Message, MessageDraft, NetworkCommand, NetworkEvent, ProfileUpdate, User,
};

const MISSING_FIELDS: &str = "Please fill in all fields";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

#[derive(Debug, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct ProfileForm {
    pub open: bool,
    pub name: String,
    pub caption: String,
    pub photo_path: String,
}

/// Local UI state. Collections hold the latest snapshot from the worker.
#[derive(Debug, Default)]
pub struct AppState {
    pub user: Option<User>,
    pub auth: AuthForm,
    pub auth_pending: bool,
    pub contacts: Vec<User>,
    pub search_query: String,
    pub search_results: Vec<User>,
    pub active_contact: Option<User>,
    pub messages: Vec<Message>,
    pub draft_text: String,
    pub draft_image_path: String,
    pub profile: ProfileForm,
    pub error: Option<String>,
    /// Set when `error` came from a failed worker action.
    error_action: Option<Action>,
    /// Text and image path of the last composed message, until the send resolves.
    sending: Option<(String, String)>,
}

impl AppState {
    /// Start from the session restored at startup, if any.
    pub fn new(user: Option<User>) -> Self {
        Self {
            user,
            ..Self::default()
        }
    }

    pub fn signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn submit_auth(&mut self) -> Result<NetworkCommand, &'static str> {
        let username = self.auth.username.trim().to_string();
        let password = self.auth.password.clone();
        let name = self.auth.name.trim().to_string();

        let missing = username.is_empty()
            || password.is_empty()
            || (self.auth.mode == AuthMode::Signup && name.is_empty());
        if missing {
            self.set_error(MISSING_FIELDS);
            return Err(MISSING_FIELDS);
        }

        self.clear_error();
        self.auth_pending = true;
        Ok(match self.auth.mode {
            AuthMode::Login => NetworkCommand::Login { username, password },
            AuthMode::Signup => NetworkCommand::Signup {
                name,
                username,
                password,
            },
        })
    }

    pub fn toggle_auth_mode(&mut self) {
        self.auth.mode = match self.auth.mode {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        };
        self.clear_error();
    }

    pub fn select_contact(&mut self, contact: User) -> NetworkCommand {
        let contact_id = contact.id.clone();
        if self.active_contact.as_ref().map(|c| &c.id) != Some(&contact_id) {
            self.messages.clear();
        }
        self.active_contact = Some(contact);
        self.profile.open = false;
        NetworkCommand::SelectContact(contact_id)
    }

    /// Call after `search_query` was edited; results of the old query are dropped.
    pub fn search_command(&mut self) -> NetworkCommand {
        self.search_results.clear();
        NetworkCommand::SearchContacts(self.search_query.clone())
    }

    /// Search results while a query is typed, otherwise the chat list.
    pub fn visible_contacts(&self) -> &[User] {
        if self.search_query.trim().is_empty() {
            &self.contacts
        } else {
            &self.search_results
        }
    }

    pub fn compose(&mut self) -> Option<NetworkCommand> {
        let contact_id = self.active_contact.as_ref()?.id.clone();
        let image_path = self.draft_image_path.trim();
        let draft = MessageDraft {
            text: self.draft_text.trim().to_string(),
            image: (!image_path.is_empty()).then(|| PathBuf::from(image_path)),
        };
        if !draft.has_content() {
            return None;
        }

        self.sending = Some((
            std::mem::take(&mut self.draft_text),
            std::mem::take(&mut self.draft_image_path),
        ));
        Some(NetworkCommand::SendMessage { contact_id, draft })
    }

    pub fn open_profile(&mut self) {
        if let Some(user) = &self.user {
            self.profile = ProfileForm {
                open: true,
                name: user.name.clone(),
                caption: user.caption.clone().unwrap_or_default(),
                photo_path: String::new(),
            };
        }
    }

    pub fn submit_profile(&mut self) -> Result<NetworkCommand, &'static str> {
        let name = self.profile.name.trim().to_string();
        if name.is_empty() {
            self.set_error("Name is required");
            return Err("Name is required");
        }

        let photo = self.profile.photo_path.trim();
        Ok(NetworkCommand::UpdateProfile(ProfileUpdate {
            name,
            caption: self.profile.caption.trim().to_string(),
            photo: (!photo.is_empty()).then(|| PathBuf::from(photo)),
        }))
    }

    /// The command never reached the worker; undo what submitting it changed.
    pub fn command_dropped(&mut self, command: &NetworkCommand) {
        match command {
            NetworkCommand::Login { .. } | NetworkCommand::Signup { .. } => {
                self.auth_pending = false;
            }
            NetworkCommand::SendMessage { .. } => self.restore_draft(),
            _ => {}
        }
    }

    pub fn is_own(&self, message: &Message) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.id == message.sender_id)
    }

    pub fn apply(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::SignedIn(session) => {
                self.auth_pending = false;
                self.auth = AuthForm::default();
                self.clear_error();
                self.user = Some(session.user);
            }
            NetworkEvent::LoggedOut => {
                *self = Self::default();
            }
            NetworkEvent::ContactsLoaded(contacts) => {
                self.contacts = contacts;
                self.recovered(Action::LoadContacts);
            }
            NetworkEvent::SearchResults { query, users } => {
                if query == self.search_query.trim() {
                    self.search_results = users;
                    self.recovered(Action::SearchContacts);
                }
            }
            NetworkEvent::ThreadLoaded {
                contact_id,
                messages,
            } => {
                if self.is_active(&contact_id) {
                    self.messages = messages;
                    self.recovered(Action::LoadMessages);
                }
            }
            NetworkEvent::MessageSent {
                contact_id,
                message,
            } => {
                self.sending = None;
                self.recovered(Action::SendMessage);
                if self.is_active(&contact_id) && !self.messages.iter().any(|m| m.id == message.id)
                {
                    self.messages.push(message);
                }
            }
            NetworkEvent::ProfileUpdated(user) => {
                self.user = Some(user);
                self.profile.open = false;
                self.clear_error();
            }
            NetworkEvent::Failed(action) => {
                self.auth_pending = false;
                if action == Action::SendMessage {
                    self.restore_draft();
                }
                self.set_error(action.failure_message());
                self.error_action = Some(action);
            }
        }
    }

    fn set_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.error_action = None;
    }

    fn clear_error(&mut self) {
        self.error = None;
        self.error_action = None;
    }

    /// A later success of the same action makes its error stale.
    fn recovered(&mut self, action: Action) {
        if self.error_action == Some(action) {
            self.clear_error();
        }
    }

    /// Put an unsent message back, unless the user already typed a new one.
    fn restore_draft(&mut self) {
        let Some((text, image_path)) = self.sending.take() else {
            return;
        };
        if self.draft_text.trim().is_empty() && self.draft_image_path.trim().is_empty() {
            self.draft_text = text;
            self.draft_image_path = image_path;
        }
    }

    fn is_active(&self, contact_id: &str) -> bool {
        self.active_contact
            .as_ref()
            .is_some_and(|contact| contact.id == contact_id)
    }
}
