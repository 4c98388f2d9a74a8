use std::error::Error;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use crate::common::{
    Action, ApiError, Credentials, Message, NetworkCommand, NetworkEvent, Session, SignupRequest,
    User,
};
use crate::storage::SessionStore;

use super::api::ApiClient;

/// How often each collection is re-fetched.
#[derive(Debug, Clone, Copy)]
pub struct PollIntervals {
    pub contacts: Duration,
    pub thread: Duration,
}

/// Result of a spawned request, tagged with the epoch it was issued under.
#[derive(Debug)]
struct Outcome {
    epoch: u64,
    kind: OutcomeKind,
}

#[derive(Debug)]
enum OutcomeKind {
    Auth(Action, Result<Session, ApiError>),
    Contacts(Result<Vec<User>, ApiError>),
    Search(String, Result<Vec<User>, ApiError>),
    Thread(String, Result<Vec<Message>, ApiError>),
    Sent(String, Result<Message, ApiError>),
    Profile(Result<User, ApiError>),
}

/// Owns the API client and the session store; everything the UI asks for
/// goes through here.
pub struct ChatClient {
    api: ApiClient,
    store: SessionStore,
    intervals: PollIntervals,
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
    outcome_sender: mpsc::Sender<Outcome>,
    outcome_receiver: mpsc::Receiver<Outcome>,
    epoch: u64,
    active_contact: Option<String>,
    latest_query: String,
}

impl ChatClient {
    pub fn new(
        api: ApiClient,
        store: SessionStore,
        intervals: PollIntervals,
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
    ) -> Self {
        let (outcome_sender, outcome_receiver) = mpsc::channel(64);
        Self {
            api,
            store,
            intervals,
            event_sender,
            command_receiver,
            outcome_sender,
            outcome_receiver,
            epoch: 0,
            active_contact: None,
            latest_query: String::new(),
        }
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut contacts_tick = time::interval(self.intervals.contacts);
        contacts_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut thread_tick = time::interval(self.intervals.thread);
        thread_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!("Network worker started against {}", self.api.base_url());

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    if let Some(command) = command {
                        self.handle_command(command).await;
                    } else {
                        break;
                    }
                }
                Some(outcome) = self.outcome_receiver.recv() => {
                    self.handle_outcome(outcome).await;
                }
                _ = contacts_tick.tick() => {
                    if self.api.is_authenticated() {
                        log::debug!("Polling contacts");
                        self.fetch_contacts();
                    }
                }
                _ = thread_tick.tick() => {
                    if let Some(contact_id) = self.active_contact.clone() {
                        log::debug!("Polling thread with {contact_id}");
                        self.fetch_thread(contact_id);
                    }
                }
            }
        }

        log::info!("Command channel closed; network worker stopping");
        Ok(())
    }

    async fn handle_command(&mut self, command: NetworkCommand) {
        match command {
            NetworkCommand::Login { username, password } => {
                let credentials = Credentials { username, password };
                self.spawn(move |api| async move {
                    OutcomeKind::Auth(Action::Login, api.login(&credentials).await)
                });
            }
            NetworkCommand::Signup {
                name,
                username,
                password,
            } => {
                let request = SignupRequest {
                    name,
                    username,
                    password,
                };
                self.spawn(move |api| async move {
                    OutcomeKind::Auth(Action::Signup, api.signup(&request).await)
                });
            }
            NetworkCommand::Logout => self.logout().await,
            NetworkCommand::RefreshContacts => self.fetch_contacts(),
            NetworkCommand::SearchContacts(query) => {
                let query = query.trim().to_string();
                self.latest_query = query.clone();
                if query.is_empty() {
                    self.emit(NetworkEvent::SearchResults {
                        query,
                        users: Vec::new(),
                    })
                    .await;
                } else {
                    self.spawn(move |api| async move {
                        let result = api.search_contacts(&query).await;
                        OutcomeKind::Search(query, result)
                    });
                }
            }
            NetworkCommand::SelectContact(contact_id) => {
                self.active_contact = Some(contact_id.clone());
                self.fetch_thread(contact_id);
            }
            NetworkCommand::SendMessage { contact_id, draft } => {
                if !draft.has_content() {
                    log::warn!("Refusing to send an empty message to {contact_id}");
                    self.emit(NetworkEvent::Failed(Action::SendMessage)).await;
                    return;
                }
                self.spawn(move |api| async move {
                    let result = api.send_message(&contact_id, &draft).await;
                    OutcomeKind::Sent(contact_id, result)
                });
            }
            NetworkCommand::UpdateProfile(update) => {
                self.spawn(move |api| async move {
                    OutcomeKind::Profile(api.update_profile(&update).await)
                });
            }
        }
    }

    async fn handle_outcome(&mut self, outcome: Outcome) {
        if outcome.epoch != self.epoch {
            log::debug!(
                "Dropping response from session epoch {} (now {})",
                outcome.epoch,
                self.epoch
            );
            return;
        }

        match outcome.kind {
            OutcomeKind::Auth(_, Ok(session)) => self.sign_in(session).await,
            OutcomeKind::Auth(action, Err(err)) => self.fail(action, &err).await,
            OutcomeKind::Contacts(Ok(users)) => {
                self.emit(NetworkEvent::ContactsLoaded(users)).await;
            }
            OutcomeKind::Contacts(Err(err)) => self.fail(Action::LoadContacts, &err).await,
            OutcomeKind::Search(query, result) => {
                if query != self.latest_query {
                    log::debug!("Dropping results for outdated search `{query}`");
                    return;
                }
                match result {
                    Ok(users) => self.emit(NetworkEvent::SearchResults { query, users }).await,
                    Err(err) => self.fail(Action::SearchContacts, &err).await,
                }
            }
            OutcomeKind::Thread(contact_id, result) => {
                if self.active_contact.as_deref() != Some(contact_id.as_str()) {
                    log::debug!("Dropping thread for inactive contact {contact_id}");
                    return;
                }
                match result {
                    Ok(messages) => {
                        self.emit(NetworkEvent::ThreadLoaded {
                            contact_id,
                            messages,
                        })
                        .await;
                    }
                    Err(err) => self.fail(Action::LoadMessages, &err).await,
                }
            }
            OutcomeKind::Sent(contact_id, Ok(message)) => {
                self.emit(NetworkEvent::MessageSent {
                    contact_id,
                    message,
                })
                .await;
                self.fetch_contacts();
            }
            OutcomeKind::Sent(_, Err(err)) => self.fail(Action::SendMessage, &err).await,
            OutcomeKind::Profile(Ok(user)) => {
                if let Err(err) = self.store.update_user(&user) {
                    log::error!("Failed to persist updated profile: {err}");
                }
                self.emit(NetworkEvent::ProfileUpdated(user)).await;
            }
            OutcomeKind::Profile(Err(err)) => self.fail(Action::UpdateProfile, &err).await,
        }
    }

    async fn sign_in(&mut self, session: Session) {
        log::info!("Signed in as {}", session.user.username);
        self.epoch += 1;
        self.active_contact = None;
        self.latest_query.clear();
        self.api.set_token(Some(session.token.clone()));

        if let Err(err) = self.store.save(&session) {
            log::error!("Failed to persist session: {err}");
        }

        self.emit(NetworkEvent::SignedIn(session)).await;
        self.fetch_contacts();
    }

    async fn logout(&mut self) {
        log::info!("Signing out");
        self.epoch += 1;
        self.active_contact = None;
        self.latest_query.clear();
        self.api.set_token(None);

        if let Err(err) = self.store.clear() {
            log::error!("Failed to clear stored session: {err}");
        }

        self.emit(NetworkEvent::LoggedOut).await;
    }

    fn fetch_contacts(&self) {
        self.spawn(|api| async move { OutcomeKind::Contacts(api.chats().await) });
    }

    fn fetch_thread(&self, contact_id: String) {
        self.spawn(move |api| async move {
            let result = api.messages(&contact_id).await;
            OutcomeKind::Thread(contact_id, result)
        });
    }

    /// Runs one request on its own task so a slow call never stalls the loop.
    fn spawn<F, Fut>(&self, request: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = OutcomeKind> + Send + 'static,
    {
        let api = self.api.clone();
        let epoch = self.epoch;
        let outcome_sender = self.outcome_sender.clone();
        tokio::spawn(async move {
            let kind = request(api).await;
            let _ = outcome_sender.send(Outcome { epoch, kind }).await;
        });
    }

    // Takes `&mut self` so the worker future only needs `ChatClient: Send`;
    // the session store's connection is not `Sync`.
    async fn fail(&mut self, action: Action, err: &ApiError) {
        log::warn!("{}: {err}", action.failure_message());
        self.emit(NetworkEvent::Failed(action)).await;
    }

    async fn emit(&mut self, event: NetworkEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI: {err}");
        }
    }
}
