pub mod commands;
pub mod error;
pub mod events;
pub mod types;

pub use commands::NetworkCommand;
pub use error::{Action, ApiError};
pub use events::NetworkEvent;
pub use types::{Credentials, Message, MessageDraft, ProfileUpdate, Session, SignupRequest, User};
