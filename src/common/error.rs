use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single backend call. Only logged; the UI sees [`Action`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("failed to read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("not signed in")]
    Unauthenticated,
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

/// User-visible operation. Every failure collapses to its fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Signup,
    LoadContacts,
    SearchContacts,
    LoadMessages,
    SendMessage,
    UpdateProfile,
}

impl Action {
    pub fn failure_message(self) -> &'static str {
        match self {
            Action::Login | Action::Signup => "Authentication failed",
            Action::LoadContacts => "Unable to load contacts",
            Action::SearchContacts => "Unable to search contacts",
            Action::LoadMessages => "Unable to load messages",
            Action::SendMessage => "Unable to send message",
            Action::UpdateProfile => "Unable to update profile",
        }
    }
}
