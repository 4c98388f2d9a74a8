use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::common::{
    ApiError, Credentials, Message, MessageDraft, ProfileUpdate, Session, SignupRequest, User,
};

/// REST wrapper around the chat backend. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` must already be normalized (see `config::normalize_base_url`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = self.http.post(self.url("/auth/login")).json(credentials);
        read_json(request.send().await?).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<Session, ApiError> {
        let request = self.http.post(self.url("/auth/signup")).json(request);
        read_json(request.send().await?).await
    }

    /// Contacts the user has a conversation with, including unread counts.
    pub async fn chats(&self) -> Result<Vec<User>, ApiError> {
        let request = self.authed(self.http.get(self.url("/users/chats")))?;
        read_json(request.send().await?).await
    }

    pub async fn search_contacts(&self, query: &str) -> Result<Vec<User>, ApiError> {
        let request = self
            .authed(self.http.get(self.url("/users/contacts")))?
            .query(&[("search", query)]);
        read_json(request.send().await?).await
    }

    pub async fn messages(&self, contact_id: &str) -> Result<Vec<Message>, ApiError> {
        let request = self.authed(self.http.get(self.url(&format!("/messages/{contact_id}"))))?;
        read_json(request.send().await?).await
    }

    pub async fn send_message(
        &self,
        contact_id: &str,
        draft: &MessageDraft,
    ) -> Result<Message, ApiError> {
        if !draft.has_content() {
            return Err(ApiError::InvalidInput("message needs text or an image"));
        }

        let mut form = Form::new().text("text", draft.text.trim().to_string());
        if let Some(path) = &draft.image {
            form = form.part("image", file_part(path).await?);
        }

        let request = self
            .authed(self.http.post(self.url(&format!("/messages/{contact_id}"))))?
            .multipart(form);
        read_json(request.send().await?).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        if update.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("name is required"));
        }

        let mut form = Form::new()
            .text("name", update.name.trim().to_string())
            .text("caption", update.caption.trim().to_string());
        if let Some(path) = &update.photo {
            form = form.part("photo", file_part(path).await?);
        }

        let request = self
            .authed(self.http.put(self.url("/users/profile")))?
            .multipart(form);
        read_json(request.send().await?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match &self.token {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Err(ApiError::Unauthenticated),
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status,
        message: error_message(&body),
    })
}

/// Prefer the backend's `{"message": ...}` over the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|message| message.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ApiError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_for(path))?)
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
