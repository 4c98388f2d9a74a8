#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const TOKEN: &str = "tok-1";
pub const PASSWORD: &str = "secret";

/// A multipart part as the mock backend received it.
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ReceivedPart {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[derive(Default)]
pub struct MockState {
    pub fail_chats: AtomicBool,
    pub chats_hits: AtomicUsize,
    pub thread_hits: Mutex<Vec<String>>,
    pub searches: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<Vec<ReceivedPart>>>,
}

impl MockState {
    pub fn chats_hits(&self) -> usize {
        self.chats_hits.load(Ordering::SeqCst)
    }

    pub fn last_upload(&self) -> Vec<ReceivedPart> {
        self.uploads.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

pub struct MockApi {
    pub base_url: String,
    pub state: Arc<MockState>,
}

/// Serves a fake chat backend under `/api` on an ephemeral port.
pub async fn spawn_mock_api() -> MockApi {
    let state = Arc::new(MockState::default());

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/users/chats", get(chats))
        .route("/users/contacts", get(search))
        .route("/users/profile", put(update_profile))
        .route("/messages/{contact_id}", get(thread).post(send_message))
        .with_state(Arc::clone(&state));
    let app = Router::new().nest("/api", api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockApi {
        base_url: format!("http://{addr}/api"),
        state,
    }
}

pub fn user_json(id: &str, name: &str) -> Value {
    json!({ "_id": id, "name": name, "username": id.to_lowercase() })
}

fn message_json(id: &str, from: &str, to: &str, text: &str, image: Option<&str>) -> Value {
    json!({
        "_id": id,
        "senderId": from,
        "receiverId": to,
        "text": text,
        "image": image,
        "createdAt": "2024-05-01T10:00:00Z",
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid token" })),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        let username = body["username"].as_str().unwrap_or_default();
        Json(json!({ "token": TOKEN, "user": user_json("me", username) })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn signup(Json(body): Json<Value>) -> Response {
    let name = body["name"].as_str().unwrap_or_default();
    Json(json!({ "token": TOKEN, "user": user_json("me", name) })).into_response()
}

async fn chats(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.chats_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.fail_chats.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database down").into_response();
    }

    let mut bob = user_json("bob", "Bob");
    bob["unreadCount"] = json!(2);
    Json(json!([bob, user_json("carol", "Carol")])).into_response()
}

async fn search(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let query = params.get("search").cloned().unwrap_or_default();
    state.searches.lock().unwrap().push(query.clone());

    // Makes a stale first keystroke arrive after the second one.
    if query == "slow" {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    let users: Vec<Value> = [("dave", "Dave"), ("dora", "Dora"), ("slowpoke", "Slowpoke")]
        .iter()
        .filter(|(id, _)| id.contains(&query.to_lowercase()))
        .map(|(id, name)| user_json(id, name))
        .collect();
    Json(users).into_response()
}

async fn thread(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(contact_id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.thread_hits.lock().unwrap().push(contact_id.clone());

    if contact_id == "slow" {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    Json(json!([message_json(
        &format!("{contact_id}-1"),
        &contact_id,
        "me",
        "hello",
        None
    )]))
    .into_response()
}

async fn read_parts(mut multipart: Multipart) -> Vec<ReceivedPart> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.unwrap().to_vec();
        parts.push(ReceivedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    parts
}

async fn send_message(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(contact_id): Path<String>,
    multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let parts = read_parts(multipart).await;
    let text = parts
        .iter()
        .find(|part| part.name == "text")
        .map(ReceivedPart::text)
        .unwrap_or_default();
    let image = parts
        .iter()
        .find(|part| part.name == "image")
        .and_then(|part| part.file_name.clone())
        .map(|file| format!("/uploads/{file}"));
    state.uploads.lock().unwrap().push(parts);

    Json(message_json(
        "sent-1",
        "me",
        &contact_id,
        &text,
        image.as_deref(),
    ))
    .into_response()
}

async fn update_profile(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let parts = read_parts(multipart).await;
    let field = |name: &str| {
        parts
            .iter()
            .find(|part| part.name == name)
            .map(ReceivedPart::text)
            .unwrap_or_default()
    };

    let mut user = user_json("me", &field("name"));
    user["caption"] = json!(field("caption"));
    if let Some(photo) = parts.iter().find(|part| part.name == "photo") {
        user["avatar"] = json!(format!(
            "/uploads/{}",
            photo.file_name.clone().unwrap_or_default()
        ));
    }
    state.uploads.lock().unwrap().push(parts);

    Json(user).into_response()
}
