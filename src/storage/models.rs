/// Raw `session` row; the user stays serialized until it is loaded.
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub token: String,
    pub user_json: String,
    pub saved_at: i64,
}
