use chrono::Utc;
use rusqlite::{OptionalExtension, Result as SqlResult, params};
use std::path::Path;

use super::database::Database;
use super::models::StoredSession;
use crate::common::{Session, User};

/// Persisted bearer token and signed-in user (single row).
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        let store = Self {
            db: Database::open(path)?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> SqlResult<Self> {
        let store = Self {
            db: Database::in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> SqlResult<()> {
        self.db.connection().execute(
            "CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                token TEXT NOT NULL,
                user_json TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Replace the stored session.
    pub fn save(&self, session: &Session) -> SqlResult<()> {
        let user_json = serialize_user(&session.user)?;
        self.db.connection().execute(
            "INSERT OR REPLACE INTO session (id, token, user_json, saved_at)
             VALUES (1, ?1, ?2, ?3)",
            params![session.token, user_json, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Rewrite the stored user, keeping the token. No-op when signed out.
    pub fn update_user(&self, user: &User) -> SqlResult<()> {
        let user_json = serialize_user(user)?;
        self.db.connection().execute(
            "UPDATE session SET user_json = ?1, saved_at = ?2 WHERE id = 1",
            params![user_json, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    pub fn load(&self) -> SqlResult<Option<Session>> {
        let Some(stored) = self.load_raw()? else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&stored.user_json) {
            Ok(user) => Ok(Some(Session {
                token: stored.token,
                user,
            })),
            Err(err) => {
                log::warn!(
                    "Ignoring stored session saved at {}: user record unreadable ({err})",
                    stored.saved_at
                );
                Ok(None)
            }
        }
    }

    fn load_raw(&self) -> SqlResult<Option<StoredSession>> {
        self.db
            .connection()
            .query_row(
                "SELECT token, user_json, saved_at FROM session WHERE id = 1",
                [],
                |row| {
                    Ok(StoredSession {
                        token: row.get(0)?,
                        user_json: row.get(1)?,
                        saved_at: row.get(2)?,
                    })
                },
            )
            .optional()
    }

    pub fn clear(&self) -> SqlResult<()> {
        self.db
            .connection()
            .execute("DELETE FROM session WHERE id = 1", [])?;
        Ok(())
    }
}

fn serialize_user(user: &User) -> SqlResult<String> {
    serde_json::to_string(user)
        .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))
}
