pub mod database;
pub mod models;
pub mod session_db;

pub use session_db::SessionStore;

use std::fs;
use std::path::Path;

/// Ensure the directory holding the database file exists.
pub fn ensure_parent_dir(path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
