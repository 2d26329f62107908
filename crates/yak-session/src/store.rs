//! Whole-record conversation persistence backed by one JSON file.

use crate::error::SessionError;
use crate::types::Session;
use std::path::{Path, PathBuf};

/// File-backed history store. One session per file, replaced wholesale on
/// every save.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store for the given history file, ensuring its parent
    /// directory exists.
    pub async fn new(path: PathBuf) -> Result<Self, SessionError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the session to disk (atomic write: .tmp → rename, overwrite
    /// semantics). On failure the in-memory session is untouched; the caller
    /// decides how to report it.
    pub async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    /// Load the persisted session, falling back to a fresh one.
    ///
    /// A missing record is the normal "no history yet" condition; a record
    /// that exists but cannot be parsed is logged and treated the same way.
    /// Neither is an error to the caller.
    pub async fn load(&self) -> Session {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no history file, starting fresh");
                return Session::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read history, starting fresh");
                return Session::new();
            }
        };
        match serde_json::from_str::<Session>(&data) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt history record, starting fresh");
                Session::new()
            }
        }
    }
}
