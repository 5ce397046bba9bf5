use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the profile store.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("'{username}' is not a valid username (1-32 characters: letters, digits, '_', '-', '.'; no leading '.')")]
    InvalidUsername { username: String },

    #[error("username '{username}' already exists")]
    DuplicateUsername { username: String },

    #[error("profile for '{username}' is corrupt: {reason}")]
    CorruptProfile { username: String, reason: String },

    #[error("profile storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProfileError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageUnavailable { path: path.into(), source }
    }

    pub(crate) fn corrupt(username: &str, reason: impl ToString) -> Self {
        Self::CorruptProfile {
            username: username.to_string(),
            reason: reason.to_string(),
        }
    }
}
