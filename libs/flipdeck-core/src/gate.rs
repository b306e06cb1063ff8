//! Static password gate in front of the deck editor.

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Proof that the gate was passed. Required to build a [`crate::DeckEditor`].
#[derive(Debug)]
pub struct EditorKey {
    _private: (),
}

/// Compares a password attempt against a configured SHA-256 digest.
///
/// A gate without a digest is open and hands out keys to anyone.
#[derive(Debug, Clone, Default)]
pub struct PasswordGate {
    digest: Option<String>,
}

impl PasswordGate {
    pub fn open() -> Self {
        Self { digest: None }
    }

    /// Gate for a hex-encoded SHA-256 digest.
    pub fn from_digest(digest: impl Into<String>) -> Self {
        Self {
            digest: Some(digest.into().trim().to_ascii_lowercase()),
        }
    }

    pub fn from_password(password: &str) -> Self {
        Self::from_digest(password_digest(password))
    }

    pub fn is_open(&self) -> bool {
        self.digest.is_none()
    }

    pub fn unlock(&self, attempt: Option<&str>) -> Result<EditorKey> {
        match (&self.digest, attempt) {
            (None, _) => Ok(EditorKey { _private: () }),
            (Some(expected), Some(attempt)) if *expected == password_digest(attempt) => {
                tracing::debug!("deck editor unlocked");
                Ok(EditorKey { _private: () })
            }
            _ => {
                tracing::warn!("rejected deck editor password");
                Err(Error::Locked)
            }
        }
    }
}

/// Hex SHA-256 of a password, as stored in configuration.
pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
