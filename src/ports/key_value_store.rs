//! Key-Value Store Port - Durable persistence of session state.
//!
//! Values are opaque bytes; the session controller stores the session id as
//! UTF-8 text and the answered log as JSON.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;

/// Key under which the current session id is stored.
pub const SESSION_ID_KEY: &str = "session_id";

/// Key under which the answered log of `session_id` is stored.
pub fn answers_key(session_id: &SessionId) -> String {
    format!("answers.{}", session_id)
}

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Failed to serialize value: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize value for '{key}': {reason}")]
    DeserializationFailed { key: String, reason: String },

    #[error("IO error: {0}")]
    IoError(String),
}

impl StoreError {
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn deserialization(key: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::DeserializationFailed {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Port for durable key-value persistence.
///
/// A missing key is not an error: `get` returns `Ok(None)` and `delete`
/// succeeds.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Removes `key`.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn answers_key_embeds_session_id() {
        let uuid = Uuid::new_v4();
        let key = answers_key(&SessionId::from_uuid(uuid));
        assert_eq!(key, format!("answers.{}", uuid));
    }

    #[test]
    fn deserialization_error_names_key() {
        let err = StoreError::deserialization("answers.x", "expected array");
        assert_eq!(
            err.to_string(),
            "Failed to deserialize value for 'answers.x': expected array"
        );
    }
}
