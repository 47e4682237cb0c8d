//! # Document Store
//!
//! Saves schema-declared values as JSON text and loads them back.
//!
//! ## Load Semantics
//!
//! | Stored content | `load` result |
//! |----------------|---------------|
//! | key absent | `Ok(None)` |
//! | not valid JSON | `Ok(None)`, logged at `warn` |
//! | JSON failing the schema | `Err(StoreError::Decode)` |
//! | valid document | `Ok(Some(value))` |
//!
//! Unreadable content is checked before decode runs and means "no prior
//! state"; only a well-formed document of the wrong shape is an error.

use board_codec::Schematic;

use crate::backend::{is_valid_key, ContentStore};
use crate::error::StoreError;

/// Typed documents over a [`ContentStore`] backend.
#[derive(Debug, Clone)]
pub struct DocumentStore<S> {
    backend: S,
}

impl<S: ContentStore> DocumentStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Encode `value` and store it under `key`.
    pub fn save<T: Schematic>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        check_key(key)?;
        let text = board_codec::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        self.backend
            .put(key, &text)
            .map_err(|err| StoreError::io(key, err))?;
        tracing::debug!(key, schema = T::schema().name(), bytes = text.len(), "saved document");
        Ok(())
    }

    /// Load and decode the document under `key`.
    pub fn load<T: Schematic>(&self, key: &str) -> Result<Option<T>, StoreError> {
        check_key(key)?;
        let Some(text) = self.backend.get(key).map_err(|err| StoreError::io(key, err))? else {
            tracing::debug!(key, "no stored document");
            return Ok(None);
        };
        let raw: serde_json::Value = match serde_json::from_str(&text) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key, error = %err, "stored content is not JSON, treating as no prior state");
                return Ok(None);
            }
        };
        board_codec::decode(&raw)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: key.to_owned(),
                source,
            })
    }

    /// Delete the document under `key`. Returns whether it existed.
    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        check_key(key)?;
        self.backend
            .remove(key)
            .map_err(|err| StoreError::io(key, err))
    }

    /// Every stored key, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.backend.keys().map_err(|err| StoreError::io("*", err))
    }
}

fn check_key(key: &str) -> Result<(), StoreError> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}
