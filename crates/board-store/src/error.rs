//! # Store Errors
//!
//! Every failure names the key it happened on. A key that is absent, or
//! whose content is not JSON at all, is not an error: loads report it as
//! "no prior state".

use board_codec::{CodecError, DecodeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend failed to read or write.
    #[error("store io error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored JSON did not match the requested type's schema.
    #[error("stored document '{key}' is invalid: {source}")]
    Decode {
        key: String,
        #[source]
        source: DecodeError,
    },

    /// The document could not be rendered to text.
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: CodecError,
    },

    /// Keys are restricted to `[A-Za-z0-9_-]+`.
    #[error("invalid store key '{0}': keys are non-empty and use only letters, digits, '-' and '_'")]
    InvalidKey(String),
}

impl StoreError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_owned(),
            source,
        }
    }
}
