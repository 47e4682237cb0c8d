//! # board-store — Persistent Document Store
//!
//! Serializes schema-declared values to text on save and decodes them on
//! load, over a pluggable string-keyed backend.
//!
//! ## Crate Policy
//!
//! - Backends are synchronous. Locks are `parking_lot` and are never held
//!   across I/O.
//! - Missing or unparseable content loads as `None`, never as an error.

pub mod backend;
pub mod document;
pub mod error;

pub use backend::{is_valid_key, ContentStore, DirStore, MemoryStore};
pub use document::DocumentStore;
pub use error::StoreError;
