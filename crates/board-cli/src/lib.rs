//! # board-cli — Dashboard Document Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate` — decode a dashboard document and report the first fault
//! - `normalize` — decode then re-encode to canonical form
//! - `diff` — report which top-level fields differ between two documents
//! - `import` / `export` / `list` — move dashboards in and out of a
//!   directory-backed store
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handlers; handlers write to a
//!   caller-supplied writer and return the process exit code.
//! - Handlers delegate to `board-codec`, `board-model` and `board-store`.
//!   No document logic lives here.

pub mod document;
pub mod store;

use std::path::Path;

use anyhow::{Context, Result};
use board_model::Dashboard;

/// Outcome of parsing a dashboard file.
pub enum Loaded {
    Dashboard(Box<Dashboard>),
    /// The file is not JSON at all.
    Malformed(serde_json::Error),
    /// The file is JSON but not a dashboard.
    Invalid(board_codec::DecodeError),
}

/// Read and decode a dashboard file.
///
/// I/O failures are errors. Parse and decode failures are reported as
/// [`Loaded`] variants so callers can render them as findings.
pub fn load_dashboard(path: &Path) -> Result<Loaded> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw: serde_json::Value = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(err) => return Ok(Loaded::Malformed(err)),
    };
    Ok(match board_codec::decode::<Dashboard>(&raw) {
        Ok(dashboard) => Loaded::Dashboard(Box::new(dashboard)),
        Err(err) => Loaded::Invalid(err),
    })
}

/// Read and decode a dashboard file, treating every failure as an error.
pub fn require_dashboard(path: &Path) -> Result<Dashboard> {
    match load_dashboard(path)? {
        Loaded::Dashboard(dashboard) => Ok(*dashboard),
        Loaded::Malformed(err) => {
            Err(err).with_context(|| format!("{} is not valid JSON", path.display()))
        }
        Loaded::Invalid(err) => {
            Err(err).with_context(|| format!("{} is not a valid dashboard", path.display()))
        }
    }
}
