//! # Store Subcommands
//!
//! `import`, `export` and `list` against a directory-backed
//! [`DocumentStore`]. The store directory comes from `--store` or the
//! `BOARD_STORE_DIR` environment variable.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use board_model::Dashboard;
use board_store::{DirStore, DocumentStore};
use clap::Args;

use crate::require_dashboard;

/// Arguments for `board import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Dashboard document to import.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Store directory.
    #[arg(long, env = "BOARD_STORE_DIR")]
    pub store: PathBuf,

    /// Key to store under. Defaults to the dashboard id.
    #[arg(long)]
    pub key: Option<String>,
}

/// Arguments for `board export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Key of the stored dashboard.
    pub key: String,

    /// Store directory.
    #[arg(long, env = "BOARD_STORE_DIR")]
    pub store: PathBuf,

    /// Indent the output.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for `board list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Store directory.
    #[arg(long, env = "BOARD_STORE_DIR")]
    pub store: PathBuf,
}

fn open(root: &Path) -> DocumentStore<DirStore> {
    DocumentStore::new(DirStore::new(root))
}

/// Execute `board import`.
pub fn run_import(args: &ImportArgs, out: &mut dyn Write) -> Result<u8> {
    let dashboard = require_dashboard(&args.file)?;
    let key = args.key.as_deref().unwrap_or(&dashboard.id);
    open(&args.store)
        .save(key, &dashboard)
        .with_context(|| format!("failed to import {}", args.file.display()))?;
    tracing::info!(key, store = %args.store.display(), "imported dashboard");
    writeln!(out, "OK: imported '{}' as {key}", dashboard.title)?;
    Ok(0)
}

/// Execute `board export`. Exit code 1 when the key holds no dashboard.
pub fn run_export(args: &ExportArgs, out: &mut dyn Write) -> Result<u8> {
    let loaded: Option<Dashboard> = open(&args.store).load(&args.key)?;
    let Some(dashboard) = loaded else {
        writeln!(out, "NOT FOUND: no prior state for '{}'", args.key)?;
        return Ok(1);
    };
    let text = if args.pretty {
        board_codec::to_string_pretty(&dashboard)?
    } else {
        board_codec::to_string(&dashboard)?
    };
    writeln!(out, "{text}")?;
    Ok(0)
}

/// Execute `board list`: one key per line, sorted.
pub fn run_list(args: &ListArgs, out: &mut dyn Write) -> Result<u8> {
    for key in open(&args.store).keys()? {
        writeln!(out, "{key}")?;
    }
    Ok(0)
}
