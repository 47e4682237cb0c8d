//! # Document Subcommands
//!
//! `validate`, `normalize` and `diff` over dashboard files on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::{load_dashboard, require_dashboard, Loaded};

/// Arguments for `board validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Dashboard document to check.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Emit a machine-readable JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `board normalize`.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Dashboard document to rewrite.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Indent the output.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for `board diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[arg(value_name = "A")]
    pub a: PathBuf,

    #[arg(value_name = "B")]
    pub b: PathBuf,
}

/// Result of validating one file, as printed by `--json`.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub file: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Query sources with no matching data source.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dangling_sources: Vec<String>,
}

impl ValidationReport {
    fn check(file: &Path) -> Result<Self> {
        let mut report = Self {
            file: file.display().to_string(),
            ok: false,
            path: None,
            reason: None,
            dangling_sources: Vec::new(),
        };
        match load_dashboard(file)? {
            Loaded::Dashboard(dashboard) => {
                report.ok = true;
                report.dangling_sources = dashboard
                    .dangling_sources()
                    .into_iter()
                    .map(str::to_owned)
                    .collect();
            }
            Loaded::Malformed(err) => {
                report.reason = Some(format!("not valid JSON: {err}"));
            }
            Loaded::Invalid(err) => {
                report.path = Some(err.path.to_string());
                report.reason = Some(err.reason.to_string());
            }
        }
        Ok(report)
    }
}

/// Execute `board validate`. Exit code 1 when the document is invalid.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let report = ValidationReport::check(&args.file)?;
    tracing::debug!(file = %report.file, ok = report.ok, "validated document");

    if args.json {
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    } else if report.ok {
        writeln!(out, "OK: {}", report.file)?;
        for source in &report.dangling_sources {
            writeln!(out, "WARN: query source '{source}' has no matching data source")?;
        }
    } else {
        match (&report.path, &report.reason) {
            (Some(path), Some(reason)) => writeln!(out, "FAIL: {path}: {reason}")?,
            (None, Some(reason)) => writeln!(out, "FAIL: {}: {reason}", report.file)?,
            _ => writeln!(out, "FAIL: {}", report.file)?,
        }
    }

    Ok(if report.ok { 0 } else { 1 })
}

/// Execute `board normalize`: decode then encode to canonical form.
pub fn run_normalize(args: &NormalizeArgs, out: &mut dyn Write) -> Result<u8> {
    let dashboard = require_dashboard(&args.file)?;
    let text = if args.pretty {
        board_codec::to_string_pretty(&dashboard)?
    } else {
        board_codec::to_string(&dashboard)?
    };
    writeln!(out, "{text}")?;
    Ok(0)
}

/// Execute `board diff`. Exit code 1 when the documents differ.
pub fn run_diff(args: &DiffArgs, out: &mut dyn Write) -> Result<u8> {
    let a = require_dashboard(&args.a)?;
    let b = require_dashboard(&args.b)?;
    let changed = board_codec::diff(&a, &b);
    if changed.is_empty() {
        writeln!(out, "equal")?;
        return Ok(0);
    }
    for field in &changed {
        writeln!(out, "{field}")?;
    }
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MINIMAL: &str = r#"{
        "id": "d1",
        "title": "Minimal",
        "time_range": {"type": "relative", "amount": 1, "unit": "hours"},
        "panels": [],
        "variables": {},
        "tags": [],
        "data_sources": []
    }"#;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn output(run: impl FnOnce(&mut dyn Write) -> Result<u8>) -> (u8, String) {
        let mut buf = Vec::new();
        let code = run(&mut buf).unwrap();
        (code, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn validate_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "d.json", MINIMAL);
        let args = ValidateArgs { file, json: false };
        let (code, text) = output(|out| run_validate(&args, out));
        assert_eq!(code, 0);
        assert_eq!(text, format!("OK: {}\n", args.file.display()));
    }

    #[test]
    fn validate_reports_decode_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "d.json", &MINIMAL.replace("\"hours\"", "\"eons\""));
        let args = ValidateArgs { file, json: false };
        let (code, text) = output(|out| run_validate(&args, out));
        assert_eq!(code, 1);
        assert!(text.starts_with("FAIL: $.time_range.unit: unknown value 'eons'"));
    }

    #[test]
    fn validate_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "d.json", "{not json");
        let args = ValidateArgs { file, json: true };
        let (code, text) = output(|out| run_validate(&args, out));
        assert_eq!(code, 1);
        let report: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(report["ok"], false);
        assert!(report["reason"].as_str().unwrap().starts_with("not valid JSON"));
        assert!(report.get("path").is_none());
    }

    #[test]
    fn normalize_drops_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "d.json", &MINIMAL.replace("\"id\"", "\"legacy\": 1, \"id\""));
        let args = NormalizeArgs { file, pretty: false };
        let (code, text) = output(|out| run_normalize(&args, out));
        assert_eq!(code, 0);
        assert!(!text.contains("legacy"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn normalize_fails_on_invalid_documents() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "d.json", "{}");
        let args = NormalizeArgs { file, pretty: true };
        let err = run_normalize(&args, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("missing required field 'id'"));
    }

    #[test]
    fn diff_lists_changed_fields() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", MINIMAL);
        let b = write(
            dir.path(),
            "b.json",
            &MINIMAL.replace("Minimal", "Renamed").replace("\"tags\": []", "\"tags\": [\"x\"]"),
        );
        let (code, text) = output(|out| run_diff(&DiffArgs { a: a.clone(), b }, out));
        assert_eq!(code, 1);
        assert_eq!(text, "title\ntags\n");
        let (code, text) = output(|out| run_diff(&DiffArgs { a: a.clone(), b: a }, out));
        assert_eq!(code, 0);
        assert_eq!(text, "equal\n");
    }
}
