//! `<artifact>.provenance.json` sidecars: code revision, callsite, run
//! parameters and outputs, so every result file can be traced back to the
//! exact invocation that produced it.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What a run records next to its artifact.
pub struct Payload {
    pub params: Value,
    /// Input graph file, if the run read one.
    pub input: Option<PathBuf>,
    /// Additional files produced by the same run (e.g. a search trace).
    pub extra_outputs: Vec<PathBuf>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            input: None,
            extra_outputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: &Path) -> Self {
        self.input = Some(input.to_path_buf());
        self
    }

    pub fn with_output(mut self, output: &Path) -> Self {
        self.extra_outputs.push(output.to_path_buf());
        self
    }
}

/// Provenance document without any output files.
#[track_caller]
pub fn document(payload: &Payload, outputs: &[&Path]) -> Value {
    let callsite = Location::caller();
    let outputs: Vec<String> = outputs
        .iter()
        .copied()
        .chain(payload.extra_outputs.iter().map(PathBuf::as_path))
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    json!({
        "code_rev": code_rev(),
        "mps_version": mps::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "input": payload.input.as_ref().map(|p| p.to_string_lossy().into_owned()),
        "params": payload.params,
        "outputs": outputs
    })
}

/// Write the sidecar for `artifact`; returns its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    crate::io::ensure_parent(&path)?;
    let doc = document(&payload, &[artifact]);
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit hash from the build env, the runtime env, or `git rev-parse`.
pub fn code_rev() -> String {
    let from_build = option_env!("GIT_COMMIT").map(str::to_string);
    let from_env = std::env::var("GIT_COMMIT").ok();
    from_build
        .into_iter()
        .chain(from_env)
        .find(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_head() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok().map(|s| s.trim().to_string())
}
