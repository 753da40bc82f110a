use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Sidecar describing how a vertex file was produced.
#[derive(Debug, Serialize)]
pub struct RunRecord {
    pub code_rev: String,
    pub vertexgen_version: &'static str,
    /// Command parameters (detectors, surface, counts, seed, buffer, format).
    pub params: Value,
    pub outputs: Vec<String>,
}

impl RunRecord {
    pub fn new(params: Value, output: &Path) -> Self {
        Self {
            code_rev: code_rev(),
            vertexgen_version: vertexgen::VERSION,
            params,
            outputs: vec![output.to_string_lossy().into_owned()],
        }
    }
}

/// Write `<stem>.provenance.json` next to `artifact`.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, record: &RunRecord) -> Result<PathBuf> {
    let path = provenance_path(artifact.as_ref());
    fs::write(&path, serde_json::to_vec_pretty(record)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance written");
    Ok(path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("vertices"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Revision the binary reports: a non-empty `GIT_COMMIT` (baked in at build
/// time or set at run time), else the checkout's `HEAD`, else `"unknown"`.
fn code_rev() -> String {
    let pinned = option_env!("GIT_COMMIT")
        .map(str::to_owned)
        .into_iter()
        .chain(std::env::var("GIT_COMMIT").ok())
        .find(|rev| !rev.trim().is_empty());
    pinned
        .or_else(head_rev)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn head_rev() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_owned()).filter(|rev| !rev.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_the_vertices() {
        assert_eq!(
            provenance_path(Path::new("/data/run1/vertices.parquet")),
            Path::new("/data/run1/vertices.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_params_and_outputs() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("v.csv");
        let record = RunRecord::new(json!({"n_vertex": 10, "surface": "nplus"}), &artifact);
        let path = write_sidecar(&artifact, &record).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["params"]["surface"], "nplus");
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["vertexgen_version"], vertexgen::VERSION);
        assert!(!parsed["code_rev"].as_str().unwrap().trim().is_empty());
    }
}
