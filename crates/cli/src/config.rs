use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vertexgen::geometry::{Profile, SurfaceLabel};
use vertexgen::polycone::PolyconeDetector;

/// On-disk detector description: a revolution profile plus one label per segment.
///
/// ```json
/// {"name": "B00000A", "profile": {"r": [0, 10, 40, 40, 0, 0], "z": [0, 0, 0, 30, 30, 0]},
///  "surfaces": ["pplus", "passive", "nplus", "nplus", null]}
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Defaults to the file stem.
    #[serde(default)]
    pub name: Option<String>,
    pub profile: Profile,
    pub surfaces: Vec<Option<SurfaceLabel>>,
}

impl DetectorConfig {
    pub fn into_detector(self, fallback_name: &str) -> Result<PolyconeDetector> {
        let name = self.name.unwrap_or_else(|| fallback_name.to_string());
        Ok(PolyconeDetector::new(
            name,
            self.profile.r,
            self.profile.z,
            self.surfaces,
        )?)
    }
}

pub fn load_detector<P: AsRef<Path>>(path: P) -> Result<PolyconeDetector> {
    let path = path.as_ref();
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: DetectorConfig = serde_json::from_slice(&raw)
        .with_context(|| format!("parsing detector config {}", path.display()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "detector".to_string());
    cfg.into_detector(&stem)
        .with_context(|| format!("building detector from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use vertexgen::geometry::SurfaceGeometry;

    const BEGE: &str = r#"{
        "profile": {"r": [0, 10, 15, 40, 40, 0, 0], "z": [0, 0, 0, 0, 30, 30, 0]},
        "surfaces": ["pplus", "passive", "nplus", "nplus", "nplus", null]
    }"#;

    #[test]
    fn load_uses_file_stem_when_unnamed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("B00000A.json");
        fs::write(&path, BEGE).unwrap();
        let det = load_detector(&path).unwrap();
        assert_eq!(det.name(), "B00000A");
        assert_eq!(det.surfaces().len(), 6);
        assert_eq!(det.surfaces()[1], Some(SurfaceLabel::Passive));
    }

    #[test]
    fn load_reports_bad_configs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{"name": "x", "profile": {"r": [0, 1], "z": [0, 0]}, "surfaces": []}"#,
        )
        .unwrap();
        let err = load_detector(&path).unwrap_err();
        assert!(format!("{err:#}").contains("surface labels"));

        fs::write(&path, r#"{"profile": {"r": [0, 1], "z": [0, 0]}, "surfaces": ["bulk"]}"#)
            .unwrap();
        assert!(load_detector(&path).is_err());
        assert!(load_detector(dir.path().join("missing.json")).is_err());
    }
}
