//! Bundle manifest parsing
//!
//! A bundle manifest is an externally produced YAML descriptor of a build
//! artifact. Only the `build` section matters here; component listings and
//! other keys are ignored.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchstackError, BenchstackResult};

/// Parsed bundle manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Schema version of the manifest format
    #[serde(rename = "schema-version", default)]
    pub schema_version: Option<String>,

    /// Build artifact metadata
    pub build: Build,
}

/// The `build` section of a bundle manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    /// Product name (e.g. the distribution being tested)
    pub name: String,

    /// Release version string
    pub version: String,

    /// Target platform (e.g. `linux`)
    pub platform: String,

    /// Target architecture (e.g. `x64`, `arm64`)
    pub architecture: String,

    /// Unique build identifier
    pub id: String,

    /// URL of the distributable artifact
    pub location: String,
}

impl BundleManifest {
    /// Load a bundle manifest from a YAML file
    pub fn from_file(path: &Path) -> BenchstackResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| BenchstackError::InvalidManifest {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse a bundle manifest from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
schema-version: "1.0"
build:
  name: SearchBundle
  version: 1.1.0
  platform: linux
  architecture: x64
  id: "20210930"
  location: https://artifacts.example.com/builds/1.1.0/dist.tar.gz
components:
  - name: core
    repository: https://example.com/core.git
    ref: main
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = BundleManifest::from_yaml(MANIFEST).unwrap();
        assert_eq!(manifest.schema_version.as_deref(), Some("1.0"));
        assert_eq!(manifest.build.name, "SearchBundle");
        assert_eq!(manifest.build.id, "20210930");
        assert_eq!(manifest.build.architecture, "x64");
        assert_eq!(manifest.build.platform, "linux");
        assert_eq!(
            manifest.build.location,
            "https://artifacts.example.com/builds/1.1.0/dist.tar.gz"
        );
    }

    #[test]
    fn test_missing_build_section_is_error() {
        let result = BundleManifest::from_yaml("schema-version: \"1.0\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_build_field_is_error() {
        let yaml = r#"
build:
  name: SearchBundle
  version: 1.1.0
"#;
        assert!(BundleManifest::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_from_file_missing_path() {
        let err = BundleManifest::from_file(Path::new("/nonexistent/manifest.yml"));
        assert!(err.is_err());
    }

    #[test]
    fn test_from_file_malformed_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.yml");
        std::fs::write(&path, "build: [not, a, mapping]").unwrap();

        let err = BundleManifest::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("manifest.yml"));
    }
}
