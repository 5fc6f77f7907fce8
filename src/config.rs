//! Test configuration loading
//!
//! The config file is a YAML blob handed through to the cluster provisioner.
//! Only the `Constants` section is read here; everything else is retained
//! opaquely so the deploy tooling sees the full document.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchstackError, BenchstackResult};

/// Test configuration for a performance run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    /// Deploy constants consumed by the infra repository's tooling
    #[serde(rename = "Constants")]
    pub constants: Constants,

    /// Remaining configuration, passed through untouched
    #[serde(flatten)]
    pub extra: serde_yaml_ng::Mapping,
}

/// The `Constants` section of the test configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    /// IAM role assumed by the deploy tooling
    #[serde(rename = "Role")]
    pub role: String,

    /// Account the cluster is provisioned in
    #[serde(rename = "AccountId")]
    pub account_id: String,

    /// Deployment region
    #[serde(rename = "Region")]
    pub region: String,

    /// VPC the cluster nodes join
    #[serde(rename = "VpcId")]
    pub vpc_id: String,

    /// Security group applied to cluster nodes
    #[serde(rename = "SecurityGroupId")]
    pub security_group_id: String,
}

impl TestConfig {
    /// Load a test configuration from a YAML file
    pub fn from_file(path: &Path) -> BenchstackResult<Self> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content).map_err(|e| BenchstackError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
Constants:
  Role: perf-test-deploy
  AccountId: "123456789012"
  Region: us-west-2
  VpcId: vpc-0a1b2c3d
  SecurityGroupId: sg-9f8e7d6c
DataNodes: 2
"#;

    #[test]
    fn test_parse_config() {
        let config: TestConfig = serde_yaml_ng::from_str(CONFIG).unwrap();
        assert_eq!(config.constants.role, "perf-test-deploy");
        assert_eq!(config.constants.region, "us-west-2");
        assert_eq!(config.constants.vpc_id, "vpc-0a1b2c3d");
    }

    #[test]
    fn test_extra_keys_are_retained() {
        let config: TestConfig = serde_yaml_ng::from_str(CONFIG).unwrap();
        assert_eq!(
            config.extra.get("DataNodes"),
            Some(&serde_yaml_ng::Value::Number(2.into()))
        );
    }

    #[test]
    fn test_missing_constants_is_error() {
        let result: Result<TestConfig, _> = serde_yaml_ng::from_str("DataNodes: 2\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_malformed_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "Constants: [broken").unwrap();

        let err = TestConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.yml"));
    }
}
