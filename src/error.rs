//! Error types for benchstack
//!
//! Uses `thiserror` for library errors; the binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for benchstack operations
pub type BenchstackResult<T> = Result<T, BenchstackError>;

/// Main error type for benchstack operations
#[derive(Error, Debug)]
pub enum BenchstackError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parsing error (deploy outputs file)
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bundle manifest failed to parse
    #[error("invalid bundle manifest {file}: {message}")]
    InvalidManifest { file: PathBuf, message: String },

    /// Test configuration failed to parse
    #[error("invalid test config {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// External command could not be spawned
    #[error("failed to spawn '{command}': {source}")]
    CommandSpawn {
        command: String,
        source: std::io::Error,
    },

    /// External command ran but exited non-zero
    #[error("'{command}' failed with exit code {code:?}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Deploy outputs file did not contain the expected stack entry
    #[error("no outputs found for stack '{stack}' in {file}")]
    MissingStackOutput { stack: String, file: PathBuf },

    /// Deploy outputs entry is missing the cluster endpoint
    #[error("stack '{stack}' outputs have no cluster endpoint")]
    MissingEndpoint { stack: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display_command_failed() {
        let err = BenchstackError::CommandFailed {
            command: "cdk deploy".to_string(),
            code: Some(1),
        };
        assert_eq!(err.to_string(), "'cdk deploy' failed with exit code Some(1)");
    }

    #[test]
    fn test_error_display_missing_stack_output() {
        let err = BenchstackError::MissingStackOutput {
            stack: "perf-test".to_string(),
            file: PathBuf::from("output.json"),
        };
        assert_eq!(
            err.to_string(),
            "no outputs found for stack 'perf-test' in output.json"
        );
    }
}
