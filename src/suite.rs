//! Benchmark suite execution
//!
//! Builds the shell command for the external benchmark tool and runs it from
//! the tool's directory inside the infra checkout. The prior working
//! directory is restored whether the subprocess succeeds or fails.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{BenchstackError, BenchstackResult};
use crate::manifest::BundleManifest;
use crate::workspace::WorkingDirectory;

/// Directory of the benchmark tool inside the infra checkout
pub const BENCHMARK_DIR: &str = "benchmark";

/// Entry point of the benchmark tool, relative to its directory
pub const BENCHMARK_BIN: &str = "./run-benchmark";

/// Workload selection passed through to the benchmark tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadArgs {
    /// Workload name from the benchmark tool's catalog
    pub workload: String,
    /// JSON object with extra benchmark tool arguments
    pub workload_options: String,
    /// Runs before data collection starts
    pub warmup_iters: u32,
    /// Runs with data collection
    pub test_iters: u32,
}

impl Default for WorkloadArgs {
    fn default() -> Self {
        Self {
            workload: "nyc_taxis".to_string(),
            workload_options: "{}".to_string(),
            warmup_iters: 0,
            test_iters: 1,
        }
    }
}

/// A single benchmark suite run against a provisioned cluster
pub struct PerfTestSuite {
    command: String,
    work_dir: PathBuf,
}

impl PerfTestSuite {
    /// Assemble the benchmark invocation for `endpoint`
    pub fn new(
        manifest: &BundleManifest,
        endpoint: &str,
        security: bool,
        infra_dir: &Path,
        results_dir: &Path,
        workload: &WorkloadArgs,
    ) -> Self {
        let mut command = format!(
            "{bin} --workload {workload} --workload-options '{options}' \
             --warmup-iters {warmup} --test-iters {test} \
             -i {endpoint} -b {build_id} -a {arch} -p {results}",
            bin = BENCHMARK_BIN,
            workload = workload.workload,
            options = workload.workload_options,
            warmup = workload.warmup_iters,
            test = workload.test_iters,
            endpoint = endpoint,
            build_id = manifest.build.id,
            arch = manifest.build.architecture,
            results = results_dir.display(),
        );
        if security {
            command.push_str(" -s");
        }

        Self {
            command,
            work_dir: infra_dir.join(BENCHMARK_DIR),
        }
    }

    /// The shell command that `execute` will run
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Directory the command runs from
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run the benchmark tool. The working directory is changed to the
    /// tool's directory for the duration of the call and restored
    /// unconditionally afterwards.
    pub fn execute(&self) -> BenchstackResult<()> {
        let _guard = WorkingDirectory::change(&self.work_dir)?;

        let status = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| BenchstackError::CommandSpawn {
                command: self.command.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(BenchstackError::CommandFailed {
                command: self.command.clone(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
