//! Benchstack - CI performance-test runner
//!
//! Benchstack provisions a disposable test cluster from a bundle manifest,
//! runs an external benchmark workload against it, and tears everything
//! down. The provisioning and workload logic live in external tooling (an
//! infrastructure repository and a benchmark CLI); this crate is the
//! orchestration around them.

pub mod cluster;
pub mod config;
pub mod error;
pub mod git;
pub mod manifest;
pub mod retry;
pub mod suite;
pub mod workspace;

// Re-exports for convenience
pub use cluster::{ClusterArgs, PerfTestCluster};
pub use config::TestConfig;
pub use error::{BenchstackError, BenchstackResult};
pub use git::GitRepository;
pub use manifest::BundleManifest;
pub use retry::{retry_call, RetryPolicy};
pub use suite::{PerfTestSuite, WorkloadArgs};
pub use workspace::{TempWorkspace, WorkingDirectory};
