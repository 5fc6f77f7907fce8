//! Benchstack CLI - CI performance-test runner
//!
//! Usage: benchstack --bundle-manifest <FILE> --config <FILE> [options]
//!
//! Loads a bundle manifest and test config, provisions a test cluster via
//! the external infrastructure repository, runs the benchmark tool against
//! it, and tears everything down.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use benchstack::cluster::{self, PerfTestCluster};
use benchstack::git::{self, GitRepository};
use benchstack::retry::{retry_call, suite_retry_policy};
use benchstack::suite::{PerfTestSuite, WorkloadArgs};
use benchstack::workspace::{TempWorkspace, WorkingDirectory};
use benchstack::{BundleManifest, TestConfig};

/// Benchstack - provision a test cluster from a bundle and benchmark it
#[derive(Parser, Debug)]
#[command(name = "benchstack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bundle manifest file
    #[arg(long, value_name = "FILE")]
    bundle_manifest: PathBuf,

    /// Test config file
    #[arg(long, value_name = "FILE")]
    config: PathBuf,

    /// Stack name for the test cluster
    #[arg(long, default_value = cluster::DEFAULT_STACK_NAME)]
    stack: String,

    /// Provision the cluster with security enabled
    #[arg(long)]
    security: bool,

    /// Do not delete the temporary workspace
    #[arg(long)]
    keep: bool,

    /// Workload name from the benchmark tool's catalog
    #[arg(long, default_value = "nyc_taxis")]
    workload: String,

    /// JSON object with extra benchmark tool arguments
    #[arg(long, default_value = "{}")]
    workload_options: String,

    /// Times to run the workload before collecting data
    #[arg(long, default_value_t = 0)]
    warmup_iters: u32,

    /// Times to run the workload
    #[arg(long, default_value_t = 1)]
    test_iters: u32,

    /// Machine-readable event output for CI
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

fn emit(json: bool, event: serde_json::Value, human: &str) {
    if json {
        println!("{event}");
    } else {
        println!("{human}");
    }
}

fn event(name: &str) -> serde_json::Value {
    serde_json::json!({
        "event": name,
        "time": chrono::Utc::now().to_rfc3339(),
    })
}

fn run(cli: Cli) -> Result<()> {
    // Both inputs must parse before anything side-effecting happens.
    let manifest = BundleManifest::from_file(&cli.bundle_manifest)
        .with_context(|| format!("loading {}", cli.bundle_manifest.display()))?;
    let config = TestConfig::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if !cli.json {
        println!("📦 Benchstack Perf Test");
        println!("Bundle: {} {}", manifest.build.name, manifest.build.version);
        println!(
            "Build: {} ({}/{})",
            manifest.build.id, manifest.build.platform, manifest.build.architecture
        );
        println!("Stack: {}", cli.stack);
        if cli.security {
            println!("Mode: security enabled");
        }
    }

    let tests_dir = std::env::current_dir()?
        .join("test-results")
        .join("perf-test");
    fs::create_dir_all(&tests_dir)
        .with_context(|| format!("creating {}", tests_dir.display()))?;

    let workspace = TempWorkspace::new(cli.keep)?;
    let _workspace_cwd = WorkingDirectory::change(workspace.path())?;

    let infra_dir = workspace.path().join("infra");
    let token = std::env::var(git::TOKEN_ENV_VAR).ok();
    let repo = GitRepository::clone(
        &git::infra_repo_url(token.as_deref()),
        git::INFRA_REPO_BRANCH,
        &infra_dir,
    )?;
    emit(
        cli.json,
        {
            let mut e = event("infra_cloned");
            e["url"] = repo.display_url().into();
            e["branch"] = repo.branch().into();
            e
        },
        &format!("✓ Cloned {} ({})", repo.display_url(), repo.branch()),
    );

    let _infra_cwd = WorkingDirectory::change(&infra_dir)?;

    let cluster = PerfTestCluster::create(&manifest, &config, &cli.stack, cli.security, &infra_dir)?;
    emit(
        cli.json,
        {
            let mut e = event("cluster_ready");
            e["endpoint"] = cluster.endpoint().into();
            e["port"] = cluster.port().into();
            e["stack"] = cluster.stack_name().into();
            e
        },
        &format!(
            "✓ Cluster ready at {}:{}",
            cluster.endpoint(),
            cluster.port()
        ),
    );

    let workload = WorkloadArgs {
        workload: cli.workload.clone(),
        workload_options: cli.workload_options.clone(),
        warmup_iters: cli.warmup_iters,
        test_iters: cli.test_iters,
    };
    let suite = PerfTestSuite::new(
        &manifest,
        cluster.endpoint(),
        cli.security,
        &infra_dir,
        &tests_dir,
        &workload,
    );

    if !cli.json {
        println!("🏃 Running: {}", suite.command());
    }
    let suite_result = retry_call(suite_retry_policy(), || suite.execute());

    // The cluster comes down whether the suite passed or not.
    let teardown_result = cluster.teardown();

    match &suite_result {
        Ok(()) => emit(
            cli.json,
            {
                let mut e = event("suite_finished");
                e["status"] = "success".into();
                e["results"] = tests_dir.display().to_string().into();
                e
            },
            &format!("✅ Suite passed, results in {}", tests_dir.display()),
        ),
        Err(err) => emit(
            cli.json,
            {
                let mut e = event("suite_finished");
                e["status"] = "failure".into();
                e["error"] = err.to_string().into();
                e
            },
            &format!("❌ Suite failed: {err}"),
        ),
    }

    if workspace.is_kept() {
        emit(
            cli.json,
            {
                let mut e = event("workspace_kept");
                e["path"] = workspace.path().display().to_string().into();
                e
            },
            &format!("📁 Workspace kept at {}", workspace.path().display()),
        );
    }

    suite_result.context("benchmark suite execution failed")?;
    teardown_result.context("cluster teardown failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_minimal() {
        let cli = Cli::try_parse_from([
            "benchstack",
            "--bundle-manifest",
            "manifest.yml",
            "--config",
            "config.yml",
        ])
        .unwrap();
        assert_eq!(cli.bundle_manifest, PathBuf::from("manifest.yml"));
        assert_eq!(cli.config, PathBuf::from("config.yml"));
        assert_eq!(cli.stack, cluster::DEFAULT_STACK_NAME);
        assert!(!cli.security);
        assert!(!cli.keep);
        assert_eq!(cli.workload, "nyc_taxis");
        assert_eq!(cli.workload_options, "{}");
        assert_eq!(cli.warmup_iters, 0);
        assert_eq!(cli.test_iters, 1);
    }

    #[test]
    fn test_cli_requires_bundle_manifest() {
        let result = Cli::try_parse_from(["benchstack", "--config", "config.yml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_config() {
        let result = Cli::try_parse_from(["benchstack", "--bundle-manifest", "manifest.yml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_full() {
        let cli = Cli::try_parse_from([
            "benchstack",
            "--bundle-manifest",
            "manifest.yml",
            "--config",
            "config.yml",
            "--stack",
            "nightly-perf",
            "--security",
            "--keep",
            "--workload",
            "http_logs",
            "--workload-options",
            r#"{"bulk_size": 500}"#,
            "--warmup-iters",
            "2",
            "--test-iters",
            "5",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.stack, "nightly-perf");
        assert!(cli.security);
        assert!(cli.keep);
        assert_eq!(cli.workload, "http_logs");
        assert_eq!(cli.workload_options, r#"{"bulk_size": 500}"#);
        assert_eq!(cli.warmup_iters, 2);
        assert_eq!(cli.test_iters, 5);
        assert!(cli.json);
    }
}
