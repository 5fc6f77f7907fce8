//! Test cluster lifecycle
//!
//! Provisioning itself lives in the infrastructure repository's deploy
//! tooling (CDK). This module only assembles the deploy/destroy invocations
//! from the bundle manifest and test config, runs them, and reads the
//! cluster endpoint back out of the outputs file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::TestConfig;
use crate::error::{BenchstackError, BenchstackResult};
use crate::manifest::BundleManifest;

/// Deploy tooling directory inside the infra checkout
pub const DEPLOY_DIR: &str = "tools/cdk/single-node";

/// Outputs file written by `cdk deploy`
pub const OUTPUT_FILE: &str = "output.json";

/// Stack name used when none is given on the command line
pub const DEFAULT_STACK_NAME: &str = "perf-test";

const SECURED_PORT: u16 = 443;
const UNSECURED_PORT: u16 = 9200;

/// A provisioned test cluster
pub struct PerfTestCluster {
    stack_name: String,
    endpoint: String,
    port: u16,
    args: ClusterArgs,
    deploy_dir: PathBuf,
}

/// Context parameters shared by the deploy and destroy invocations
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterArgs {
    context: Vec<(String, String)>,
    role: String,
}

impl ClusterArgs {
    /// Derive deploy context from the manifest, config, and CLI choices
    pub fn new(
        manifest: &BundleManifest,
        config: &TestConfig,
        stack_name: &str,
        security: bool,
    ) -> Self {
        let constants = &config.constants;
        let context = vec![
            ("url".to_string(), manifest.build.location.clone()),
            (
                "security_group_id".to_string(),
                constants.security_group_id.clone(),
            ),
            ("vpc_id".to_string(), constants.vpc_id.clone()),
            ("account_id".to_string(), constants.account_id.clone()),
            ("region".to_string(), constants.region.clone()),
            ("stack_name".to_string(), stack_name.to_string()),
            (
                "security".to_string(),
                if security { "enable" } else { "disable" }.to_string(),
            ),
            ("platform".to_string(), manifest.build.platform.clone()),
            (
                "architecture".to_string(),
                manifest.build.architecture.clone(),
            ),
        ];
        Self {
            context,
            role: constants.role.clone(),
        }
    }

    /// Arguments for `cdk deploy`
    pub fn deploy_args(&self) -> Vec<String> {
        let mut args = vec!["deploy".to_string(), "--require-approval=never".to_string()];
        args.extend(self.common_args());
        args.push("--outputs-file".to_string());
        args.push(OUTPUT_FILE.to_string());
        args
    }

    /// Arguments for `cdk destroy`
    pub fn destroy_args(&self) -> Vec<String> {
        let mut args = vec!["destroy".to_string(), "--force".to_string()];
        args.extend(self.common_args());
        args
    }

    fn common_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (key, value) in &self.context {
            args.push("-c".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push("--plugin".to_string());
        args.push("cdk-assume-role-credential-plugin".to_string());
        args.push("-c".to_string());
        args.push(format!(
            "assume-role-credentials:writeIamRoleName={}",
            self.role
        ));
        args.push("-c".to_string());
        args.push(format!(
            "assume-role-credentials:readIamRoleName={}",
            self.role
        ));
        args
    }
}

impl PerfTestCluster {
    /// Provision the cluster and resolve its endpoint
    pub fn create(
        manifest: &BundleManifest,
        config: &TestConfig,
        stack_name: &str,
        security: bool,
        infra_dir: &Path,
    ) -> BenchstackResult<Self> {
        let args = ClusterArgs::new(manifest, config, stack_name, security);
        let deploy_dir = infra_dir.join(DEPLOY_DIR);

        run_cdk(&args.deploy_args(), &deploy_dir)?;

        // The stack is live from here on: if the outputs file cannot be
        // read the cluster must still come down before the error
        // propagates.
        let endpoint = match read_endpoint(&deploy_dir, stack_name) {
            Ok(endpoint) => endpoint,
            Err(err) => {
                let _ = run_cdk(&args.destroy_args(), &deploy_dir);
                return Err(err);
            }
        };

        Ok(Self {
            stack_name: stack_name.to_string(),
            endpoint,
            port: if security { SECURED_PORT } else { UNSECURED_PORT },
            args,
            deploy_dir,
        })
    }

    /// Cluster endpoint extracted from the deploy outputs
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Port the benchmark tool should connect to
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stack the cluster was deployed as
    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    /// Destroy the cluster stack. Called on every exit path of a run.
    pub fn teardown(&self) -> BenchstackResult<()> {
        run_cdk(&self.args.destroy_args(), &self.deploy_dir)
    }
}

fn read_endpoint(deploy_dir: &Path, stack_name: &str) -> BenchstackResult<String> {
    let outputs_path = deploy_dir.join(OUTPUT_FILE);
    let outputs = fs::read_to_string(&outputs_path)?;
    parse_endpoint(&outputs, stack_name, &outputs_path)
}

/// Extract the endpoint for `stack_name` from a `cdk deploy` outputs document
pub fn parse_endpoint(
    outputs: &str,
    stack_name: &str,
    file: &Path,
) -> BenchstackResult<String> {
    let document: serde_json::Value = serde_json::from_str(outputs)?;
    let stack = document
        .get(stack_name)
        .ok_or_else(|| BenchstackError::MissingStackOutput {
            stack: stack_name.to_string(),
            file: file.to_path_buf(),
        })?;
    stack
        .get("PrivateIp")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| BenchstackError::MissingEndpoint {
            stack: stack_name.to_string(),
        })
}

fn run_cdk(args: &[String], dir: &Path) -> BenchstackResult<()> {
    let status = Command::new("cdk")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| BenchstackError::CommandSpawn {
            command: format!("cdk {}", args.first().map(String::as_str).unwrap_or("")),
            source: e,
        })?;

    if !status.success() {
        return Err(BenchstackError::CommandFailed {
            command: format!("cdk {}", args.join(" ")),
            code: status.code(),
        });
    }
    Ok(())
}
