//! Git operations for the infrastructure repository
//!
//! Shells out to the `git` binary rather than linking a git library; the
//! clone is a one-shot CI step and the system git honors the runner's
//! credential and proxy setup.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{BenchstackError, BenchstackResult};

/// Anonymous clone URL of the infrastructure repository
pub const INFRA_REPO_URL: &str = "https://github.com/benchstack/cluster-infra.git";

/// Branch of the infrastructure repository checked out for perf runs
pub const INFRA_REPO_BRANCH: &str = "main";

/// Environment variable holding an access token for authenticated clones
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Clone URL for the infrastructure repository, authenticated when a token
/// is available
pub fn infra_repo_url(token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => {
            INFRA_REPO_URL.replacen("https://", &format!("https://{token}@"), 1)
        }
        _ => INFRA_REPO_URL.to_string(),
    }
}

/// A cloned git repository on disk
#[derive(Debug)]
pub struct GitRepository {
    url: String,
    branch: String,
    dir: PathBuf,
}

impl GitRepository {
    /// Clone `url` at `branch` into `dir`
    pub fn clone(url: &str, branch: &str, dir: &Path) -> BenchstackResult<Self> {
        let mut cmd = Command::new("git");
        cmd.arg("clone")
            .arg("--depth=1")
            .arg("--branch")
            .arg(branch)
            .arg(url)
            .arg(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let status = cmd.status().map_err(|e| BenchstackError::CommandSpawn {
            command: "git clone".to_string(),
            source: e,
        })?;

        if !status.success() {
            return Err(BenchstackError::CommandFailed {
                command: format!("git clone {} {}", scrub_url(url), dir.display()),
                code: status.code(),
            });
        }

        Ok(Self {
            url: url.to_string(),
            branch: branch.to_string(),
            dir: dir.to_path_buf(),
        })
    }

    /// Checkout directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Branch that was checked out
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Clone URL with any embedded credential removed
    pub fn display_url(&self) -> String {
        scrub_url(&self.url)
    }
}

/// Strip an embedded `token@` credential from a clone URL so it never
/// reaches logs or error messages.
pub fn scrub_url(url: &str) -> String {
    match (url.find("://"), url.find('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}{}", &url[..scheme_end + 3], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}
