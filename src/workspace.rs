//! Temporary workspace and working-directory discipline
//!
//! Every run happens inside a throwaway workspace directory that is removed
//! afterwards unless the user asked to keep it. Steps that must run from a
//! particular directory use the `WorkingDirectory` guard, which restores the
//! previous directory on drop regardless of how the step exits.

use std::env;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::BenchstackResult;

/// Temporary workspace for a single run
///
/// Wraps a `tempfile::TempDir`. When `keep` is set the directory is persisted
/// on drop instead of being deleted, so artifacts can be inspected after a
/// failed run.
pub struct TempWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
    keep: bool,
}

impl TempWorkspace {
    /// Create a fresh workspace directory
    pub fn new(keep: bool) -> BenchstackResult<Self> {
        let dir = tempfile::Builder::new().prefix("benchstack-").tempdir()?;
        let path = dir.path().to_path_buf();
        Ok(Self {
            dir: Some(dir),
            path,
            keep,
        })
    }

    /// Path of the workspace directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the workspace will survive drop
    pub fn is_kept(&self) -> bool {
        self.keep
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        if self.keep {
            if let Some(dir) = self.dir.take() {
                // Disarm the TempDir so the directory persists.
                let _ = dir.keep();
            }
        }
    }
}

/// RAII guard that changes the process working directory and restores the
/// previous one on drop — on success, error, or panic.
pub struct WorkingDirectory {
    previous: PathBuf,
}

impl WorkingDirectory {
    /// Change into `target`, remembering the current directory
    pub fn change(target: &Path) -> BenchstackResult<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(target)?;
        Ok(Self { previous })
    }

    /// The directory that will be restored on drop
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirectory {
    fn drop(&mut self) {
        // Nothing sensible to do if restoration fails mid-unwind.
        let _ = env::set_current_dir(&self.previous);
    }
}

/// Serializes tests that move the process working directory.
#[cfg(test)]
pub(crate) static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
