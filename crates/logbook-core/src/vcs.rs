//! Version-control integration
//!
//! The store tells version control about files it writes (`stage`) and files
//! it removes (`unstage`). Both calls are advisory: the store logs failures
//! and carries on.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use crate::error::{LogbookError, Result};

/// Stage/unstage notifications for written and removed files
pub trait VcsHook: std::fmt::Debug {
    /// A file was written
    fn stage(&self, path: &Path) -> Result<()>;

    /// A file was removed or moved away
    fn unstage(&self, path: &Path) -> Result<()>;
}

impl<T: VcsHook + ?Sized> VcsHook for Arc<T> {
    fn stage(&self, path: &Path) -> Result<()> {
        (**self).stage(path)
    }

    fn unstage(&self, path: &Path) -> Result<()> {
        (**self).unstage(path)
    }
}

/// Hook that does nothing, used when auto-staging is off
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl VcsHook for NoopHook {
    fn stage(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn unstage(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Hook that shells out to `git` inside a repository
#[derive(Debug, Clone)]
pub struct GitHook {
    repo_root: PathBuf,
}

impl GitHook {
    /// Create a hook for the repository at `repo_root`
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        GitHook {
            repo_root: repo_root.into(),
        }
    }

    /// Find the repository enclosing `path`, if any
    pub fn discover(path: &Path) -> Option<Self> {
        path.ancestors()
            .find(|dir| dir.join(".git").exists())
            .map(Self::new)
    }

    fn run(&self, args: &[&str], path: &Path) -> Result<()> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_root)
            .args(args)
            .arg("--")
            .arg(path)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LogbookError::FailedOperation {
                operation: format!("git {} {}", args.join(" "), path.display()),
                reason: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

impl VcsHook for GitHook {
    fn stage(&self, path: &Path) -> Result<()> {
        self.run(&["add"], path)
    }

    fn unstage(&self, path: &Path) -> Result<()> {
        self.run(&["rm", "--cached", "--ignore-unmatch", "--quiet"], path)
    }
}
