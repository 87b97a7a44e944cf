// SPDX-License-Identifier: GPL-2.0-only

//! Local repository handle.
//!
//! A [`Repository`] is the pair of working tree root and git directory that
//! every spawned `git` process runs against. It also owns the couple of
//! filesystem look-asides the command layer needs: repository-relative path
//! computation, the rebase `original-commit` metadata file, and the locations
//! of the exclude files consulted by ignore handling.

use std::path::{Path, PathBuf};

use crate::{
    config::GitConfig,
    error::{GitError, Result},
};

#[derive(Clone, Debug)]
pub struct Repository {
    work_dir: PathBuf,
    git_dir: PathBuf,
}

impl Repository {
    /// Create a handle for the repository whose working tree root is `work_dir`.
    ///
    /// The repository need not exist on disk yet; init/clone style commands
    /// create it.
    pub fn new(work_dir: impl Into<PathBuf>) -> Repository {
        let work_dir = work_dir.into();
        let git_dir = work_dir.join(".git");
        Repository { work_dir, git_dir }
    }

    /// Create a handle with an explicit git directory (e.g. a worktree).
    pub fn with_git_dir(work_dir: impl Into<PathBuf>, git_dir: impl Into<PathBuf>) -> Repository {
        Repository {
            work_dir: work_dir.into(),
            git_dir: git_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Compute a repository-relative path in the slash-separated form git
    /// prints and accepts.
    ///
    /// The working tree root itself maps to the empty string. Paths outside
    /// the root are a validation error; commands raise it before any process
    /// is spawned.
    pub fn relativize(&self, path: &Path) -> Result<String> {
        let stripped = path.strip_prefix(&self.work_dir).map_err(|_| {
            GitError::OutsideRepository(path.to_path_buf(), self.work_dir.clone())
        })?;
        let mut relative = String::new();
        for component in stripped.components() {
            if !relative.is_empty() {
                relative.push('/');
            }
            relative.push_str(&component.as_os_str().to_string_lossy());
        }
        Ok(relative)
    }

    /// Resolve a repository-relative path git printed back to an absolute one.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let mut path = self.work_dir.clone();
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    /// Load the repository-local config file (`.git/config`).
    pub fn config(&self) -> Result<GitConfig> {
        GitConfig::open(self.git_dir.join("config"))
    }

    /// The commit an interrupted rebase stopped on, read from the sequencer
    /// metadata git leaves in the git directory.
    ///
    /// Returns `None` when no rebase is in progress or the metadata is absent.
    pub(crate) fn rebase_original_commit(&self) -> Option<String> {
        for state_dir in ["rebase-merge", "rebase-apply"] {
            let path = self.git_dir.join(state_dir).join("original-commit");
            if let Ok(content) = std::fs::read_to_string(&path) {
                let id = content.trim();
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
        }
        None
    }

    /// Repository-level exclude file (`.git/info/exclude`).
    pub(crate) fn repository_exclude_file(&self) -> PathBuf {
        self.git_dir.join("info").join("exclude")
    }

    /// Global exclude file from `core.excludesfile`, if configured.
    pub(crate) fn global_exclude_file(&self) -> Option<PathBuf> {
        let config = self.config().ok()?;
        let value = config.get_string("core", None, "excludesfile")?;
        let expanded = if let Some(rest) = value.strip_prefix("~/") {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(rest))?
        } else {
            PathBuf::from(value)
        };
        Some(expanded)
    }
}
