// SPDX-License-Identifier: GPL-2.0-only

//! Public facade: one [`GitClient`] per repository, one method per command.
//!
//! Every method is synchronous and cancelable through the caller's
//! [`ProgressMonitor`]; a tripped token surfaces as
//! [`GitError::Canceled`](crate::GitError::Canceled).

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::{
    cmd::{
        self,
        merge::FastForwardOption,
        pick::CherryPickOperation,
        rebase::RebaseOperation,
        reset::ResetType,
        CommandContext,
    },
    error::Result,
    exec::{Executor, GitRunner},
    model::{
        GitBlameResult, GitBranch, GitCherryPickResult, GitFileInfo, GitMergeResult,
        GitPullResult, GitPushResult, GitRebaseResult, GitRemoteConfig, GitRevertResult,
        GitStatus, GitTag, TransportUpdates,
    },
    progress::{FileListener, ProgressMonitor, StatusListener},
    repository::Repository,
};

/// Handle for running git commands against one repository.
pub struct GitClient {
    repository: Repository,
    executor: Box<dyn Executor>,
}

impl GitClient {
    /// A client for the repository whose working tree root is `work_dir`,
    /// spawning the `git` executable found on `PATH`.
    pub fn new(work_dir: impl Into<PathBuf>) -> GitClient {
        GitClient::with_repository(Repository::new(work_dir))
    }

    pub fn with_repository(repository: Repository) -> GitClient {
        let executor = Box::new(GitRunner::new(repository.clone()));
        GitClient {
            repository,
            executor,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_executor(repository: Repository, executor: Box<dyn Executor>) -> GitClient {
        GitClient {
            repository,
            executor,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    fn ctx<'a>(&'a self, monitor: &'a dyn ProgressMonitor) -> CommandContext<'a> {
        CommandContext {
            repository: &self.repository,
            executor: self.executor.as_ref(),
            monitor,
        }
    }

    /// Stage the given files; returns the repository-relative paths git
    /// reported as added.
    pub fn add(
        &self,
        paths: &[PathBuf],
        monitor: &dyn ProgressMonitor,
        listener: Option<&dyn FileListener>,
    ) -> Result<Vec<String>> {
        cmd::add::add(&self.ctx(monitor), paths, listener)
    }

    /// Remove files from the index, and from the working tree unless
    /// `cached`.
    pub fn remove(
        &self,
        paths: &[PathBuf],
        cached: bool,
        monitor: &dyn ProgressMonitor,
        listener: Option<&dyn FileListener>,
    ) -> Result<Vec<String>> {
        cmd::remove::remove(&self.ctx(monitor), paths, cached, listener)
    }

    /// Move `source` to `target`. With `after` the filesystem move already
    /// happened and only the index is reconciled.
    pub fn rename(
        &self,
        source: &Path,
        target: &Path,
        after: bool,
        monitor: &dyn ProgressMonitor,
        listener: Option<&dyn FileListener>,
    ) -> Result<Vec<String>> {
        cmd::rename::rename(&self.ctx(monitor), source, target, after, listener)
    }

    /// Copy `source` to `target` on disk and stage the copy.
    pub fn copy(
        &self,
        source: &Path,
        target: &Path,
        monitor: &dyn ProgressMonitor,
        listener: Option<&dyn FileListener>,
    ) -> Result<Vec<String>> {
        cmd::rename::copy(&self.ctx(monitor), source, target, listener)
    }

    pub fn reset(
        &self,
        revision: &str,
        reset_type: ResetType,
        monitor: &dyn ProgressMonitor,
    ) -> Result<()> {
        cmd::reset::reset(&self.ctx(monitor), revision, reset_type)
    }

    /// Reset only the given paths in the index to their state at `revision`.
    pub fn reset_paths(
        &self,
        revision: &str,
        paths: &[PathBuf],
        monitor: &dyn ProgressMonitor,
    ) -> Result<()> {
        cmd::reset::reset_paths(&self.ctx(monitor), revision, paths)
    }

    /// Contents of `path` as committed at `revision`.
    pub fn cat(
        &self,
        path: &Path,
        revision: &str,
        monitor: &dyn ProgressMonitor,
    ) -> Result<Vec<u8>> {
        cmd::cat::cat(&self.ctx(monitor), path, revision)
    }

    /// Contents of `path` from the index at the given conflict stage.
    pub fn cat_index(
        &self,
        path: &Path,
        stage: u8,
        monitor: &dyn ProgressMonitor,
    ) -> Result<Vec<u8>> {
        cmd::cat::cat_index(&self.ctx(monitor), path, stage)
    }

    /// Raw diff between two revisions, optionally narrowed to `paths`.
    pub fn compare(
        &self,
        revision_first: &str,
        revision_second: &str,
        paths: &[PathBuf],
        monitor: &dyn ProgressMonitor,
    ) -> Result<Vec<GitFileInfo>> {
        cmd::compare::compare(&self.ctx(monitor), revision_first, revision_second, paths)
    }

    pub fn create_branch(
        &self,
        name: &str,
        revision: &str,
        monitor: &dyn ProgressMonitor,
    ) -> Result<GitBranch> {
        cmd::branch::create_branch(&self.ctx(monitor), name, revision)
    }

    pub fn delete_branch(
        &self,
        name: &str,
        force: bool,
        monitor: &dyn ProgressMonitor,
    ) -> Result<()> {
        cmd::branch::delete_branch(&self.ctx(monitor), name, force)
    }

    /// All branches, including remote ones when `all`.
    pub fn branches(
        &self,
        all: bool,
        monitor: &dyn ProgressMonitor,
    ) -> Result<IndexMap<String, GitBranch>> {
        cmd::branch::list_branches(&self.ctx(monitor), all)
    }

    pub fn set_upstream(
        &self,
        branch: &str,
        upstream: &str,
        monitor: &dyn ProgressMonitor,
    ) -> Result<GitBranch> {
        cmd::branch::set_upstream(&self.ctx(monitor), branch, upstream)
    }

    pub fn create_tag(
        &self,
        name: &str,
        revision: &str,
        message: Option<&str>,
        signed: bool,
        force: bool,
        monitor: &dyn ProgressMonitor,
    ) -> Result<GitTag> {
        cmd::tag::create_tag(&self.ctx(monitor), name, revision, message, signed, force)
    }

    pub fn delete_tag(&self, name: &str, monitor: &dyn ProgressMonitor) -> Result<()> {
        cmd::tag::delete_tag(&self.ctx(monitor), name)
    }

    pub fn tags(&self, monitor: &dyn ProgressMonitor) -> Result<IndexMap<String, GitTag>> {
        cmd::tag::list_tags(&self.ctx(monitor))
    }

    pub fn merge(
        &self,
        revision: &str,
        ff_option: FastForwardOption,
        monitor: &dyn ProgressMonitor,
    ) -> Result<GitMergeResult> {
        cmd::merge::merge(&self.ctx(monitor), revision, ff_option)
    }

    /// Start a rebase onto `upstream`, or drive an interrupted one with a
    /// sequencer operation (in which case `upstream` is ignored).
    pub fn rebase(
        &self,
        upstream: Option<&str>,
        operation: RebaseOperation,
        monitor: &dyn ProgressMonitor,
    ) -> Result<GitRebaseResult> {
        cmd::rebase::rebase(&self.ctx(monitor), upstream, operation)
    }

    pub fn cherry_pick(
        &self,
        revisions: &[String],
        operation: CherryPickOperation,
        monitor: &dyn ProgressMonitor,
    ) -> Result<GitCherryPickResult> {
        cmd::pick::cherry_pick(&self.ctx(monitor), revisions, operation)
    }

    /// Revert `revision`, committing the inverse change when `commit`.
    pub fn revert(
        &self,
        revision: &str,
        commit: bool,
        monitor: &dyn ProgressMonitor,
    ) -> Result<GitRevertResult> {
        cmd::revert::revert(&self.ctx(monitor), revision, commit)
    }

    pub fn push(
        &self,
        remote: &str,
        refspecs: &[String],
        monitor: &dyn ProgressMonitor,
    ) -> Result<GitPushResult> {
        cmd::push::push(&self.ctx(monitor), remote, refspecs)
    }

    pub fn fetch(
        &self,
        remote: &str,
        refspecs: &[String],
        monitor: &dyn ProgressMonitor,
    ) -> Result<TransportUpdates> {
        cmd::fetch::fetch(&self.ctx(monitor), remote, refspecs)
    }

    pub fn pull(
        &self,
        remote: &str,
        refspecs: &[String],
        ff_option: FastForwardOption,
        monitor: &dyn ProgressMonitor,
    ) -> Result<GitPullResult> {
        cmd::pull::pull(&self.ctx(monitor), remote, refspecs, ff_option)
    }

    /// Per-file status against HEAD, or against `revision` when given.
    pub fn status(
        &self,
        revision: Option<&str>,
        paths: &[PathBuf],
        monitor: &dyn ProgressMonitor,
        listener: Option<&dyn StatusListener>,
    ) -> Result<IndexMap<String, GitStatus>> {
        cmd::status::status(&self.ctx(monitor), revision, paths, listener)
    }

    /// Line annotation for `path`, `None` when the file cannot be annotated
    /// cleanly (unmerged, untracked at `revision`).
    pub fn blame(
        &self,
        path: &Path,
        revision: Option<&str>,
        monitor: &dyn ProgressMonitor,
    ) -> Result<Option<GitBlameResult>> {
        cmd::blame::blame(&self.ctx(monitor), path, revision)
    }

    /// Make `paths` ignored; returns the exclude files that were edited.
    pub fn ignore(
        &self,
        paths: &[PathBuf],
        monitor: &dyn ProgressMonitor,
    ) -> Result<Vec<PathBuf>> {
        cmd::ignore::ignore(&self.ctx(monitor), paths)
    }

    /// Make `paths` not ignored; returns the exclude files that were edited.
    pub fn unignore(
        &self,
        paths: &[PathBuf],
        monitor: &dyn ProgressMonitor,
    ) -> Result<Vec<PathBuf>> {
        cmd::ignore::unignore(&self.ctx(monitor), paths)
    }

    pub fn remotes(&self, monitor: &dyn ProgressMonitor) -> Result<Vec<GitRemoteConfig>> {
        cmd::remote::remotes(&self.ctx(monitor))
    }

    pub fn remote(&self, name: &str, monitor: &dyn ProgressMonitor) -> Result<GitRemoteConfig> {
        cmd::remote::remote(&self.ctx(monitor), name)
    }

    pub fn set_remote(
        &self,
        remote: &GitRemoteConfig,
        monitor: &dyn ProgressMonitor,
    ) -> Result<()> {
        cmd::remote::set_remote(&self.ctx(monitor), remote)
    }

    pub fn remove_remote(&self, name: &str, monitor: &dyn ProgressMonitor) -> Result<()> {
        cmd::remote::remove_remote(&self.ctx(monitor), name)
    }
}
