// SPDX-License-Identifier: GPL-2.0-only

//! Result types for the commands with partial-success semantics.
//!
//! Merge, rebase, cherry-pick, and revert surface expected git-domain
//! failures (conflicts, local-change aborts) as terminal result states from
//! closed enumerations rather than as errors.

use super::revision::GitRevisionInfo;
use super::transport::TransportUpdates;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeStatus {
    /// A merge commit was created.
    Merged,
    FastForward,
    AlreadyUpToDate,
    Aborted,
    #[default]
    Failed,
    Conflicting,
    NotSupported,
}

#[derive(Clone, Debug, Default)]
pub struct GitMergeResult {
    pub status: MergeStatus,
    /// Head after a successful merge or fast-forward.
    pub new_head: Option<String>,
    /// Endpoints of a fast-forward, or the merged heads of a true merge.
    pub merged_commits: Vec<String>,
    /// Repository-relative paths left in conflict.
    pub conflicts: Vec<String>,
    /// Repository-relative paths whose local changes blocked the merge.
    pub failures: Vec<String>,
}

/// Fetch-then-merge outcome of a pull.
#[derive(Clone, Debug, Default)]
pub struct GitPullResult {
    pub fetch_result: TransportUpdates,
    pub merge_result: GitMergeResult,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RebaseStatus {
    Ok,
    UpToDate,
    /// Rebase stopped on a conflicting commit and awaits resolution.
    Stopped,
    Aborted,
    #[default]
    Failed,
}

#[derive(Clone, Debug, Default)]
pub struct GitRebaseResult {
    pub status: RebaseStatus,
    pub current_head: Option<String>,
    /// The commit an interrupted rebase stopped on, from the sequencer
    /// metadata in the git directory.
    pub current_commit: Option<String>,
    pub conflicts: Vec<String>,
    pub failures: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CherryPickStatus {
    Ok,
    Aborted,
    #[default]
    Failed,
    Conflicting,
}

#[derive(Clone, Debug, Default)]
pub struct GitCherryPickResult {
    pub status: CherryPickStatus,
    /// Head commit after the pick, resolved by the follow-up log
    /// sub-invocation.
    pub current_head: Option<GitRevisionInfo>,
    /// Sha of the commit that could not be applied, when `Failed`.
    pub failed_commit: Option<String>,
    pub cherry_picked_commits: Vec<String>,
    pub failures: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevertStatus {
    Reverted,
    NoChange,
    Conflicting,
    #[default]
    Failed,
}

#[derive(Clone, Debug, Default)]
pub struct GitRevertResult {
    pub status: RevertStatus,
    pub new_head: Option<String>,
    pub conflicts: Vec<String>,
    pub failures: Vec<String>,
}
