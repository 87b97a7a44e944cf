// SPDX-License-Identifier: GPL-2.0-only

//! Typed value objects produced by the output parsers.
//!
//! Everything here is immutable from the caller's point of view: parsers
//! accumulate into command-private containers and hand these out once the
//! pipeline completes.

mod blame;
mod branch;
mod outcome;
mod revision;
mod status;
mod transport;

pub use self::{
    blame::{GitBlameLine, GitBlameResult},
    branch::{GitBranch, GitObjectType, GitTag},
    outcome::{
        CherryPickStatus, GitCherryPickResult, GitMergeResult, GitPullResult, GitRebaseResult,
        GitRevertResult, MergeStatus, RebaseStatus, RevertStatus,
    },
    revision::{FileStatus, GitFileInfo, GitRevisionInfo, GitUser},
    status::{ConflictType, GitStatus, Status},
    transport::{
        GitPushResult, GitRemoteConfig, GitTransportUpdate, RefType, TransportUpdates, UpdateStatus,
    },
};
