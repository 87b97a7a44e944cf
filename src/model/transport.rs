// SPDX-License-Identifier: GPL-2.0-only

//! Per-ref updates reported by fetch and push, plus remote configuration.

use indexmap::IndexMap;

/// Kind of ref an update applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefType {
    Branch,
    Tag,
    /// A ref outside `refs/heads` and `refs/tags`.
    Reference,
}

impl RefType {
    pub(crate) fn from_ref_name(name: &str) -> RefType {
        if name.starts_with("refs/heads/") || name.starts_with("refs/remotes/") {
            RefType::Branch
        } else if name.starts_with("refs/tags/") {
            RefType::Tag
        } else {
            RefType::Reference
        }
    }
}

/// Terminal state of one ref update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateStatus {
    Ok,
    Rejected,
    UpToDate,
}

/// Before/after record for one ref touched by fetch or push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitTransportUpdate {
    pub ref_type: RefType,
    /// Local ref name, shortened.
    pub local_name: Option<String>,
    /// Remote ref name, shortened.
    pub remote_name: Option<String>,
    pub old_id: Option<String>,
    pub new_id: Option<String>,
    /// Operation tag as git printed it, e.g. `new branch`, `deleted`,
    /// `forced update`, or the `old..new` range.
    pub operation: String,
    pub status: UpdateStatus,
}

/// Updates keyed by short branch (or tag/reference) name.
pub type TransportUpdates = IndexMap<String, GitTransportUpdate>;

/// Result of a push: what changed on the remote, and which local
/// remote-tracking refs followed.
#[derive(Clone, Debug, Default)]
pub struct GitPushResult {
    pub remote_updates: TransportUpdates,
    pub local_updates: TransportUpdates,
}

/// One `remote.<name>` config section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GitRemoteConfig {
    pub name: String,
    pub uris: Vec<String>,
    pub push_uris: Vec<String>,
    pub fetch_specs: Vec<String>,
    pub push_specs: Vec<String>,
}
