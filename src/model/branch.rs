// SPDX-License-Identifier: GPL-2.0-only

//! Branch and tag entities.

/// One branch from a `branch -vv -a` listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitBranch {
    /// Short branch name; remote branches keep their `<remote>/` prefix.
    pub name: String,
    /// `true` for remote-tracking branches.
    pub remote: bool,
    /// `true` for the currently checked-out branch.
    pub active: bool,
    /// Object id the branch points at.
    pub id: String,
    /// Name of the branch this one tracks, when an upstream is configured.
    ///
    /// A name rather than a reference: the relation is weak, and the caller
    /// resolves it against the listing it holds.
    pub tracked: Option<String>,
}

impl GitBranch {
    /// Placeholder name git uses for a detached HEAD entry.
    pub const DETACHED: &'static str = "(detached)";

    pub fn is_detached(&self) -> bool {
        self.name == Self::DETACHED
    }
}

/// Kind of object a tag points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GitObjectType {
    Commit,
    Tag,
    Tree,
    Blob,
    Unknown,
}

impl GitObjectType {
    pub(crate) fn from_token(token: &str) -> GitObjectType {
        match token {
            "commit" => GitObjectType::Commit,
            "tag" => GitObjectType::Tag,
            "tree" => GitObjectType::Tree,
            "blob" => GitObjectType::Blob,
            _ => GitObjectType::Unknown,
        }
    }
}

/// One tag, assembled from `show-ref --tags` and, for single-tag listings,
/// the follow-up `show --raw` output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitTag {
    pub name: String,
    /// Id of the tag itself; equals `object_id` for lightweight tags.
    pub id: String,
    /// Id of the tagged object.
    pub object_id: String,
    pub object_type: GitObjectType,
    /// Annotation message; empty for lightweight tags.
    pub message: String,
    /// `Name <email>` of the tagger, when annotated.
    pub tagger: Option<String>,
    pub lightweight: bool,
}
