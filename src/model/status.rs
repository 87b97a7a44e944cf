// SPDX-License-Identifier: GPL-2.0-only

//! Per-file working tree status.

/// Status of a file in one comparison area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Normal,
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
}

/// Conflict kind derived from the index status pair of an unmerged file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictType {
    BothDeleted,
    AddedByUs,
    DeletedByThem,
    AddedByThem,
    DeletedByUs,
    AddedByBoth,
    BothModified,
}

impl ConflictType {
    /// Map the `(first, second)` code pair of an unmerged entry.
    pub(crate) fn from_codes(first: char, second: char) -> Option<ConflictType> {
        match (first, second) {
            ('D', 'D') => Some(ConflictType::BothDeleted),
            ('A', 'U') => Some(ConflictType::AddedByUs),
            ('U', 'D') => Some(ConflictType::DeletedByThem),
            ('U', 'A') => Some(ConflictType::AddedByThem),
            ('D', 'U') => Some(ConflictType::DeletedByUs),
            ('A', 'A') => Some(ConflictType::AddedByBoth),
            ('U', 'U') => Some(ConflictType::BothModified),
            _ => None,
        }
    }
}

/// Full status of one file: the three pairwise comparisons plus conflict and
/// rename information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitStatus {
    /// Repository-relative path.
    pub relative_path: String,
    pub status_head_index: Status,
    pub status_index_worktree: Status,
    pub status_head_worktree: Status,
    /// `false` for untracked files.
    pub tracked: bool,
    pub conflict: Option<ConflictType>,
    /// For a rename destination, the repository-relative source path.
    pub renamed_from: Option<String>,
}

impl GitStatus {
    pub fn is_conflict(&self) -> bool {
        self.conflict.is_some()
    }
}
