// SPDX-License-Identifier: GPL-2.0-only

//! Commit information parsed from `log --pretty=raw`.

/// Author or committer identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GitUser {
    pub name: String,
    pub email: String,
}

impl std::fmt::Display for GitUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Status letter of one file in a `--raw` diff record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Unknown,
}

impl FileStatus {
    pub(crate) fn from_letter(letter: char) -> FileStatus {
        match letter {
            'A' => FileStatus::Added,
            'M' | 'T' => FileStatus::Modified,
            'D' => FileStatus::Removed,
            'R' => FileStatus::Renamed,
            'C' => FileStatus::Copied,
            _ => FileStatus::Unknown,
        }
    }
}

/// One file touched by a commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitFileInfo {
    pub relative_path: String,
    pub status: FileStatus,
    /// Source path for renames and copies.
    pub original_path: Option<String>,
}

/// One commit record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GitRevisionInfo {
    pub revision: String,
    pub parents: Vec<String>,
    pub short_message: String,
    pub full_message: String,
    pub author: Option<GitUser>,
    pub committer: Option<GitUser>,
    /// Commit time as epoch seconds, as git prints it.
    pub commit_time: i64,
    pub modified_files: Vec<GitFileInfo>,
}
