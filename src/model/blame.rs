// SPDX-License-Identifier: GPL-2.0-only

//! Line annotation results.

use super::revision::GitUser;

/// Annotation of one line of the blamed file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitBlameLine {
    /// Revision that introduced the line.
    pub revision: String,
    pub author: Option<GitUser>,
    pub committer: Option<GitUser>,
    /// Author time as epoch seconds.
    pub author_time: i64,
    /// First line of the introducing commit's message.
    pub summary: String,
    /// Line number in the introducing commit's version of the file.
    pub source_line: u32,
    pub line_content: String,
}

/// Annotation of a whole file at a revision.
#[derive(Clone, Debug, Default)]
pub struct GitBlameResult {
    /// Repository-relative path of the annotated file.
    pub relative_path: String,
    pub line_count: usize,
    /// One entry per final line, 0-based; `None` for lines the porcelain
    /// output did not cover.
    pub lines: Vec<Option<GitBlameLine>>,
}
