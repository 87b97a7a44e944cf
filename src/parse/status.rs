// SPDX-License-Identifier: GPL-2.0-only

//! Merging working-tree status from its four source listings.
//!
//! One status command issues up to four sub-invocations: `status --short`,
//! `diff --raw` against HEAD (or a caller-given revision), and `ls-files`.
//! Their lines merge into a single per-path map of character codes before
//! translation into [`GitStatus`] values:
//!
//! * `first`  — head vs index, `X` of `status --short`
//! * `second` — index vs worktree, `Y` of `status --short`
//! * `third`  — head (or revision) vs worktree, from `diff --raw`
//! * `untracked` — the `??` marker
//!
//! Each path appears exactly once in the merged map regardless of how many
//! sources mention it; rename destinations are synthesized when `diff --raw`
//! detects a rename that `status --short` did not list.

use indexmap::IndexMap;

use crate::model::{ConflictType, GitStatus, Status};

#[derive(Clone, Debug)]
pub(crate) struct StatusLine {
    first: char,
    second: char,
    third: char,
    untracked: bool,
    in_index: bool,
    renamed_from: Option<String>,
}

impl Default for StatusLine {
    fn default() -> StatusLine {
        StatusLine {
            first: ' ',
            second: ' ',
            third: ' ',
            untracked: false,
            in_index: false,
            renamed_from: None,
        }
    }
}

/// Accumulator for the four status sources.
#[derive(Debug, Default)]
pub(crate) struct StatusMerger {
    entries: IndexMap<String, StatusLine>,
    /// Set when diffing against HEAD failed because the repository has no
    /// commits yet; every tracked entry then counts as added.
    pub(crate) empty_repo: bool,
}

impl StatusMerger {
    pub(crate) fn new() -> StatusMerger {
        StatusMerger::default()
    }

    fn entry(&mut self, path: &str) -> &mut StatusLine {
        self.entries.entry(path.to_string()).or_default()
    }

    /// Feed `status --short` output.
    pub(crate) fn feed_status_short(&mut self, text: &str) {
        for line in text.lines() {
            if line.len() < 4 {
                continue;
            }
            let mut chars = line.chars();
            let first = chars.next().unwrap_or(' ');
            let second = chars.next().unwrap_or(' ');
            let path_part = &line[3..];
            match (first, second) {
                ('!', '!') => continue,
                ('?', '?') => {
                    self.entry(&unquote(path_part)).untracked = true;
                }
                _ => {
                    if let Some((from, to)) = path_part.split_once(" -> ") {
                        let from = unquote(from);
                        let to = unquote(to);
                        {
                            let entry = self.entry(&to);
                            entry.first = first;
                            entry.second = second;
                            entry.renamed_from = Some(from.clone());
                        }
                        // The rename source no longer exists in the index.
                        let source = self.entry(&from);
                        if source.first == ' ' {
                            source.first = 'D';
                        }
                    } else {
                        let path = unquote(path_part);
                        let entry = self.entry(&path);
                        entry.first = first;
                        entry.second = second;
                    }
                }
            }
        }
    }

    /// Feed `diff --raw` output comparing the worktree against HEAD or a
    /// revision; fills the third code.
    pub(crate) fn feed_diff_raw(&mut self, text: &str) {
        for line in text.lines() {
            if !line.starts_with(':') {
                continue;
            }
            let mut fields = line.split('\t');
            let meta = fields.next().unwrap_or("");
            let letter = meta
                .split_whitespace()
                .last()
                .and_then(|token| token.chars().next())
                .unwrap_or(' ');
            let Some(first_path) = fields.next() else {
                continue;
            };
            match (letter, fields.next()) {
                ('R' | 'C', Some(to)) => {
                    let from = unquote(first_path);
                    let to = unquote(to);
                    let entry = self.entry(&to);
                    entry.third = letter;
                    if entry.renamed_from.is_none() {
                        entry.renamed_from = Some(from);
                    }
                }
                _ => {
                    let path = unquote(first_path);
                    self.entry(&path).third = letter;
                }
            }
        }
    }

    /// Feed `ls-files` output; marks paths present in the index.
    pub(crate) fn feed_ls_files(&mut self, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            self.entry(&unquote(line)).in_index = true;
        }
    }

    /// Translate the merged map into per-file statuses, preserving insertion
    /// order.
    pub(crate) fn translate(self) -> IndexMap<String, GitStatus> {
        let empty_repo = self.empty_repo;
        self.entries
            .into_iter()
            .map(|(path, line)| {
                let status = translate_line(&path, &line, empty_repo);
                (path, status)
            })
            .collect()
    }
}

fn translate_line(path: &str, line: &StatusLine, empty_repo: bool) -> GitStatus {
    let conflict = ConflictType::from_codes(line.first, line.second);
    let tracked = line.in_index || !line.untracked;

    let status_head_index = map_code(line.first);
    let status_index_worktree = if line.second == ' ' && line.untracked {
        // Untracked files carry no Y code; the worktree side is an addition.
        Status::Added
    } else {
        map_code(line.second)
    };
    let status_head_worktree = if line.third != ' ' {
        map_code(line.third)
    } else if line.untracked || empty_repo {
        Status::Added
    } else {
        derive_head_worktree(status_head_index, status_index_worktree)
    };

    GitStatus {
        relative_path: path.to_string(),
        status_head_index,
        status_index_worktree,
        status_head_worktree,
        tracked,
        conflict,
        renamed_from: line.renamed_from.clone(),
    }
}

fn map_code(code: char) -> Status {
    match code {
        'M' | 'T' | 'U' => Status::Modified,
        'A' | '?' => Status::Added,
        'D' => Status::Removed,
        'R' => Status::Renamed,
        'C' => Status::Copied,
        _ => Status::Normal,
    }
}

/// When no worktree-vs-head source reported a code, compose one from the two
/// halves.
fn derive_head_worktree(head_index: Status, index_worktree: Status) -> Status {
    match (head_index, index_worktree) {
        (Status::Normal, other) => other,
        (other, Status::Normal) => other,
        (Status::Renamed, _) => Status::Renamed,
        (Status::Copied, _) => Status::Copied,
        (Status::Added, Status::Removed) => Status::Normal,
        _ => Status::Modified,
    }
}

/// Strip git's C-style path quoting.
fn unquote(path: &str) -> String {
    let path = path.trim_end();
    let Some(inner) = path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) else {
        return path.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked_file_is_added_not_normal() {
        let mut merger = StatusMerger::new();
        merger.feed_status_short("?? newfile.txt\n");
        let statuses = merger.translate();
        let status = &statuses["newfile.txt"];
        assert!(!status.tracked);
        assert_eq!(status.status_head_index, Status::Normal);
        assert_eq!(status.status_index_worktree, Status::Added);
        assert_eq!(status.status_head_worktree, Status::Added);
        assert_eq!(status.conflict, None);
    }

    #[test]
    fn each_path_appears_once_across_sources() {
        let mut merger = StatusMerger::new();
        merger.feed_status_short(" M shared.txt\n?? untracked.txt\n");
        merger.feed_diff_raw(":100644 100644 aaa bbb M\tshared.txt\n");
        merger.feed_ls_files("shared.txt\nclean.txt\n");
        let statuses = merger.translate();
        assert_eq!(statuses.len(), 3);
        assert_eq!(
            statuses.keys().collect::<Vec<_>>(),
            ["shared.txt", "untracked.txt", "clean.txt"]
        );
        assert_eq!(statuses["clean.txt"].status_head_worktree, Status::Normal);
        assert_eq!(statuses["shared.txt"].status_head_worktree, Status::Modified);
        assert_eq!(statuses["shared.txt"].status_index_worktree, Status::Modified);
        assert_eq!(statuses["shared.txt"].status_head_index, Status::Normal);
    }

    #[test]
    fn rename_pair_is_cross_linked() {
        let mut merger = StatusMerger::new();
        merger.feed_status_short("R  old.rs -> new.rs\n");
        let statuses = merger.translate();
        let new = &statuses["new.rs"];
        assert_eq!(new.status_head_index, Status::Renamed);
        assert_eq!(new.renamed_from.as_deref(), Some("old.rs"));
        let old = &statuses["old.rs"];
        assert_eq!(old.status_head_index, Status::Removed);
    }

    #[test]
    fn rename_destination_synthesized_from_diff_raw() {
        let mut merger = StatusMerger::new();
        // status --short said nothing about the rename; diff --raw did.
        merger.feed_diff_raw(":100644 100644 aaa aaa R100\told.rs\tnew.rs\n");
        let statuses = merger.translate();
        let new = &statuses["new.rs"];
        assert_eq!(new.status_head_worktree, Status::Renamed);
        assert_eq!(new.renamed_from.as_deref(), Some("old.rs"));
    }

    #[test]
    fn conflict_codes_map_to_conflict_types() {
        let mut merger = StatusMerger::new();
        merger.feed_status_short("UU conflicted.txt\nAA both-added.txt\nDU deleted-by-us.txt\n");
        let statuses = merger.translate();
        assert_eq!(
            statuses["conflicted.txt"].conflict,
            Some(ConflictType::BothModified)
        );
        assert_eq!(
            statuses["both-added.txt"].conflict,
            Some(ConflictType::AddedByBoth)
        );
        assert_eq!(
            statuses["deleted-by-us.txt"].conflict,
            Some(ConflictType::DeletedByUs)
        );
        assert_eq!(
            statuses["conflicted.txt"].status_head_index,
            Status::Modified
        );
    }

    #[test]
    fn empty_repository_treats_everything_as_added() {
        let mut merger = StatusMerger::new();
        merger.feed_status_short("A  staged.txt\n");
        merger.feed_ls_files("staged.txt\n");
        merger.empty_repo = true;
        let statuses = merger.translate();
        let staged = &statuses["staged.txt"];
        assert_eq!(staged.status_head_index, Status::Added);
        assert_eq!(staged.status_head_worktree, Status::Added);
    }

    #[test]
    fn staged_modification_with_clean_worktree() {
        let mut merger = StatusMerger::new();
        merger.feed_status_short("M  staged.txt\n");
        merger.feed_diff_raw(":100644 100644 aaa bbb M\tstaged.txt\n");
        merger.feed_ls_files("staged.txt\n");
        let statuses = merger.translate();
        let staged = &statuses["staged.txt"];
        assert_eq!(staged.status_head_index, Status::Modified);
        assert_eq!(staged.status_index_worktree, Status::Normal);
        assert_eq!(staged.status_head_worktree, Status::Modified);
        assert!(staged.tracked);
    }

    #[test]
    fn quoted_paths_are_unquoted() {
        let mut merger = StatusMerger::new();
        merger.feed_status_short("?? \"with space\\tand tab\"\n");
        let statuses = merger.translate();
        assert!(statuses.contains_key("with space\tand tab"));
    }
}
