// SPDX-License-Identifier: GPL-2.0-only

//! Line annotations from `blame --porcelain`.

use std::collections::HashMap;

use crate::model::{GitBlameLine, GitBlameResult, GitUser};

use super::parse_user;

const ZERO_ID: &str = "0000000000000000000000000000000000000000";

/// Per-commit metadata, printed once per commit and referenced by every
/// later line group of the same commit.
#[derive(Clone, Debug, Default)]
struct CommitInfo {
    author: Option<GitUser>,
    committer: Option<GitUser>,
    author_time: i64,
    summary: String,
}

/// Pending line group: header seen, content line not yet.
#[derive(Clone, Debug)]
struct Pending {
    revision: String,
    source_line: u32,
    final_line: u32,
}

/// Parse porcelain blame output for one file.
///
/// Porcelain interleaves three kinds of lines: a group header
/// (`<sha> <source-line> <final-line> [<group-size>]`), commit metadata
/// key-value lines, and the content line prefixed with a tab. Metadata is
/// cached per commit id so later groups of the same commit resolve to the
/// identical author and summary. Lines attributed to the all-zero id are
/// local modifications and stay unannotated.
pub(crate) fn parse_porcelain(relative_path: &str, text: &str) -> GitBlameResult {
    let mut commits: HashMap<String, CommitInfo> = HashMap::new();
    let mut lines: Vec<Option<GitBlameLine>> = Vec::new();
    let mut pending: Option<Pending> = None;

    for line in text.lines() {
        if let Some(content) = line.strip_prefix('\t') {
            let Some(group) = pending.take() else {
                continue;
            };
            let index = group.final_line.saturating_sub(1) as usize;
            if lines.len() <= index {
                lines.resize(index + 1, None);
            }
            if group.revision == ZERO_ID {
                continue;
            }
            let info = commits.entry(group.revision.clone()).or_default();
            lines[index] = Some(GitBlameLine {
                revision: group.revision,
                author: info.author.clone(),
                committer: info.committer.clone(),
                author_time: info.author_time,
                summary: info.summary.clone(),
                source_line: group.source_line,
                line_content: content.to_string(),
            });
            continue;
        }
        match pending.as_ref() {
            None => {
                pending = parse_header(line);
            }
            Some(group) => {
                let info = commits.entry(group.revision.clone()).or_default();
                if let Some((key, value)) = line.split_once(' ') {
                    match key {
                        "author" => {
                            let user = info.author.get_or_insert_with(GitUser::default);
                            user.name = value.to_string();
                        }
                        "author-mail" => {
                            let user = info.author.get_or_insert_with(GitUser::default);
                            user.email = parse_user(value).email;
                        }
                        "author-time" => {
                            info.author_time = value.parse().unwrap_or(0);
                        }
                        "committer" => {
                            let user = info.committer.get_or_insert_with(GitUser::default);
                            user.name = value.to_string();
                        }
                        "committer-mail" => {
                            let user = info.committer.get_or_insert_with(GitUser::default);
                            user.email = parse_user(value).email;
                        }
                        "summary" => {
                            info.summary = value.to_string();
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    GitBlameResult {
        relative_path: relative_path.to_string(),
        line_count: lines.len(),
        lines,
    }
}

fn parse_header(line: &str) -> Option<Pending> {
    let mut fields = line.split(' ');
    let revision = fields.next()?;
    if revision.len() != 40 || !revision.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let source_line: u32 = fields.next()?.parse().ok()?;
    let final_line: u32 = fields.next()?.parse().ok()?;
    Some(Pending {
        revision: revision.to_string(),
        source_line,
        final_line,
    })
}
