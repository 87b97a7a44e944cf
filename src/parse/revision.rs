// SPDX-License-Identifier: GPL-2.0-only

//! Commit records from `log --pretty=raw --raw`.

use crate::model::{FileStatus, GitFileInfo, GitRevisionInfo};

use super::split_identity;

/// Where in one raw commit record the machine currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Header block: `commit`/`tree`/`parent`/`author`/`committer` lines.
    Header,
    /// Message block: lines indented by four spaces.
    Message,
    /// `--raw` file records: lines starting with `:`.
    Files,
}

/// Parse a sequence of raw commit records.
///
/// The machine loops back to the header state whenever a `commit ` line
/// appears, so multi-commit logs parse into multiple records.
pub(crate) fn parse_log(text: &str) -> Vec<GitRevisionInfo> {
    let mut records = Vec::new();
    let mut current: Option<GitRevisionInfo> = None;
    let mut state = State::Header;
    let mut message_lines: Vec<String> = Vec::new();

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("commit ") {
            if let Some(rec) = current.take() {
                records.push(finish(rec, &mut message_lines));
            }
            let mut rec = GitRevisionInfo::default();
            // A decorated header may carry `(from <sha>)`; the id is the
            // first token.
            rec.revision = rest.split_whitespace().next().unwrap_or("").to_string();
            current = Some(rec);
            state = State::Header;
            continue;
        }
        let Some(rec) = current.as_mut() else {
            continue;
        };
        match state {
            State::Header => {
                if let Some(parent) = line.strip_prefix("parent ") {
                    rec.parents.push(parent.trim().to_string());
                } else if let Some(author) = line.strip_prefix("author ") {
                    let (user, _) = split_identity(author);
                    rec.author = Some(user);
                } else if let Some(committer) = line.strip_prefix("committer ") {
                    let (user, time) = split_identity(committer);
                    rec.committer = Some(user);
                    rec.commit_time = time;
                } else if line.is_empty() {
                    state = State::Message;
                }
                // `tree` and gpgsig continuation lines are not interesting.
            }
            State::Message => {
                if let Some(stripped) = line.strip_prefix("    ") {
                    message_lines.push(stripped.to_string());
                } else if line.starts_with(':') {
                    state = State::Files;
                    push_file(rec, line);
                } else if line.is_empty() {
                    message_lines.push(String::new());
                }
            }
            State::Files => {
                if line.starts_with(':') {
                    push_file(rec, line);
                }
            }
        }
    }
    if let Some(rec) = current.take() {
        records.push(finish(rec, &mut message_lines));
    }
    records
}

/// Parse exactly one record (`log -1`).
pub(crate) fn parse_one(text: &str) -> Option<GitRevisionInfo> {
    parse_log(text).into_iter().next()
}

fn finish(mut rec: GitRevisionInfo, message_lines: &mut Vec<String>) -> GitRevisionInfo {
    while message_lines.last().is_some_and(|l| l.is_empty()) {
        message_lines.pop();
    }
    rec.short_message = message_lines
        .iter()
        .take_while(|l| !l.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    rec.full_message = message_lines.join("\n");
    message_lines.clear();
    rec
}

fn push_file(rec: &mut GitRevisionInfo, line: &str) {
    if let Some(file) = parse_raw_line(line) {
        rec.modified_files.push(file);
    }
}

/// One `--raw` record:
/// `:100644 100644 <old> <new> <letter>[score]\t<path>[\t<path>]`.
///
/// Shared between log records and standalone tree diffs.
pub(crate) fn parse_raw_line(line: &str) -> Option<GitFileInfo> {
    let mut fields = line.strip_prefix(':')?.split('\t');
    let meta = fields.next().unwrap_or("");
    let status_token = meta.split_whitespace().last().unwrap_or("");
    let letter = status_token.chars().next().unwrap_or('X');
    let status = FileStatus::from_letter(letter);
    let first_path = match fields.next() {
        Some(path) if !path.is_empty() => path.to_string(),
        _ => return None,
    };
    let second_path = fields.next().map(str::to_string);
    let (path, original) = match (letter, second_path) {
        ('R' | 'C', Some(destination)) => (destination, Some(first_path)),
        (_, _) => (first_path, None),
    };
    Some(GitFileInfo {
        relative_path: path,
        status,
        original_path: original,
    })
}

/// A whole `diff --raw` listing, e.g. from comparing two trees.
pub(crate) fn parse_raw_files(text: &str) -> Vec<GitFileInfo> {
    text.lines().filter_map(parse_raw_line).collect()
}
