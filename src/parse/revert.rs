// SPDX-License-Identifier: GPL-2.0-only

//! Revert feedback.

use crate::model::{GitRevertResult, RevertStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Scan,
    CollectFailures,
}

/// Parse revert feedback from both captured streams.
///
/// A completed revert prints the created commit as `[branch sha] Revert
/// "subject"`; reverting a commit whose changes are already gone reports
/// nothing to commit.
pub(crate) fn parse(stdout: &str, stderr: &str) -> GitRevertResult {
    let mut result = GitRevertResult::default();
    let mut status: Option<RevertStatus> = None;
    let mut state = State::Scan;

    for line in stdout.lines().chain(stderr.lines()) {
        if state == State::CollectFailures {
            if let Some(file) = line.strip_prefix('\t') {
                result.failures.push(file.trim().to_string());
                continue;
            }
            state = State::Scan;
        }
        if let Some(sha) = commit_line(line) {
            status = Some(RevertStatus::Reverted);
            result.new_head = Some(sha.to_string());
        } else if line.contains("nothing to commit") || line.contains("nothing added to commit") {
            status = Some(RevertStatus::NoChange);
        } else if line.starts_with("CONFLICT") {
            status = Some(RevertStatus::Conflicting);
            if let Some(path) = line.rsplit_once(" in ").map(|(_, p)| p) {
                result.conflicts.push(path.trim().to_string());
            }
        } else if line.contains("could not revert") {
            // Conflict announcement; CONFLICT lines seen earlier already set
            // the status and carry the paths.
            if status.is_none() {
                status = Some(RevertStatus::Conflicting);
            }
        } else if line.contains("would be overwritten") {
            status = Some(RevertStatus::Failed);
            state = State::CollectFailures;
        }
    }

    result.status = status.unwrap_or(RevertStatus::Failed);
    result
}

fn commit_line(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.split(']').next()?;
    let mut tokens = inner.split_whitespace();
    let _branch = tokens.next()?;
    let sha = tokens.next()?;
    if sha.len() >= 7 && sha.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(sha)
    } else {
        None
    }
}
