// SPDX-License-Identifier: GPL-2.0-only

//! Rebase feedback from `rebase` stdout and stderr.

use crate::model::{GitRebaseResult, RebaseStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Scan,
    CollectFailures,
}

/// Parse rebase feedback from both captured streams.
///
/// The interesting phrases move between stdout and stderr across git
/// versions, so both streams run through the same machine. `current_head`
/// and the stopped-on commit id from the sequencer metadata are filled by
/// the caller afterwards.
pub(crate) fn parse(stdout: &str, stderr: &str) -> GitRebaseResult {
    let mut result = GitRebaseResult::default();
    let mut status: Option<RebaseStatus> = None;
    let mut state = State::Scan;

    for line in stdout.lines().chain(stderr.lines()) {
        if state == State::CollectFailures {
            if let Some(file) = line.strip_prefix('\t') {
                result.failures.push(file.trim().to_string());
                continue;
            }
            state = State::Scan;
        }
        if line.contains("Successfully rebased") {
            status = Some(RebaseStatus::Ok);
        } else if line.contains("is up to date") {
            status = Some(RebaseStatus::UpToDate);
        } else if line.starts_with("CONFLICT") {
            status = Some(RebaseStatus::Stopped);
            if let Some(path) = line.rsplit_once(" in ").map(|(_, p)| p) {
                result.conflicts.push(path.trim().to_string());
            }
        } else if line.contains("could not apply") {
            status = Some(RebaseStatus::Stopped);
        } else if line.contains("would be overwritten") {
            status = Some(RebaseStatus::Failed);
            state = State::CollectFailures;
        } else if line.contains("You have unstaged changes")
            || line.contains("Cannot rebase")
            || line.contains("cannot rebase")
        {
            status = Some(RebaseStatus::Failed);
        }
    }

    result.status = status.unwrap_or(RebaseStatus::Failed);
    result
}
