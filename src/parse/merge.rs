// SPDX-License-Identifier: GPL-2.0-only

//! Merge feedback from `merge` stdout and stderr.
//!
//! Merge prints human-readable advisory text, not porcelain; the machine
//! keys on the stable leading phrases and degrades to a failed status when
//! none match.

use crate::model::{GitMergeResult, MergeStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Scan,
    /// After an "would be overwritten" header; tab-indented file list.
    CollectFailures,
}

/// Parse merge feedback from both captured streams.
///
/// Stdout carries the outcome phrases (`Updating`, `Fast-forward`,
/// `Merge made by`, `CONFLICT`), stderr the refusals (`Not possible to
/// fast-forward`, overwritten-files lists). `new_head` is only known here
/// for fast-forwards; true merges resolve it with a follow-up log.
pub(crate) fn parse(stdout: &str, stderr: &str) -> GitMergeResult {
    let mut result = GitMergeResult::default();
    let mut status: Option<MergeStatus> = None;
    let mut state = State::Scan;

    for line in stdout.lines().chain(stderr.lines()) {
        if state == State::CollectFailures {
            if let Some(file) = line.strip_prefix('\t') {
                result.failures.push(file.trim().to_string());
                continue;
            }
            state = State::Scan;
        }
        if let Some(range) = line.strip_prefix("Updating ") {
            if let Some((old, new)) = range.trim().split_once("..") {
                result.merged_commits = vec![old.to_string(), new.to_string()];
                result.new_head = Some(new.to_string());
            }
        } else if line.starts_with("Fast-forward") {
            status = Some(MergeStatus::FastForward);
        } else if line.starts_with("Merge made by") {
            status = Some(MergeStatus::Merged);
        } else if line.starts_with("Already up to date") || line.starts_with("Already up-to-date")
        {
            status = Some(MergeStatus::AlreadyUpToDate);
        } else if line.starts_with("CONFLICT") {
            status = Some(MergeStatus::Conflicting);
            if let Some(path) = line.rsplit_once(" in ").map(|(_, p)| p) {
                result.conflicts.push(path.trim().to_string());
            }
        } else if line.contains("would be overwritten by merge") {
            status = Some(MergeStatus::Failed);
            state = State::CollectFailures;
        } else if line.contains("Not possible to fast-forward") {
            status = Some(MergeStatus::NotSupported);
        }
    }

    result.status = match status {
        Some(status) => status,
        None if stderr.contains("Aborting") || stderr.contains("aborting") => {
            MergeStatus::Aborted
        }
        None => MergeStatus::Failed,
    };
    // The Updating range only describes a completed fast-forward.
    if result.status != MergeStatus::FastForward {
        result.new_head = None;
        result.merged_commits.clear();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_forward() {
        let out = "\
Updating 16e930c..8f2e3de
Fast-forward
 src/lib.rs | 2 +-
 1 file changed, 1 insertion(+), 1 deletion(-)
";
        let result = parse(out, "");
        assert_eq!(result.status, MergeStatus::FastForward);
        assert_eq!(result.new_head.as_deref(), Some("8f2e3de"));
        assert_eq!(result.merged_commits, ["16e930c", "8f2e3de"]);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn already_up_to_date() {
        let result = parse("Already up to date.\n", "");
        assert_eq!(result.status, MergeStatus::AlreadyUpToDate);
        assert_eq!(result.new_head, None);
    }

    #[test]
    fn true_merge() {
        let out = "Merge made by the 'ort' strategy.\n src/lib.rs | 1 +\n";
        let result = parse(out, "");
        assert_eq!(result.status, MergeStatus::Merged);
        // Resolved by a follow-up log, not here.
        assert_eq!(result.new_head, None);
    }

    #[test]
    fn conflicts_collect_paths() {
        let out = "\
Auto-merging src/lib.rs
CONFLICT (content): Merge conflict in src/lib.rs
CONFLICT (content): Merge conflict in src/main.rs
Automatic merge failed; fix conflicts and then commit the result.
";
        let result = parse(out, "");
        assert_eq!(result.status, MergeStatus::Conflicting);
        assert_eq!(result.conflicts, ["src/lib.rs", "src/main.rs"]);
    }

    #[test]
    fn local_changes_would_be_overwritten() {
        let err = "\
error: Your local changes to the following files would be overwritten by merge:
\tsrc/lib.rs
\tsrc/main.rs
Please commit your changes or stash them before you merge.
Aborting
";
        let result = parse("", err);
        assert_eq!(result.status, MergeStatus::Failed);
        assert_eq!(result.failures, ["src/lib.rs", "src/main.rs"]);
    }

    #[test]
    fn ff_only_refusal_is_unsupported() {
        let result = parse("", "fatal: Not possible to fast-forward, aborting.\n");
        assert_eq!(result.status, MergeStatus::NotSupported);
    }

    #[test]
    fn unrecognized_abort_output() {
        let result = parse("", "error: something odd\nAborting\n");
        assert_eq!(result.status, MergeStatus::Aborted);
    }
}
