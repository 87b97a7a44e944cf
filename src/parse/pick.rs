// SPDX-License-Identifier: GPL-2.0-only

//! Cherry-pick feedback.

use crate::model::{CherryPickStatus, GitCherryPickResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Scan,
    CollectFailures,
}

/// Parse cherry-pick feedback from both captured streams.
///
/// Every applied commit prints a `[branch sha] subject` line; a stopped
/// pick prints `error: could not apply <sha>... subject` on stderr, plus
/// `CONFLICT` lines when the stop is a merge conflict. `current_head` is
/// filled by the caller's follow-up log.
pub(crate) fn parse(stdout: &str, stderr: &str) -> GitCherryPickResult {
    let mut result = GitCherryPickResult::default();
    let mut status: Option<CherryPickStatus> = None;
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
            result.cherry_picked_commits.push(sha.to_string());
        } else if line.starts_with("CONFLICT") {
            status = Some(CherryPickStatus::Conflicting);
            if let Some(path) = line.rsplit_once(" in ").map(|(_, p)| p) {
                result.failures.push(path.trim().to_string());
            }
        } else if let Some(rest) = line.split_once("could not apply ").map(|(_, r)| r) {
            let sha = rest.split_whitespace().next().unwrap_or("");
            result.failed_commit = Some(sha.trim_end_matches('.').to_string());
            if status != Some(CherryPickStatus::Conflicting) {
                status = Some(CherryPickStatus::Failed);
            }
        } else if line.contains("would be overwritten") {
            status = Some(CherryPickStatus::Failed);
            state = State::CollectFailures;
        } else if line.contains("your local changes would be overwritten") {
            status = Some(CherryPickStatus::Failed);
        }
    }

    result.status = match status {
        Some(status) => status,
        None if !result.cherry_picked_commits.is_empty() => CherryPickStatus::Ok,
        None => CherryPickStatus::Failed,
    };
    result
}

/// `[feature 1a2b3c4] subject` yields the abbreviated commit id.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_commits_are_collected() {
        let out = "\
[feature 1a2b3c4] pick a color
 Date: Mon Nov 13 10:13:20 2023 +0100
 1 file changed, 1 insertion(+)
[feature 5d6e7f8] second change
 1 file changed, 1 insertion(+)
";
        let result = parse(out, "");
        assert_eq!(result.status, CherryPickStatus::Ok);
        assert_eq!(result.cherry_picked_commits, ["1a2b3c4", "5d6e7f8"]);
        assert_eq!(result.failed_commit, None);
    }

    #[test]
    fn conflict_names_the_unapplied_commit() {
        let out = "Auto-merging src/lib.rs\nCONFLICT (content): Merge conflict in src/lib.rs\n";
        let err = "error: could not apply 8f2e3de... pick a color\n";
        let result = parse(out, err);
        assert_eq!(result.status, CherryPickStatus::Conflicting);
        assert_eq!(result.failed_commit.as_deref(), Some("8f2e3de"));
        assert_eq!(result.failures, ["src/lib.rs"]);
    }

    #[test]
    fn unrecognized_error_is_failed() {
        let result = parse("", "fatal: bad revision 'nope'\n");
        assert_eq!(result.status, CherryPickStatus::Failed);
    }
}
