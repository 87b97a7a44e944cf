// SPDX-License-Identifier: GPL-2.0-only

//! Merging a revision into the current branch.

use bstr::{BStr, ByteSlice};

use crate::{
    error::Result,
    exec::{ExecOutput, Invocation, Pipeline, Plan, Step},
    model::{GitMergeResult, MergeStatus},
    parse::{merge as parse_merge, revision},
};

use super::CommandContext;

/// Fast-forward policy for merge and pull.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FastForwardOption {
    /// Fast-forward when possible, merge otherwise (`--ff`).
    FastForward,
    /// Refuse anything that is not a fast-forward (`--ff-only`).
    FastForwardOnly,
    /// Always create a merge commit (`--no-ff`).
    NoFastForward,
}

impl FastForwardOption {
    fn flag(self) -> &'static str {
        match self {
            FastForwardOption::FastForward => "--ff",
            FastForwardOption::FastForwardOnly => "--ff-only",
            FastForwardOption::NoFastForward => "--no-ff",
        }
    }
}

/// Merge `revision` into the current branch.
///
/// Expected failures (conflicts, local changes in the way, an ff-only
/// refusal) land in the result status; only unrecognized breakage raises.
/// A true merge runs a follow-up log to learn the merge commit and its
/// parents.
pub(crate) fn merge(
    ctx: &CommandContext<'_>,
    revision: &str,
    ff_option: FastForwardOption,
) -> Result<GitMergeResult> {
    let pipeline = Pipeline::new(vec![
        Step::mixed(
            move |_: &GitMergeResult| {
                Ok(Plan::Run(
                    Invocation::new("merge").arg(ff_option.flag()).arg(revision),
                ))
            },
            |result: &mut GitMergeResult, out: &ExecOutput| {
                *result = parse_merge::parse(
                    &out.stdout.to_str_lossy(),
                    &out.stderr.to_str_lossy(),
                );
                Ok(())
            },
        ),
        Step::output(
            |result: &GitMergeResult| {
                if result.status == MergeStatus::Merged {
                    Ok(Plan::Run(
                        Invocation::new("log").arg("-1").arg("--pretty=raw").arg("HEAD"),
                    ))
                } else {
                    Ok(Plan::Skip)
                }
            },
            |result: &mut GitMergeResult, out: &BStr| {
                if let Some(head) = revision::parse_one(&out.to_string()) {
                    result.new_head = Some(head.revision);
                    result.merged_commits = head.parents;
                }
                Ok(())
            },
        ),
    ]);
    let mut result = GitMergeResult::default();
    ctx.run(&pipeline, &mut result)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::ScriptedExecutor;
    use crate::progress::NullProgressMonitor;
    use crate::repository::Repository;

    fn fixture() -> (Repository, NullProgressMonitor) {
        (Repository::new("/work/repo"), NullProgressMonitor::new())
    }

    #[test]
    fn merged_status_triggers_the_follow_up_log() {
        let log = "\
commit 9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b
tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904
parent 1111111111111111111111111111111111111111
parent 2222222222222222222222222222222222222222
author A <a@b> 1700000000 +0100
committer A <a@b> 1700000000 +0100

    Merge branch 'feature'
";
        let executor = ScriptedExecutor::new([
            ExecOutput::out("Merge made by the 'ort' strategy.\n"),
            ExecOutput::out(log),
        ]);
        let (repository, monitor) = fixture();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let result = merge(&ctx, "feature", FastForwardOption::FastForward).unwrap();
        assert_eq!(
            executor.calls(),
            ["merge --ff feature", "log -1 --pretty=raw HEAD"]
        );
        assert_eq!(result.status, MergeStatus::Merged);
        assert_eq!(
            result.new_head.as_deref(),
            Some("9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b")
        );
        assert_eq!(
            result.merged_commits,
            [
                "1111111111111111111111111111111111111111",
                "2222222222222222222222222222222222222222"
            ]
        );
    }

    #[test]
    fn fast_forward_needs_no_follow_up() {
        let executor = ScriptedExecutor::new([ExecOutput::out(
            "Updating 1a2b3c4..5d6e7f8\nFast-forward\n",
        )]);
        let (repository, monitor) = fixture();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let result = merge(&ctx, "feature", FastForwardOption::FastForwardOnly).unwrap();
        assert_eq!(executor.calls(), ["merge --ff-only feature"]);
        assert_eq!(result.status, MergeStatus::FastForward);
        assert_eq!(result.new_head.as_deref(), Some("5d6e7f8"));
    }

    #[test]
    fn conflicting_merge_reports_paths() {
        let executor = ScriptedExecutor::new([ExecOutput::mixed(
            "Auto-merging a.txt\nCONFLICT (content): Merge conflict in a.txt\n",
            "Automatic merge failed; fix conflicts and then commit the result.\n",
            1,
        )]);
        let (repository, monitor) = fixture();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let result = merge(&ctx, "feature", FastForwardOption::NoFastForward).unwrap();
        assert_eq!(result.status, MergeStatus::Conflicting);
        assert_eq!(result.conflicts, ["a.txt"]);
    }
}
