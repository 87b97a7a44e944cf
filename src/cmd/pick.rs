// SPDX-License-Identifier: GPL-2.0-only

//! Cherry-picking commits onto the current branch.

use bstr::{BStr, ByteSlice};

use crate::{
    error::Result,
    exec::{ExecOutput, Invocation, Pipeline, Plan, Step},
    model::{CherryPickStatus, GitCherryPickResult},
    parse::{pick as parse_pick, revision},
};

use super::CommandContext;

/// Which phase of a (possibly interrupted) cherry-pick to drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CherryPickOperation {
    Begin,
    Continue,
    Quit,
    Abort,
}

impl CherryPickOperation {
    fn flag(self) -> Option<&'static str> {
        match self {
            CherryPickOperation::Begin => None,
            CherryPickOperation::Continue => Some("--continue"),
            CherryPickOperation::Quit => Some("--quit"),
            CherryPickOperation::Abort => Some("--abort"),
        }
    }
}

/// Cherry-pick the given revisions, or drive the sequencer of an
/// interrupted pick.
///
/// The head revision after the pick comes from a follow-up raw log, so the
/// caller gets the full record of the last created commit.
pub(crate) fn cherry_pick(
    ctx: &CommandContext<'_>,
    revisions: &[String],
    operation: CherryPickOperation,
) -> Result<GitCherryPickResult> {
    let pipeline = Pipeline::new(vec![
        Step::mixed(
            move |_: &GitCherryPickResult| {
                let mut invocation = Invocation::new("cherry-pick");
                match operation.flag() {
                    Some(flag) => invocation = invocation.arg(flag),
                    None => invocation = invocation.args(revisions.iter().cloned()),
                }
                Ok(Plan::Run(invocation))
            },
            move |result: &mut GitCherryPickResult, out: &ExecOutput| {
                *result = parse_pick::parse(
                    &out.stdout.to_str_lossy(),
                    &out.stderr.to_str_lossy(),
                );
                if operation == CherryPickOperation::Abort && out.code == 0 {
                    result.status = CherryPickStatus::Aborted;
                }
                Ok(())
            },
        ),
        Step::output_error(
            |result: &GitCherryPickResult| {
                if result.status == CherryPickStatus::Aborted {
                    Ok(Plan::Skip)
                } else {
                    Ok(Plan::Run(
                        Invocation::new("log")
                            .arg("-1")
                            .arg("--raw")
                            .arg("--pretty=raw")
                            .arg("HEAD"),
                    ))
                }
            },
            |result: &mut GitCherryPickResult, out: &BStr| {
                result.current_head = revision::parse_one(&out.to_string());
                Ok(())
            },
            // No commits yet; leave the head unset.
            |_, _| Ok(()),
        ),
    ]);
    let mut result = GitCherryPickResult::default();
    ctx.run(&pipeline, &mut result)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::ScriptedExecutor;
    use crate::progress::NullProgressMonitor;
    use crate::repository::Repository;

    const LOG: &str = "\
commit 5d6e7f8a9b0c1d2e3f4a5b6c7d8e9f0a1b2c3d4e
tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904
parent 1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b
author A <a@b> 1700000000 +0100
committer A <a@b> 1700000000 +0100

    picked change

:100644 100644 1111111 2222222 M\ta.txt
";

    fn fixture() -> (Repository, NullProgressMonitor) {
        (Repository::new("/work/repo"), NullProgressMonitor::new())
    }

    #[test]
    fn pick_resolves_the_new_head() {
        let executor = ScriptedExecutor::new([
            ExecOutput::out("[master 5d6e7f8] picked change\n 1 file changed\n"),
            ExecOutput::out(LOG),
        ]);
        let (repository, monitor) = fixture();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let result = cherry_pick(
            &ctx,
            &["8f2e3de".to_string()],
            CherryPickOperation::Begin,
        )
        .unwrap();
        assert_eq!(
            executor.calls(),
            ["cherry-pick 8f2e3de", "log -1 --raw --pretty=raw HEAD"]
        );
        assert_eq!(result.status, CherryPickStatus::Ok);
        assert_eq!(result.cherry_picked_commits, ["5d6e7f8"]);
        let head = result.current_head.unwrap();
        assert_eq!(head.revision, "5d6e7f8a9b0c1d2e3f4a5b6c7d8e9f0a1b2c3d4e");
        assert_eq!(head.short_message, "picked change");
    }

    #[test]
    fn failed_pick_names_the_commit() {
        let executor = ScriptedExecutor::new([
            ExecOutput::mixed(
                "Auto-merging a.txt\nCONFLICT (content): Merge conflict in a.txt\n",
                "error: could not apply 8f2e3de... subject\n",
                1,
            ),
            ExecOutput::out(LOG),
        ]);
        let (repository, monitor) = fixture();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let result = cherry_pick(
            &ctx,
            &["8f2e3de".to_string()],
            CherryPickOperation::Begin,
        )
        .unwrap();
        assert_eq!(result.status, CherryPickStatus::Conflicting);
        assert_eq!(result.failed_commit.as_deref(), Some("8f2e3de"));
    }

    #[test]
    fn abort_skips_the_follow_up() {
        let executor = ScriptedExecutor::new([ExecOutput::out("")]);
        let (repository, monitor) = fixture();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let result = cherry_pick(&ctx, &[], CherryPickOperation::Abort).unwrap();
        assert_eq!(executor.calls(), ["cherry-pick --abort"]);
        assert_eq!(result.status, CherryPickStatus::Aborted);
    }
}
