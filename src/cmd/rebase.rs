// SPDX-License-Identifier: GPL-2.0-only

//! Rebasing the current branch, including sequencer continuation.

use bstr::{BStr, ByteSlice};

use crate::{
    error::Result,
    exec::{ExecOutput, Invocation, Pipeline, Plan, Step},
    model::{GitRebaseResult, RebaseStatus},
};

use super::CommandContext;

/// Which phase of a (possibly interrupted) rebase to drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebaseOperation {
    Begin,
    Continue,
    Skip,
    Abort,
}

impl RebaseOperation {
    fn flag(self) -> Option<&'static str> {
        match self {
            RebaseOperation::Begin => None,
            RebaseOperation::Continue => Some("--continue"),
            RebaseOperation::Skip => Some("--skip"),
            RebaseOperation::Abort => Some("--abort"),
        }
    }
}

/// Rebase onto `upstream`, or drive the sequencer of an interrupted rebase.
///
/// A stopped rebase reports the commit it halted on from the sequencer
/// metadata in the git directory; the head is refreshed with a follow-up
/// `rev-parse` whenever a head exists.
pub(crate) fn rebase(
    ctx: &CommandContext<'_>,
    upstream: Option<&str>,
    operation: RebaseOperation,
) -> Result<GitRebaseResult> {
    let repository = ctx.repository;
    let pipeline = Pipeline::new(vec![
        Step::mixed(
            move |_: &GitRebaseResult| {
                let mut invocation = Invocation::new("rebase");
                if let Some(flag) = operation.flag() {
                    invocation = invocation.arg(flag);
                } else if let Some(upstream) = upstream {
                    invocation = invocation.arg(upstream);
                }
                Ok(Plan::Run(invocation))
            },
            move |result: &mut GitRebaseResult, out: &ExecOutput| {
                *result = crate::parse::rebase::parse(
                    &out.stdout.to_str_lossy(),
                    &out.stderr.to_str_lossy(),
                );
                if operation == RebaseOperation::Abort && out.code == 0 {
                    result.status = RebaseStatus::Aborted;
                }
                if result.status == RebaseStatus::Stopped {
                    result.current_commit = repository.rebase_original_commit();
                }
                Ok(())
            },
        ),
        Step::output_error(
            |_| Ok(Plan::Run(Invocation::new("rev-parse").arg("HEAD"))),
            |result: &mut GitRebaseResult, out: &BStr| {
                let head = out.to_string().trim().to_string();
                if !head.is_empty() {
                    result.current_head = Some(head);
                }
                Ok(())
            },
            // An unborn HEAD has nothing to report.
            |_, _| Ok(()),
        ),
    ]);
    let mut result = GitRebaseResult::default();
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
    fn successful_rebase() {
        let executor = ScriptedExecutor::new([
            ExecOutput::err("Successfully rebased and updated refs/heads/feature.\n", 0),
            ExecOutput::out("8f2e3defadd2b7a38e04a0ad00a01c40a44ac802\n"),
        ]);
        let (repository, monitor) = fixture();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let result = rebase(&ctx, Some("master"), RebaseOperation::Begin).unwrap();
        assert_eq!(executor.calls(), ["rebase master", "rev-parse HEAD"]);
        assert_eq!(result.status, RebaseStatus::Ok);
        assert_eq!(
            result.current_head.as_deref(),
            Some("8f2e3defadd2b7a38e04a0ad00a01c40a44ac802")
        );
    }

    #[test]
    fn stopped_rebase_reads_sequencer_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join(".git").join("rebase-merge");
        std::fs::create_dir_all(&state).unwrap();
        std::fs::write(
            state.join("original-commit"),
            "16e930c287a1b1b24bb2c9f4e6b49c1a8e15dc3f\n",
        )
        .unwrap();

        let executor = ScriptedExecutor::new([
            ExecOutput::mixed(
                "CONFLICT (content): Merge conflict in a.txt\n",
                "error: could not apply 16e930c... subject\n",
                1,
            ),
            ExecOutput::out("1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b\n"),
        ]);
        let repository = Repository::new(dir.path());
        let monitor = NullProgressMonitor::new();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let result = rebase(&ctx, Some("master"), RebaseOperation::Begin).unwrap();
        assert_eq!(result.status, RebaseStatus::Stopped);
        assert_eq!(result.conflicts, ["a.txt"]);
        assert_eq!(
            result.current_commit.as_deref(),
            Some("16e930c287a1b1b24bb2c9f4e6b49c1a8e15dc3f")
        );
    }

    #[test]
    fn abort_maps_clean_exit_to_aborted() {
        let executor = ScriptedExecutor::new([
            ExecOutput::out(""),
            ExecOutput::out("1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b\n"),
        ]);
        let (repository, monitor) = fixture();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let result = rebase(&ctx, None, RebaseOperation::Abort).unwrap();
        assert_eq!(executor.calls(), ["rebase --abort", "rev-parse HEAD"]);
        assert_eq!(result.status, RebaseStatus::Aborted);
    }
}
