// SPDX-License-Identifier: GPL-2.0-only

//! Branch creation, deletion, listing, and upstream configuration.

use bstr::BStr;
use indexmap::IndexMap;
use tracing::warn;

use crate::{
    error::{GitError, Result},
    exec::{Invocation, Pipeline, Plan, Step},
    model::GitBranch,
    parse::branch as parse_branch,
};

use super::CommandContext;

#[derive(Default)]
struct CreateAcc {
    retry_without_tracking: bool,
    branches: IndexMap<String, GitBranch>,
}

/// Create a branch at `revision` and return it as the subsequent listing
/// reports it.
///
/// Tracking is attempted first; when the start point is not a branch git
/// refuses the tracking setup and the creation is retried plain. A branch
/// missing from the re-listing is tolerated with a warning, since the
/// creation itself succeeded.
pub(crate) fn create_branch(
    ctx: &CommandContext<'_>,
    name: &str,
    revision: &str,
) -> Result<GitBranch> {
    let pipeline = Pipeline::new(vec![
        Step::output_error(
            |_: &CreateAcc| {
                Ok(Plan::Run(
                    Invocation::new("branch").arg("--track").arg(name).arg(revision),
                ))
            },
            |_, _| Ok(()),
            |acc: &mut CreateAcc, err: &BStr| {
                let text = err.to_string();
                if text.contains("is not a branch") || text.contains("not a valid branch point") {
                    acc.retry_without_tracking = true;
                    Ok(())
                } else {
                    Err(GitError::failure(format!("branch --track {name} {revision}"), err))
                }
            },
        ),
        Step::output(
            |acc: &CreateAcc| {
                if acc.retry_without_tracking {
                    Ok(Plan::Run(Invocation::new("branch").arg(name).arg(revision)))
                } else {
                    Ok(Plan::Skip)
                }
            },
            |_, _| Ok(()),
        ),
        Step::output(
            |_| Ok(Plan::Run(Invocation::new("branch").arg("-vv").arg("-a"))),
            |acc: &mut CreateAcc, out: &BStr| {
                acc.branches = parse_branch::parse_listing(&out.to_string());
                Ok(())
            },
        ),
    ]);
    let mut acc = CreateAcc::default();
    ctx.run(&pipeline, &mut acc)?;
    Ok(acc.branches.get(name).cloned().unwrap_or_else(|| {
        warn!(name, "created branch missing from listing");
        ctx.monitor
            .notify_warning(&format!("created branch `{name}` missing from listing"));
        GitBranch {
            name: name.to_string(),
            remote: false,
            active: false,
            id: String::new(),
            tracked: None,
        }
    }))
}

/// Delete a local branch.
///
/// A branch that does not exist is a no-op. Refusals for an unmerged or
/// currently checked-out branch surface as their typed errors.
pub(crate) fn delete_branch(ctx: &CommandContext<'_>, name: &str, force: bool) -> Result<()> {
    let pipeline = Pipeline::new(vec![Step::output_error(
        move |_: &()| {
            Ok(Plan::Run(
                Invocation::new("branch")
                    .arg(if force { "-D" } else { "-d" })
                    .arg(name),
            ))
        },
        |_, _| Ok(()),
        move |_, err: &BStr| {
            let text = err.to_string();
            if text.contains("not found") {
                Ok(())
            } else if text.contains("not fully merged") {
                Err(GitError::BranchNotFullyMerged(name.to_string()))
            } else if text.contains("checked out")
                || text.contains("Cannot delete")
                || text.contains("cannot delete")
            {
                Err(GitError::CannotDeleteCurrentBranch(name.to_string()))
            } else {
                Err(GitError::failure(format!("branch -d {name}"), err))
            }
        },
    )]);
    ctx.run(&pipeline, &mut ())
}

/// List branches; `all` includes remote-tracking branches.
pub(crate) fn list_branches(
    ctx: &CommandContext<'_>,
    all: bool,
) -> Result<IndexMap<String, GitBranch>> {
    let pipeline = Pipeline::new(vec![Step::output(
        move |_: &IndexMap<String, GitBranch>| {
            Ok(Plan::Run(
                Invocation::new("branch").arg("-vv").arg_if(all, "-a"),
            ))
        },
        |branches: &mut IndexMap<String, GitBranch>, out: &BStr| {
            *branches = parse_branch::parse_listing(&out.to_string());
            Ok(())
        },
    )]);
    let mut branches = IndexMap::new();
    ctx.run(&pipeline, &mut branches)?;
    Ok(branches)
}

/// Point `branch` at the given upstream and return its refreshed listing
/// entry.
pub(crate) fn set_upstream(
    ctx: &CommandContext<'_>,
    branch: &str,
    upstream: &str,
) -> Result<GitBranch> {
    let pipeline = Pipeline::new(vec![
        Step::output(
            |_: &IndexMap<String, GitBranch>| {
                Ok(Plan::Run(
                    Invocation::new("branch")
                        .arg(format!("--set-upstream-to={upstream}"))
                        .arg(branch),
                ))
            },
            |_, _| Ok(()),
        ),
        Step::output(
            |_| Ok(Plan::Run(Invocation::new("branch").arg("-vv").arg("-a"))),
            |branches: &mut IndexMap<String, GitBranch>, out: &BStr| {
                *branches = parse_branch::parse_listing(&out.to_string());
                Ok(())
            },
        ),
    ]);
    let mut branches = IndexMap::new();
    ctx.run(&pipeline, &mut branches)?;
    branches
        .get(branch)
        .cloned()
        .ok_or_else(|| GitError::MissingObject(branch.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::ScriptedExecutor;
    use crate::exec::ExecOutput;
    use crate::progress::NullProgressMonitor;
    use crate::repository::Repository;

    const LISTING: &str = "\
* master            1a2b3c4 subject
  feature           5d6e7f8 [origin/feature] subject
  remotes/origin/feature 5d6e7f8 subject
";

    fn fixture(executor: &ScriptedExecutor) -> (Repository, NullProgressMonitor) {
        let _ = executor;
        (Repository::new("/work/repo"), NullProgressMonitor::new())
    }

    #[test]
    fn create_with_tracking() {
        let executor = ScriptedExecutor::new([
            ExecOutput::out(""),
            ExecOutput::out(LISTING),
        ]);
        let (repository, monitor) = fixture(&executor);
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let branch = create_branch(&ctx, "feature", "origin/feature").unwrap();
        assert_eq!(
            executor.calls(),
            ["branch --track feature origin/feature", "branch -vv -a"]
        );
        assert_eq!(branch.name, "feature");
        assert_eq!(branch.tracked.as_deref(), Some("origin/feature"));
    }

    #[test]
    fn create_retries_without_tracking() {
        let executor = ScriptedExecutor::new([
            ExecOutput::err(
                "fatal: cannot set up tracking information; starting point '1a2b3c4' is not a branch.\n",
                128,
            ),
            ExecOutput::out(""),
            ExecOutput::out(LISTING),
        ]);
        let (repository, monitor) = fixture(&executor);
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let branch = create_branch(&ctx, "feature", "1a2b3c4").unwrap();
        assert_eq!(
            executor.calls(),
            [
                "branch --track feature 1a2b3c4",
                "branch feature 1a2b3c4",
                "branch -vv -a"
            ]
        );
        assert_eq!(branch.id, "5d6e7f8");
    }

    #[test]
    fn create_tolerates_missing_listing_entry() {
        let executor = ScriptedExecutor::new([
            ExecOutput::out(""),
            ExecOutput::out("* master 1a2b3c4 subject\n"),
        ]);
        let (repository, monitor) = fixture(&executor);
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let branch = create_branch(&ctx, "ghost", "HEAD").unwrap();
        assert_eq!(branch.name, "ghost");
        assert!(branch.id.is_empty());
    }

    #[test]
    fn delete_missing_branch_is_benign() {
        let executor =
            ScriptedExecutor::new([ExecOutput::err("error: branch 'gone' not found.\n", 1)]);
        let (repository, monitor) = fixture(&executor);
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        delete_branch(&ctx, "gone", false).unwrap();
        assert_eq!(executor.calls(), ["branch -d gone"]);
    }

    #[test]
    fn delete_unmerged_branch_is_typed() {
        let executor = ScriptedExecutor::new([ExecOutput::err(
            "error: the branch 'feature' is not fully merged.\n",
            1,
        )]);
        let (repository, monitor) = fixture(&executor);
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        assert!(matches!(
            delete_branch(&ctx, "feature", false),
            Err(GitError::BranchNotFullyMerged(name)) if name == "feature"
        ));
    }

    #[test]
    fn delete_checked_out_branch_is_typed() {
        let executor = ScriptedExecutor::new([ExecOutput::err(
            "error: cannot delete branch 'master' used by worktree at '/work/repo'\n",
            1,
        )]);
        let (repository, monitor) = fixture(&executor);
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        assert!(matches!(
            delete_branch(&ctx, "master", true),
            Err(GitError::CannotDeleteCurrentBranch(_))
        ));
        assert_eq!(executor.calls(), ["branch -D master"]);
    }

    #[test]
    fn list_local_only() {
        let executor = ScriptedExecutor::new([ExecOutput::out(LISTING)]);
        let (repository, monitor) = fixture(&executor);
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let branches = list_branches(&ctx, false).unwrap();
        assert_eq!(executor.calls(), ["branch -vv"]);
        assert!(branches.contains_key("master"));
    }

    #[test]
    fn set_upstream_refreshes_the_listing() {
        let executor = ScriptedExecutor::new([
            ExecOutput::out("branch 'feature' set up to track 'origin/feature'.\n"),
            ExecOutput::out(LISTING),
        ]);
        let (repository, monitor) = fixture(&executor);
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let branch = set_upstream(&ctx, "feature", "origin/feature").unwrap();
        assert_eq!(
            executor.calls(),
            [
                "branch --set-upstream-to=origin/feature feature",
                "branch -vv -a"
            ]
        );
        assert_eq!(branch.tracked.as_deref(), Some("origin/feature"));
    }
}
