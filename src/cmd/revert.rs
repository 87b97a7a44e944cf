// SPDX-License-Identifier: GPL-2.0-only

//! Reverting a commit.

use bstr::ByteSlice;

use crate::{
    error::Result,
    exec::{ExecOutput, Invocation, Pipeline, Plan, Step},
    model::GitRevertResult,
    parse::revert as parse_revert,
};

use super::CommandContext;

/// Revert `revision` on the current branch.
///
/// With `commit` false the inverse changes are only applied to the working
/// tree and index (`--no-commit`); otherwise the revert commit is created
/// with git's default message, never an editor.
pub(crate) fn revert(
    ctx: &CommandContext<'_>,
    revision: &str,
    commit: bool,
) -> Result<GitRevertResult> {
    let pipeline = Pipeline::new(vec![Step::mixed(
        move |_: &GitRevertResult| {
            let invocation = Invocation::new("revert");
            let invocation = if commit {
                invocation.arg("--no-edit")
            } else {
                invocation.arg("--no-commit")
            };
            Ok(Plan::Run(invocation.arg(revision)))
        },
        |result: &mut GitRevertResult, out: &ExecOutput| {
            *result = parse_revert::parse(
                &out.stdout.to_str_lossy(),
                &out.stderr.to_str_lossy(),
            );
            Ok(())
        },
    )]);
    let mut result = GitRevertResult::default();
    ctx.run(&pipeline, &mut result)?;
    Ok(result)
}
