// SPDX-License-Identifier: GPL-2.0-only

//! Pushing refs to a remote.

use bstr::ByteSlice;

use crate::{
    error::{GitError, Result},
    exec::{ExecOutput, Invocation, Pipeline, Plan, Step},
    model::GitPushResult,
    parse::push as parse_push,
};

use super::CommandContext;

/// Push the given refspecs to `remote`.
///
/// Porcelain mode reports one line per ref regardless of outcome, so a
/// partial rejection exits nonzero while still carrying a full per-ref
/// table; only a push that produced no table at all raises.
pub(crate) fn push(
    ctx: &CommandContext<'_>,
    remote: &str,
    refspecs: &[String],
) -> Result<GitPushResult> {
    let pipeline = Pipeline::new(vec![Step::mixed(
        move |_: &GitPushResult| {
            Ok(Plan::Run(
                Invocation::new("push")
                    .arg("--porcelain")
                    .arg(remote)
                    .args(refspecs.iter().cloned()),
            ))
        },
        move |result: &mut GitPushResult, out: &ExecOutput| {
            *result = parse_push::parse(&out.stdout.to_str_lossy());
            if result.remote_updates.is_empty()
                && result.local_updates.is_empty()
                && out.code != 0
            {
                return Err(GitError::failure(format!("push {remote}"), &out.stderr));
            }
            Ok(())
        },
    )]);
    let mut result = GitPushResult::default();
    ctx.run(&pipeline, &mut result)?;
    Ok(result)
}
