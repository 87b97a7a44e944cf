// SPDX-License-Identifier: GPL-2.0-only

//! Resetting HEAD, the index, or individual paths.

use std::path::PathBuf;

use crate::{
    error::{GitError, Result},
    exec::{ExecOutput, Invocation, Pipeline, Plan, Step},
};

use super::CommandContext;

/// How far a whole-tree reset reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetType {
    Soft,
    Mixed,
    Hard,
}

impl ResetType {
    fn flag(self) -> &'static str {
        match self {
            ResetType::Soft => "--soft",
            ResetType::Mixed => "--mixed",
            ResetType::Hard => "--hard",
        }
    }
}

/// Reset the current branch to `revision`.
///
/// `reset --mixed` exits 1 while listing the files left unstaged on stdout;
/// with an empty stderr that is a successful outcome, which is why this
/// command owns its output dispatch instead of using the clean-exit rule.
pub(crate) fn reset(
    ctx: &CommandContext<'_>,
    revision: &str,
    reset_type: ResetType,
) -> Result<()> {
    let pipeline = Pipeline::new(vec![Step::mixed(
        |_: &()| {
            Ok(Plan::Run(
                Invocation::new("reset").arg(reset_type.flag()).arg(revision),
            ))
        },
        move |_: &mut (), out: &ExecOutput| {
            let benign_exit = out.code == 0 || (out.code == 1 && reset_type == ResetType::Mixed);
            if out.stderr.is_empty() && benign_exit {
                Ok(())
            } else {
                Err(GitError::failure(
                    format!("reset {} {revision}", reset_type.flag()),
                    &out.stderr,
                ))
            }
        },
    )]);
    ctx.run(&pipeline, &mut ())
}

/// Reset only the given paths to their state in `revision`.
pub(crate) fn reset_paths(
    ctx: &CommandContext<'_>,
    revision: &str,
    paths: &[PathBuf],
) -> Result<()> {
    let repository = ctx.repository;
    let pipeline = Pipeline::new(vec![Step::mixed(
        |_: &()| {
            Ok(Plan::Run(Invocation::new("reset").arg(revision).file_args(
                repository,
                paths.iter().map(PathBuf::as_path),
            )?))
        },
        move |_: &mut (), out: &ExecOutput| {
            // The pathspec form also reports unstaged leftovers with exit 1.
            if out.stderr.is_empty() && (out.code == 0 || out.code == 1) {
                Ok(())
            } else {
                Err(GitError::failure(
                    format!("reset {revision}"),
                    &out.stderr,
                ))
            }
        },
    )]);
    ctx.run(&pipeline, &mut ())
}
