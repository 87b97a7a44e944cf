// SPDX-License-Identifier: GPL-2.0-only

//! Working-tree status.

use std::path::PathBuf;

use bstr::BStr;
use indexmap::IndexMap;

use crate::{
    error::{GitError, Result},
    exec::{Invocation, Pipeline, Plan, Step},
    model::GitStatus,
    parse::status::StatusMerger,
    progress::StatusListener,
    repository::Repository,
};

use super::CommandContext;

fn with_paths(
    invocation: Invocation,
    repository: &Repository,
    paths: &[PathBuf],
) -> Result<Invocation> {
    if paths.is_empty() {
        Ok(invocation)
    } else {
        invocation.file_args(repository, paths.iter().map(PathBuf::as_path))
    }
}

/// Compute per-file status, optionally against a base `revision` instead of
/// HEAD, optionally narrowed to `paths`.
///
/// Four sub-invocations feed one merged map: `status --short` for the
/// index/worktree codes, `diff --raw` for the head/worktree side, an extra
/// `diff --raw <revision>` when a base revision was given, and `ls-files`
/// for tracked-but-clean entries. On a repository without any commit the
/// head diff fails with a bad-revision complaint; that is the normal
/// empty-repository case and every entry counts as added.
pub(crate) fn status(
    ctx: &CommandContext<'_>,
    revision: Option<&str>,
    paths: &[PathBuf],
    listener: Option<&dyn StatusListener>,
) -> Result<IndexMap<String, GitStatus>> {
    let repository = ctx.repository;
    let base_revision = revision.filter(|rev| *rev != "HEAD");

    let pipeline = Pipeline::new(vec![
        Step::output(
            |_: &StatusMerger| {
                Ok(Plan::Run(with_paths(
                    Invocation::new("status").arg("--short"),
                    repository,
                    paths,
                )?))
            },
            |merger: &mut StatusMerger, out: &BStr| {
                merger.feed_status_short(&out.to_string());
                Ok(())
            },
        ),
        Step::output_error(
            |_| {
                Ok(Plan::Run(with_paths(
                    Invocation::new("diff").arg("--raw").arg("HEAD"),
                    repository,
                    paths,
                )?))
            },
            |merger: &mut StatusMerger, out: &BStr| {
                merger.feed_diff_raw(&out.to_string());
                Ok(())
            },
            |merger: &mut StatusMerger, err: &BStr| {
                let text = err.to_string();
                if text.contains("bad revision 'HEAD'")
                    || text.contains("ambiguous argument 'HEAD'")
                {
                    merger.empty_repo = true;
                    Ok(())
                } else {
                    Err(GitError::failure("diff --raw HEAD", err))
                }
            },
        ),
        Step::output_error(
            move |_| match base_revision {
                Some(rev) => Ok(Plan::Run(with_paths(
                    Invocation::new("diff").arg("--raw").arg(rev),
                    repository,
                    paths,
                )?)),
                None => Ok(Plan::Skip),
            },
            |merger: &mut StatusMerger, out: &BStr| {
                merger.feed_diff_raw(&out.to_string());
                Ok(())
            },
            move |_, err: &BStr| {
                let text = err.to_string();
                if text.contains("bad revision") || text.contains("unknown revision") {
                    Err(GitError::MissingObject(
                        base_revision.unwrap_or("HEAD").to_string(),
                    ))
                } else {
                    Err(GitError::failure("diff --raw", err))
                }
            },
        ),
        Step::output(
            |_| {
                Ok(Plan::Run(with_paths(
                    Invocation::new("ls-files"),
                    repository,
                    paths,
                )?))
            },
            |merger: &mut StatusMerger, out: &BStr| {
                merger.feed_ls_files(&out.to_string());
                Ok(())
            },
        ),
    ]);

    let mut merger = StatusMerger::new();
    ctx.run(&pipeline, &mut merger)?;
    let statuses = merger.translate();
    if let Some(listener) = listener {
        for status in statuses.values() {
            listener.notify_status(status);
        }
    }
    Ok(statuses)
}
