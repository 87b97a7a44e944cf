// SPDX-License-Identifier: GPL-2.0-only

//! Moving and copying tracked files.
//!
//! Both operations validate their path pair before any process runs; a
//! failed validation reports through `preparations_failed` and raises the
//! typed error. The `after` flavor of rename records a move that already
//! happened on disk by staging the target and dropping the source from the
//! index. A plain rename whose `git mv` is refused (untracked source) falls
//! back to a filesystem move followed by staging the target.

use std::{
    fs,
    path::{Path, PathBuf},
};

use bstr::BStr;

use crate::{
    error::{GitError, Result},
    exec::{Invocation, Pipeline, Plan, Step},
    parse::verbose,
    progress::FileListener,
};

use super::CommandContext;

/// Accumulator for the plain rename pipeline; `fell_back` records that
/// `git mv` refused and the move happened on the filesystem instead.
#[derive(Default)]
struct MoveOutcome {
    touched: Vec<String>,
    fell_back: bool,
}

/// Rename or move `source` to `target`.
///
/// With `after` the filesystem move already happened and only the index is
/// brought up to date. Returns the repository-relative paths that changed.
pub(crate) fn rename(
    ctx: &CommandContext<'_>,
    source: &Path,
    target: &Path,
    after: bool,
    listener: Option<&dyn FileListener>,
) -> Result<Vec<String>> {
    let repository = ctx.repository;
    validate_pair(ctx, source, target, after)?;

    let mut touched = Vec::new();
    if after {
        let pipeline = Pipeline::new(vec![
            Step::output_error(
                |_: &Vec<String>| {
                    Ok(Plan::Run(
                        Invocation::new("rm")
                            .arg("-r")
                            .arg("--cached")
                            .arg("-v")
                            .file_args(repository, [source])?,
                    ))
                },
                |touched: &mut Vec<String>, out: &BStr| {
                    for relative in verbose::touched_files(&out.to_string()) {
                        if let Some(listener) = listener {
                            listener.notify_file(&repository.resolve(&relative), &relative);
                        }
                        touched.push(relative);
                    }
                    Ok(())
                },
                |_, err: &BStr| {
                    // An untracked source has nothing to drop from the index.
                    if err.to_string().contains("did not match") {
                        Ok(())
                    } else {
                        Err(GitError::failure("rm", err))
                    }
                },
            ),
            Step::output(
                |_: &Vec<String>| {
                    Ok(Plan::Run(
                        Invocation::new("add").arg("-v").file_args(repository, [target])?,
                    ))
                },
                |touched: &mut Vec<String>, out: &BStr| {
                    for relative in verbose::touched_files(&out.to_string()) {
                        if let Some(listener) = listener {
                            listener.notify_file(&repository.resolve(&relative), &relative);
                        }
                        touched.push(relative);
                    }
                    Ok(())
                },
            ),
        ]);
        ctx.run(&pipeline, &mut touched)?;
    } else {
        let pipeline = Pipeline::new(vec![
            Step::output_error(
                |_: &MoveOutcome| {
                    Ok(Plan::Run(
                        Invocation::new("mv")
                            .arg("-v")
                            .file_arg(repository, source)?
                            .file_arg(repository, target)?,
                    ))
                },
                |outcome: &mut MoveOutcome, out: &BStr| {
                    for (from, to) in verbose::renamed_pairs(&out.to_string()) {
                        if let Some(listener) = listener {
                            listener.notify_file(&repository.resolve(&from), &from);
                            listener.notify_file(&repository.resolve(&to), &to);
                        }
                        outcome.touched.push(from);
                        outcome.touched.push(to);
                    }
                    Ok(())
                },
                // git mv refuses sources it does not track; move on the
                // filesystem and let the next step stage the target.
                |outcome: &mut MoveOutcome, _err: &BStr| {
                    fs::rename(source, target)?;
                    let relative = repository.relativize(source)?;
                    if let Some(listener) = listener {
                        listener.notify_file(source, &relative);
                    }
                    outcome.touched.push(relative);
                    outcome.fell_back = true;
                    Ok(())
                },
            ),
            Step::output(
                |outcome: &MoveOutcome| {
                    if outcome.fell_back {
                        Ok(Plan::Run(
                            Invocation::new("add")
                                .arg("-v")
                                .file_args(repository, [target])?,
                        ))
                    } else {
                        Ok(Plan::Done)
                    }
                },
                |outcome: &mut MoveOutcome, out: &BStr| {
                    for relative in verbose::touched_files(&out.to_string()) {
                        if let Some(listener) = listener {
                            listener.notify_file(&repository.resolve(&relative), &relative);
                        }
                        outcome.touched.push(relative);
                    }
                    Ok(())
                },
            ),
        ]);
        let mut outcome = MoveOutcome::default();
        ctx.run(&pipeline, &mut outcome)?;
        touched = outcome.touched;
    }
    Ok(touched)
}

/// Copy `source` to `target` on disk and stage the target.
///
/// Git has no copy subcommand; the filesystem copy happens here and only
/// the staging runs through git.
pub(crate) fn copy(
    ctx: &CommandContext<'_>,
    source: &Path,
    target: &Path,
    listener: Option<&dyn FileListener>,
) -> Result<Vec<String>> {
    let repository = ctx.repository;
    validate_pair(ctx, source, target, false)?;
    copy_tree(source, target)?;

    let pipeline = Pipeline::new(vec![Step::output(
        |_: &Vec<String>| {
            Ok(Plan::Run(
                Invocation::new("add").arg("-v").file_args(repository, [target])?,
            ))
        },
        |touched: &mut Vec<String>, out: &BStr| {
            for relative in verbose::touched_files(&out.to_string()) {
                if let Some(listener) = listener {
                    listener.notify_file(&repository.resolve(&relative), &relative);
                }
                touched.push(relative);
            }
            Ok(())
        },
    )]);
    let mut touched = Vec::new();
    ctx.run(&pipeline, &mut touched)?;
    Ok(touched)
}

fn validate_pair(
    ctx: &CommandContext<'_>,
    source: &Path,
    target: &Path,
    after: bool,
) -> Result<()> {
    let check = || -> Result<()> {
        let relative_source = ctx.repository.relativize(source)?;
        ctx.repository.relativize(target)?;
        if relative_source.is_empty() {
            return Err(GitError::CannotMoveWorkTreeRoot);
        }
        if target.starts_with(source) {
            return Err(GitError::TargetUnderSource(
                source.to_path_buf(),
                target.to_path_buf(),
            ));
        }
        if after {
            if !target.exists() {
                return Err(GitError::TargetDoesNotExist(target.to_path_buf()));
            }
        } else {
            if !source.exists() {
                return Err(GitError::SourceDoesNotExist(source.to_path_buf()));
            }
            if target.exists() {
                return Err(GitError::TargetExists(target.to_path_buf()));
            }
        }
        Ok(())
    };
    check().map_err(|err| {
        ctx.monitor.preparations_failed(&err.to_string());
        err
    })
}

fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    if source.is_dir() {
        fs::create_dir_all(target)?;
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            copy_tree(&entry.path(), &target.join(entry.file_name()))?;
        }
    } else {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, target)?;
    }
    Ok(())
}
