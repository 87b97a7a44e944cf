// SPDX-License-Identifier: GPL-2.0-only

//! Removing files from the index, and optionally the working tree.

use std::path::PathBuf;

use bstr::BStr;

use crate::{
    error::Result,
    exec::{Invocation, Pipeline, Plan, Step},
    parse::verbose,
    progress::FileListener,
};

use super::CommandContext;

/// Remove the given files.
///
/// `cached` leaves the working tree alone and only drops the index entries;
/// without it git deletes the files as well. Returns the repository-relative
/// paths from the verbose `rm '<path>'` echoes.
pub(crate) fn remove(
    ctx: &CommandContext<'_>,
    paths: &[PathBuf],
    cached: bool,
    listener: Option<&dyn FileListener>,
) -> Result<Vec<String>> {
    let repository = ctx.repository;
    let pipeline = Pipeline::new(vec![Step::output(
        move |_: &Vec<String>| {
            Ok(Plan::Run(
                Invocation::new("rm")
                    .arg("-r")
                    .arg_if(cached, "--cached")
                    .arg("-v")
                    .file_args(repository, paths.iter().map(PathBuf::as_path))?,
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
