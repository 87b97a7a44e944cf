// SPDX-License-Identifier: GPL-2.0-only

//! Line annotation.

use std::path::Path;

use bstr::BStr;

use crate::{
    error::Result,
    exec::{Invocation, Pipeline, Plan, Step},
    model::GitBlameResult,
};

use super::CommandContext;

#[derive(Default)]
struct BlameAcc {
    result: Option<GitBlameResult>,
}

/// Annotate `path`, optionally at `revision` instead of the working tree.
///
/// Any stderr means the annotation cannot be trusted (the file may be
/// unmerged or untracked at that revision); the result is withheld rather
/// than returned partially filled.
pub(crate) fn blame(
    ctx: &CommandContext<'_>,
    path: &Path,
    revision: Option<&str>,
) -> Result<Option<GitBlameResult>> {
    let repository = ctx.repository;
    let relative = repository.relativize(path)?;
    let handler_relative = relative.clone();
    let pipeline = Pipeline::new(vec![Step::output_error(
        move |_: &BlameAcc| {
            let mut invocation = Invocation::new("blame").arg("--porcelain");
            if let Some(revision) = revision {
                invocation = invocation.arg(revision);
            }
            Ok(Plan::Run(invocation.arg("--").arg(relative.clone())))
        },
        move |acc: &mut BlameAcc, out: &BStr| {
            acc.result = Some(crate::parse::blame::parse_porcelain(
                &handler_relative,
                &out.to_string(),
            ));
            Ok(())
        },
        |acc: &mut BlameAcc, _err: &BStr| {
            acc.result = None;
            Ok(())
        },
    )]);
    let mut acc = BlameAcc::default();
    ctx.run(&pipeline, &mut acc)?;
    Ok(acc.result)
}
