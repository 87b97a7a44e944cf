// SPDX-License-Identifier: GPL-2.0-only

//! Tag creation, deletion, and listing.

use bstr::BStr;
use indexmap::IndexMap;

use crate::{
    error::{GitError, Result},
    exec::{ExecOutput, Invocation, Pipeline, Plan, Step},
    model::GitTag,
    parse::tag as parse_tag,
};

use super::CommandContext;

#[derive(Default)]
struct CreateAcc {
    tag: Option<GitTag>,
}

/// Create a tag at `revision` and return it as the ref store reports it,
/// so the caller sees the tag object id and target object id that actually
/// got created.
pub(crate) fn create_tag(
    ctx: &CommandContext<'_>,
    name: &str,
    revision: &str,
    message: Option<&str>,
    signed: bool,
    force: bool,
) -> Result<GitTag> {
    let pipeline = Pipeline::new(vec![
        Step::output(
            move |_: &CreateAcc| {
                let mut invocation = Invocation::new("tag").arg_if(force, "-f");
                if signed {
                    invocation = invocation.arg("-s");
                }
                if let Some(message) = message {
                    invocation = invocation.arg("-m").arg(message);
                }
                Ok(Plan::Run(invocation.arg(name).arg(revision)))
            },
            |_, _| Ok(()),
        ),
        Step::output(
            |_| Ok(Plan::Run(Invocation::new("show-ref").arg("--tags").arg("-d"))),
            |acc: &mut CreateAcc, out: &BStr| {
                acc.tag = parse_tag::parse_show_ref(&out.to_string()).swap_remove(name);
                Ok(())
            },
        ),
        Step::output(
            |acc: &CreateAcc| match &acc.tag {
                Some(tag) => Ok(Plan::Run(
                    Invocation::new("show").arg("--raw").arg(tag.name.clone()),
                )),
                None => Ok(Plan::Skip),
            },
            |acc: &mut CreateAcc, out: &BStr| {
                if let Some(tag) = acc.tag.as_mut() {
                    parse_tag::parse_show(tag, &out.to_string());
                }
                Ok(())
            },
        ),
    ]);
    let mut acc = CreateAcc::default();
    ctx.run(&pipeline, &mut acc)?;
    acc.tag.ok_or_else(|| GitError::MissingObject(name.to_string()))
}

/// Delete a tag. A missing tag is the typed missing-object error.
pub(crate) fn delete_tag(ctx: &CommandContext<'_>, name: &str) -> Result<()> {
    let pipeline = Pipeline::new(vec![Step::output_error(
        move |_: &()| Ok(Plan::Run(Invocation::new("tag").arg("-d").arg(name))),
        |_, _| Ok(()),
        move |_, err: &BStr| {
            if err.to_string().contains("not found") {
                Err(GitError::MissingObject(name.to_string()))
            } else {
                Err(GitError::failure(format!("tag -d {name}"), err))
            }
        },
    )]);
    ctx.run(&pipeline, &mut ())
}

/// List all tags.
///
/// When the listing holds exactly one tag its annotation is resolved with
/// a follow-up `show`; larger listings stay at the ref level to keep the
/// invocation count bounded.
pub(crate) fn list_tags(ctx: &CommandContext<'_>) -> Result<IndexMap<String, GitTag>> {
    let pipeline = Pipeline::new(vec![
        Step::mixed(
            |_: &IndexMap<String, GitTag>| {
                Ok(Plan::Run(Invocation::new("show-ref").arg("--tags").arg("-d")))
            },
            |tags: &mut IndexMap<String, GitTag>, out: &ExecOutput| {
                // `show-ref` exits 1 with no output when there are no tags.
                if out.code != 0 && !(out.code == 1 && out.stderr.is_empty()) {
                    return Err(GitError::failure("show-ref --tags -d", &out.stderr));
                }
                *tags = parse_tag::parse_show_ref(&out.stdout_bstr().to_string());
                Ok(())
            },
        ),
        Step::output(
            |tags: &IndexMap<String, GitTag>| {
                if tags.len() == 1 {
                    let name = tags.keys().next().cloned().unwrap_or_default();
                    Ok(Plan::Run(Invocation::new("show").arg("--raw").arg(name)))
                } else {
                    Ok(Plan::Skip)
                }
            },
            |tags: &mut IndexMap<String, GitTag>, out: &BStr| {
                if let Some(tag) = tags.values_mut().next() {
                    parse_tag::parse_show(tag, &out.to_string());
                }
                Ok(())
            },
        ),
    ]);
    let mut tags = IndexMap::new();
    ctx.run(&pipeline, &mut tags)?;
    Ok(tags)
}
