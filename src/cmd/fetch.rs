// SPDX-License-Identifier: GPL-2.0-only

//! Fetching from a remote.

use bstr::{BStr, ByteSlice};

use crate::{
    error::{GitError, Result},
    exec::{ExecOutput, Invocation, Pipeline, Plan, Step},
    model::{TransportUpdates, UpdateStatus},
    parse::{fetch as parse_fetch, shorten_ref},
};

use super::CommandContext;

/// Fetch the given refspecs from `remote`.
///
/// Fetch prints its ref table with no ids for brand-new refs; when any
/// update came through without a new id, one follow-up `show-ref` resolves
/// them from the local ref store.
pub(crate) fn fetch(
    ctx: &CommandContext<'_>,
    remote: &str,
    refspecs: &[String],
) -> Result<TransportUpdates> {
    let pipeline = Pipeline::new(vec![
        Step::mixed(
            move |_: &TransportUpdates| {
                Ok(Plan::Run(
                    Invocation::new("fetch")
                        .arg("-v")
                        .arg(remote)
                        .args(refspecs.iter().cloned()),
                ))
            },
            move |updates: &mut TransportUpdates, out: &ExecOutput| {
                *updates = parse_fetch::parse(&out.stderr.to_str_lossy());
                if updates.is_empty() && out.code != 0 {
                    return Err(GitError::failure(format!("fetch {remote}"), &out.stderr));
                }
                Ok(())
            },
        ),
        Step::output(
            |updates: &TransportUpdates| {
                let unresolved = updates
                    .values()
                    .any(|u| u.status == UpdateStatus::Ok && u.new_id.is_none());
                if unresolved {
                    Ok(Plan::Run(Invocation::new("show-ref")))
                } else {
                    Ok(Plan::Skip)
                }
            },
            |updates: &mut TransportUpdates, out: &BStr| {
                for line in out.to_string().lines() {
                    let Some((id, refname)) = line.split_once(' ') else {
                        continue;
                    };
                    let short = shorten_ref(refname);
                    if let Some(update) = updates.get_mut(short) {
                        if update.new_id.is_none() {
                            update.new_id = Some(id.to_string());
                        }
                    }
                }
                Ok(())
            },
        ),
    ]);
    let mut updates = TransportUpdates::new();
    ctx.run(&pipeline, &mut updates)?;
    Ok(updates)
}
