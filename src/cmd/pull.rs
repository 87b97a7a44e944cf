// SPDX-License-Identifier: GPL-2.0-only

//! Pull: fetch from a remote, then merge `FETCH_HEAD`.

use crate::{error::Result, model::GitPullResult};

use super::{
    fetch,
    merge::{self, FastForwardOption},
    CommandContext,
};

/// Fetch the given refspecs from `remote` and merge what arrived.
///
/// Both halves are the regular fetch and merge pipelines; the merge's
/// expected failures stay in the merge result, so a conflicting pull still
/// returns the fetch updates.
pub(crate) fn pull(
    ctx: &CommandContext<'_>,
    remote: &str,
    refspecs: &[String],
    ff_option: FastForwardOption,
) -> Result<GitPullResult> {
    let fetch_result = fetch::fetch(ctx, remote, refspecs)?;
    let merge_result = merge::merge(ctx, "FETCH_HEAD", ff_option)?;
    Ok(GitPullResult {
        fetch_result,
        merge_result,
    })
}
