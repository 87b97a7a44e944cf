// SPDX-License-Identifier: GPL-2.0-only

//! Per-ref results from `push --porcelain`.

use crate::model::{GitPushResult, GitTransportUpdate, RefType, UpdateStatus};

use super::shorten_ref;

/// Parse porcelain push output.
///
/// Each ref line reads `<flag>\t<from>:<to>\t<summary>`; updates of
/// `refs/remotes/` targets are the local tracking refs that followed the
/// push and sort into `local_updates`, everything else into
/// `remote_updates`.
pub(crate) fn parse(text: &str) -> GitPushResult {
    let mut result = GitPushResult::default();
    for line in text.lines() {
        let mut fields = line.split('\t');
        let (Some(flag_field), Some(refspec), Some(summary)) =
            (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        let status = match flag_field.chars().next() {
            Some(' ' | '+' | '*' | '-') => UpdateStatus::Ok,
            Some('!') => UpdateStatus::Rejected,
            Some('=') => UpdateStatus::UpToDate,
            _ => continue,
        };
        let Some((from, to)) = refspec.split_once(':') else {
            continue;
        };
        let (old_id, new_id, operation) = split_summary(summary);
        let update = GitTransportUpdate {
            ref_type: RefType::from_ref_name(to),
            local_name: (!from.is_empty()).then(|| shorten_ref(from).to_string()),
            remote_name: Some(shorten_ref(to).to_string()),
            old_id,
            new_id,
            operation,
            status,
        };
        let key = shorten_ref(to).to_string();
        if to.starts_with("refs/remotes/") {
            result.local_updates.insert(key, update);
        } else {
            result.remote_updates.insert(key, update);
        }
    }
    result
}

/// Split a porcelain summary field into ids and an operation tag.
///
/// Ranges read `old..new` (or `old...new` for forced updates); everything
/// else is a bracketed tag such as `[new branch]` without ids.
pub(crate) fn split_summary(summary: &str) -> (Option<String>, Option<String>, String) {
    let summary = summary.trim();
    if let Some(inner) = summary.strip_prefix('[') {
        let operation = inner.split(']').next().unwrap_or(inner).to_string();
        return (None, None, operation);
    }
    let range = summary.split_whitespace().next().unwrap_or(summary);
    for separator in ["...", ".."] {
        if let Some((old, new)) = range.split_once(separator) {
            return (
                Some(old.to_string()),
                Some(new.to_string()),
                range.to_string(),
            );
        }
    }
    (None, None, summary.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORCELAIN: &str = "\
To https://example.com/repo.git
 \trefs/heads/master:refs/heads/master\t1a2b3c4..5d6e7f8
*\trefs/heads/feature:refs/heads/feature\t[new branch]
=\trefs/heads/stable:refs/heads/stable\t[up to date]
!\trefs/heads/dev:refs/heads/dev\t[rejected] (non-fast-forward)
-\t:refs/heads/gone\t[deleted]
 \trefs/heads/master:refs/remotes/origin/master\t1a2b3c4..5d6e7f8
Done
";

    #[test]
    fn ref_lines_split_into_remote_and_local_updates() {
        let result = parse(PORCELAIN);
        assert_eq!(result.remote_updates.len(), 5);
        assert_eq!(result.local_updates.len(), 1);

        let master = &result.remote_updates["master"];
        assert_eq!(master.status, UpdateStatus::Ok);
        assert_eq!(master.local_name.as_deref(), Some("master"));
        assert_eq!(master.remote_name.as_deref(), Some("master"));
        assert_eq!(master.old_id.as_deref(), Some("1a2b3c4"));
        assert_eq!(master.new_id.as_deref(), Some("5d6e7f8"));
        assert_eq!(master.ref_type, RefType::Branch);

        let feature = &result.remote_updates["feature"];
        assert_eq!(feature.status, UpdateStatus::Ok);
        assert_eq!(feature.operation, "new branch");
        assert_eq!(feature.old_id, None);

        assert_eq!(result.remote_updates["stable"].status, UpdateStatus::UpToDate);
        assert_eq!(result.remote_updates["dev"].status, UpdateStatus::Rejected);

        let gone = &result.remote_updates["gone"];
        assert_eq!(gone.local_name, None);
        assert_eq!(gone.operation, "deleted");

        let tracking = &result.local_updates["origin/master"];
        assert_eq!(tracking.ref_type, RefType::Branch);
        assert_eq!(tracking.new_id.as_deref(), Some("5d6e7f8"));
    }

    #[test]
    fn chatter_lines_are_skipped() {
        let result = parse("To https://example.com/repo.git\nDone\n");
        assert!(result.remote_updates.is_empty());
        assert!(result.local_updates.is_empty());
    }
}
