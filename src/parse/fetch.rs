// SPDX-License-Identifier: GPL-2.0-only

//! Per-ref results from `fetch` stderr.

use tracing::warn;

use crate::model::{GitTransportUpdate, RefType, TransportUpdates, UpdateStatus};

use super::push::split_summary;

/// Parse fetch's ref-update table.
///
/// Fetch reports on stderr, one line per touched tracking ref:
///
/// ```text
/// From https://example.com/repo
///  * [new branch]      feature    -> origin/feature
///    1a2b3c4..5d6e7f8  master     -> origin/master
///  + 9a8b7c6...5d6e7f8 dev        -> origin/dev  (forced update)
///  - [deleted]         (none)     -> origin/gone
///  * [new tag]         v1.0       -> v1.0
/// ```
///
/// The flag column holds ` ` (fast-forward), `*` (new), `+` (forced),
/// `-` (pruned), `t` (tag update), `!` (rejected) or `=` (up to date).
/// New refs carry no ids in this table; the caller resolves them with a
/// follow-up `show-ref`.
pub(crate) fn parse(stderr: &str) -> TransportUpdates {
    let mut updates = TransportUpdates::new();
    for line in stderr.lines() {
        if !line.starts_with(' ') || line.len() < 4 {
            continue;
        }
        let flag = line[1..].chars().next().unwrap_or(' ');
        let status = match flag {
            ' ' | '*' | '+' | '-' | 't' => UpdateStatus::Ok,
            '!' => UpdateStatus::Rejected,
            '=' => UpdateStatus::UpToDate,
            _ => continue,
        };
        let Some((left, local)) = line[3..].split_once(" -> ") else {
            continue;
        };
        let left = left.trim();
        let (summary, remote_name) = match left.strip_prefix('[') {
            Some(rest) => {
                let Some((operation, from)) = rest.split_once(']') else {
                    warn!(line, "fetch ref line with unterminated summary");
                    continue;
                };
                (format!("[{operation}]"), from.trim())
            }
            None => {
                let mut tokens = left.splitn(2, char::is_whitespace);
                let range = tokens.next().unwrap_or("");
                (range.to_string(), tokens.next().unwrap_or("").trim())
            }
        };
        let (old_id, new_id, operation) = split_summary(&summary);
        let local = local.split_whitespace().next().unwrap_or(local);
        let ref_type = if operation.contains("tag") || local == remote_name {
            RefType::Tag
        } else {
            RefType::Branch
        };
        updates.insert(
            local.to_string(),
            GitTransportUpdate {
                ref_type,
                local_name: Some(local.to_string()),
                remote_name: (remote_name != "(none)" && !remote_name.is_empty())
                    .then(|| remote_name.to_string()),
                old_id,
                new_id,
                operation,
                status,
            },
        );
    }
    updates
}

#[cfg(test)]
mod tests {
    use super::*;

    const FETCH: &str = "\
From https://example.com/repo
 * [new branch]      feature    -> origin/feature
   1a2b3c4..5d6e7f8  master     -> origin/master
 + 9a8b7c6...5d6e7f8 dev        -> origin/dev  (forced update)
 - [deleted]         (none)     -> origin/gone
 = [up to date]      stable     -> origin/stable
 * [new tag]         v1.0       -> v1.0
";

    #[test]
    fn ref_update_table() {
        let updates = parse(FETCH);
        assert_eq!(updates.len(), 6);

        let feature = &updates["origin/feature"];
        assert_eq!(feature.status, UpdateStatus::Ok);
        assert_eq!(feature.operation, "new branch");
        assert_eq!(feature.remote_name.as_deref(), Some("feature"));
        assert_eq!(feature.new_id, None);

        let master = &updates["origin/master"];
        assert_eq!(master.old_id.as_deref(), Some("1a2b3c4"));
        assert_eq!(master.new_id.as_deref(), Some("5d6e7f8"));
        assert_eq!(master.ref_type, RefType::Branch);

        let dev = &updates["origin/dev"];
        assert_eq!(dev.old_id.as_deref(), Some("9a8b7c6"));
        assert_eq!(dev.status, UpdateStatus::Ok);

        let gone = &updates["origin/gone"];
        assert_eq!(gone.operation, "deleted");
        assert_eq!(gone.remote_name, None);

        assert_eq!(updates["origin/stable"].status, UpdateStatus::UpToDate);

        let tag = &updates["v1.0"];
        assert_eq!(tag.ref_type, RefType::Tag);
        assert_eq!(tag.operation, "new tag");
    }

    #[test]
    fn chatter_lines_are_skipped() {
        let updates = parse("From https://example.com/repo\nremote: done\n");
        assert!(updates.is_empty());
    }
}
