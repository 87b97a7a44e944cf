// SPDX-License-Identifier: GPL-2.0-only

//! Branch listings from `branch -vv [-a]`.

use indexmap::IndexMap;
use tracing::warn;

use crate::model::GitBranch;

/// Parse a verbose branch listing into a name-keyed map.
///
/// Recognized line shapes:
///
/// ```text
/// * master                  1a2b3c4 [origin/master: ahead 1] subject
///   dev                     5d6e7f8 subject
///   remotes/origin/master   1a2b3c4 subject
///   remotes/origin/HEAD     -> origin/master
/// * (HEAD detached at 1a2b3c4) 1a2b3c4 subject
/// ```
///
/// Symbolic entries (`->`) are aliases, not branches, and are skipped.
pub(crate) fn parse_listing(text: &str) -> IndexMap<String, GitBranch> {
    let mut branches = IndexMap::new();
    for line in text.lines() {
        if line.len() < 3 {
            continue;
        }
        let active = line.starts_with('*');
        let rest = &line[2..];
        if rest.contains(" -> ") {
            continue;
        }
        let (name, remote, after_name) = if let Some(detached) = rest.strip_prefix('(') {
            let Some(end) = detached.find(')') else {
                continue;
            };
            (GitBranch::DETACHED.to_string(), false, &detached[end + 1..])
        } else {
            let mut split = rest.splitn(2, char::is_whitespace);
            let Some(raw_name) = split.next() else {
                continue;
            };
            let after = split.next().unwrap_or("");
            match raw_name.strip_prefix("remotes/") {
                Some(short) => (short.to_string(), true, after),
                None => (raw_name.to_string(), false, after),
            }
        };
        let after_name = after_name.trim_start();
        let Some(id) = after_name.split_whitespace().next() else {
            warn!(line, "branch listing line without object id");
            continue;
        };
        let after_id = after_name[id.len()..].trim_start();
        // `[upstream]` or `[upstream: ahead 1, behind 2]`
        let tracked = after_id.strip_prefix('[').and_then(|bracketed| {
            let inner = bracketed.split(']').next()?;
            Some(inner.split(':').next()?.trim().to_string())
        });
        branches.insert(
            name.clone(),
            GitBranch {
                name,
                remote,
                active,
                id: id.to_string(),
                tracked,
            },
        );
    }
    branches
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
* master                  1a2b3c4 [origin/master: ahead 1] tweak the parser
  dev                     5d6e7f8 [origin/dev] start work
  feature/colors          9a8b7c6 no upstream here
  remotes/origin/HEAD     -> origin/master
  remotes/origin/master   1a2b3c4 tweak the parser
  remotes/origin/dev      5d6e7f8 start work
";

    #[test]
    fn parses_local_and_remote_branches() {
        let branches = parse_listing(LISTING);
        assert_eq!(branches.len(), 5);

        let master = &branches["master"];
        assert!(master.active);
        assert!(!master.remote);
        assert_eq!(master.id, "1a2b3c4");
        assert_eq!(master.tracked.as_deref(), Some("origin/master"));

        let feature = &branches["feature/colors"];
        assert!(!feature.active);
        assert_eq!(feature.tracked, None);

        let origin_master = &branches["origin/master"];
        assert!(origin_master.remote);
        assert!(!origin_master.active);
        assert_eq!(origin_master.id, "1a2b3c4");
    }

    #[test]
    fn symbolic_head_entry_is_skipped() {
        let branches = parse_listing("  remotes/origin/HEAD  -> origin/master\n");
        assert!(branches.is_empty());
    }

    #[test]
    fn detached_head_entry() {
        let branches = parse_listing("* (HEAD detached at 1a2b3c4) 1a2b3c4 subject\n");
        let detached = &branches[GitBranch::DETACHED];
        assert!(detached.active);
        assert!(detached.is_detached());
        assert_eq!(detached.id, "1a2b3c4");
    }
}
