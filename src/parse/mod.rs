// SPDX-License-Identifier: GPL-2.0-only

//! Parsers for git's semi-structured text output.
//!
//! One module per output family. Each parser is an explicit per-line state
//! machine over the captured text, keyed on fixed line prefixes and column
//! positions; field extraction slices on recognized prefixes rather than
//! tokenizing generally. The parsers encode the `--porcelain`/`--raw` subset
//! this crate relies on plus a couple of hand-tracked human-readable formats
//! (merge/rebase feedback); those advisory formats degrade to a generic
//! failed status when unrecognized. All machines are pure over their input
//! lines and are tested without spawning any process.

pub(crate) mod blame;
pub(crate) mod branch;
pub(crate) mod fetch;
pub(crate) mod ignore;
pub(crate) mod merge;
pub(crate) mod pick;
pub(crate) mod push;
pub(crate) mod rebase;
pub(crate) mod revert;
pub(crate) mod revision;
pub(crate) mod status;
pub(crate) mod tag;
pub(crate) mod verbose;

/// `Name <email>` with a trailing ` <epoch> <tz>` pair, as printed by
/// `--pretty=raw` and blame porcelain metadata.
pub(crate) fn split_identity(value: &str) -> (crate::model::GitUser, i64) {
    let (ident, time) = match value.rfind('>') {
        Some(end) => (&value[..=end], value[end + 1..].trim()),
        None => (value, ""),
    };
    let user = parse_user(ident);
    let seconds = time
        .split_whitespace()
        .next()
        .and_then(|t| t.parse::<i64>().ok())
        .unwrap_or(0);
    (user, seconds)
}

/// `Name <email>` into its parts; a missing angle-bracket pair leaves the
/// whole string as the name.
pub(crate) fn parse_user(ident: &str) -> crate::model::GitUser {
    match ident.find('<') {
        Some(open) => {
            let name = ident[..open].trim().to_string();
            let email = ident[open + 1..]
                .trim_end()
                .trim_end_matches('>')
                .to_string();
            crate::model::GitUser { name, email }
        }
        None => crate::model::GitUser {
            name: ident.trim().to_string(),
            email: String::new(),
        },
    }
}

/// Shorten a full ref name the way git's listings do.
pub(crate) fn shorten_ref(name: &str) -> &str {
    for prefix in ["refs/heads/", "refs/remotes/", "refs/tags/"] {
        if let Some(short) = name.strip_prefix(prefix) {
            return short;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_with_time() {
        let (user, time) = split_identity("A U Thor <au@thor.example> 1700000000 +0100");
        assert_eq!(user.name, "A U Thor");
        assert_eq!(user.email, "au@thor.example");
        assert_eq!(time, 1700000000);
    }

    #[test]
    fn identity_without_time() {
        let (user, time) = split_identity("Tagger <t@example>");
        assert_eq!(user.name, "Tagger");
        assert_eq!(user.email, "t@example");
        assert_eq!(time, 0);
    }

    #[test]
    fn ref_shortening() {
        assert_eq!(shorten_ref("refs/heads/master"), "master");
        assert_eq!(shorten_ref("refs/remotes/origin/dev"), "origin/dev");
        assert_eq!(shorten_ref("refs/tags/v1.0"), "v1.0");
        assert_eq!(shorten_ref("refs/merge-requests/1"), "refs/merge-requests/1");
    }
}
