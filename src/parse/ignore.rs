// SPDX-License-Identifier: GPL-2.0-only

//! Exclude-file rules: parsing `.gitignore` lines and matching paths
//! against them.
//!
//! The subset implemented here is what the ignore and unignore operations
//! need to decide whether an existing rule already covers a path: `!`
//! negation, trailing-`/` directory rules, anchoring on embedded slashes,
//! and `*`/`?`/`**` wildcards. Within one file the last matching rule wins.

/// One non-comment line of an exclude file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct IgnoreRule {
    /// The line as written, for rewriting the file.
    pub(crate) text: String,
    pub(crate) negated: bool,
    dir_only: bool,
    anchored: bool,
    body: String,
}

impl IgnoreRule {
    /// Parse one exclude line; comments and blanks yield `None`.
    pub(crate) fn parse(line: &str) -> Option<IgnoreRule> {
        let trimmed = line.trim_end();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        let (negated, rest) = match trimmed.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (dir_only, rest) = match rest.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let anchored = rest.contains('/');
        let body = rest.trim_start_matches('/').to_string();
        if body.is_empty() {
            return None;
        }
        Some(IgnoreRule {
            text: trimmed.to_string(),
            negated,
            dir_only,
            anchored,
            body,
        })
    }

    /// Whether this rule applies to a slash-separated relative path.
    ///
    /// An unanchored rule matches any path segment; a rule that matched a
    /// non-final segment covers everything below that directory.
    pub(crate) fn matches(&self, path: &str, is_dir: bool) -> bool {
        if self.anchored {
            if glob_match(&self.body, path) {
                return !self.dir_only || is_dir;
            }
            // A matched ancestor directory covers the whole subtree.
            return ancestors(path).any(|dir| glob_match(&self.body, dir));
        }
        let segments: Vec<&str> = path.split('/').collect();
        for (index, segment) in segments.iter().enumerate() {
            if !glob_match(&self.body, segment) {
                continue;
            }
            let last = index + 1 == segments.len();
            if !last || !self.dir_only || is_dir {
                return true;
            }
        }
        false
    }
}

/// Parse a whole exclude file, keeping rule order.
pub(crate) fn parse_rules(text: &str) -> Vec<IgnoreRule> {
    text.lines().filter_map(IgnoreRule::parse).collect()
}

/// Find the deciding rule for a path: the last one that matches.
pub(crate) fn last_match<'a>(
    rules: &'a [IgnoreRule],
    path: &str,
    is_dir: bool,
) -> Option<&'a IgnoreRule> {
    rules.iter().rev().find(|rule| rule.matches(path, is_dir))
}

fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').map(move |(index, _)| &path[..index])
}

/// Glob match with gitignore semantics: `*` and `?` stop at slashes,
/// `**` crosses them.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_at(&pattern, &text)
}

fn glob_at(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('*', rest)) => {
            if let Some(rest) = rest.strip_prefix(&['*'][..]) {
                // `**` also swallows a following slash.
                let rest = rest.strip_prefix(&['/'][..]).unwrap_or(rest);
                return (0..=text.len()).any(|skip| glob_at(rest, &text[skip..]));
            }
            for skip in 0..=text.len() {
                if glob_at(rest, &text[skip..]) {
                    return true;
                }
                if text.get(skip) == Some(&'/') {
                    break;
                }
            }
            false
        }
        Some(('?', rest)) => match text.split_first() {
            Some((c, tail)) if *c != '/' => glob_at(rest, tail),
            _ => false,
        },
        Some((c, rest)) => match text.split_first() {
            Some((t, tail)) if t == c => glob_at(rest, tail),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(line: &str) -> IgnoreRule {
        IgnoreRule::parse(line).unwrap()
    }

    #[test]
    fn comments_and_blanks_are_not_rules() {
        assert_eq!(IgnoreRule::parse("# generated"), None);
        assert_eq!(IgnoreRule::parse(""), None);
        assert_eq!(IgnoreRule::parse("   "), None);
    }

    #[test]
    fn unanchored_rule_matches_any_segment() {
        let logs = rule("*.log");
        assert!(logs.matches("debug.log", false));
        assert!(logs.matches("build/out/debug.log", false));
        assert!(!logs.matches("debug.txt", false));

        let dir = rule("build/");
        assert!(dir.matches("build", true));
        assert!(!dir.matches("build", false));
        assert!(dir.matches("build/out.txt", false));
    }

    #[test]
    fn anchored_rule_matches_from_the_root() {
        let target = rule("/target");
        assert!(target.matches("target", false));
        assert!(target.matches("target/debug/app", false));
        assert!(!target.matches("sub/target", false));

        let nested = rule("src/*.bak");
        assert!(nested.matches("src/lib.bak", false));
        assert!(!nested.matches("src/deep/lib.bak", false));
    }

    #[test]
    fn double_star_crosses_directories() {
        let deep = rule("docs/**/*.pdf");
        assert!(deep.matches("docs/a.pdf", false));
        assert!(deep.matches("docs/x/y/b.pdf", false));
        assert!(!deep.matches("src/a.pdf", false));
    }

    #[test]
    fn last_matching_rule_wins() {
        let rules = parse_rules("*.log\n!important.log\n");
        let deciding = last_match(&rules, "important.log", false).unwrap();
        assert!(deciding.negated);
        let deciding = last_match(&rules, "debug.log", false).unwrap();
        assert!(!deciding.negated);
        assert!(last_match(&rules, "notes.txt", false).is_none());
    }
}
