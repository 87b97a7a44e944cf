// SPDX-License-Identifier: GPL-2.0-only

//! File echoes from verbose `add` and `rm`.

/// Collect the quoted paths from `add 'path'` / `rm 'path'` lines.
///
/// Both subcommands echo exactly one such line per file they touched, so
/// the collected paths double as the operation's result set.
pub(crate) fn touched_files(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let rest = line
                .strip_prefix("add ")
                .or_else(|| line.strip_prefix("rm "))?;
            let rest = rest.trim();
            rest.strip_prefix('\'')
                .and_then(|p| p.strip_suffix('\''))
                .map(str::to_string)
        })
        .collect()
}

/// Collect the `Renaming <src> to <dst>` pairs echoed by verbose `mv`.
pub(crate) fn renamed_pairs(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            let rest = line.strip_prefix("Renaming ")?;
            let (from, to) = rest.rsplit_once(" to ")?;
            Some((from.to_string(), to.to_string()))
        })
        .collect()
}
