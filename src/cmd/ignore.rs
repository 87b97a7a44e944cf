// SPDX-License-Identifier: GPL-2.0-only

//! Marking paths as ignored or un-ignored by editing exclude files.
//!
//! These operations spawn no process; they evaluate the exclude sources
//! the way git does (global excludes file, `.git/info/exclude`, then
//! `.gitignore` files from the root down, last matching rule winning) and
//! edit the narrowest sensible `.gitignore`. Both are idempotent: a path
//! whose effective state already matches the request changes nothing.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{GitError, Result},
    parse::ignore::{last_match, parse_rules, IgnoreRule},
    repository::Repository,
};

use super::CommandContext;

/// One exclude file and the directory its rules are relative to.
struct Source {
    file: PathBuf,
    /// Repository-relative directory prefix, empty for root-level sources.
    base: String,
    rules: Vec<IgnoreRule>,
    editable: bool,
}

impl Source {
    /// The path a rule in this source sees, if the source applies at all.
    fn sub_path<'p>(&self, relative: &'p str) -> Option<&'p str> {
        if self.base.is_empty() {
            Some(relative)
        } else {
            relative
                .strip_prefix(self.base.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
        }
    }
}

fn load_sources(repository: &Repository, relative: &str) -> Result<Vec<Source>> {
    let mut sources = Vec::new();
    if let Some(global) = repository.global_exclude_file() {
        sources.push(load_source(global, String::new(), false)?);
    }
    sources.push(load_source(
        repository.repository_exclude_file(),
        String::new(),
        true,
    )?);
    // Root .gitignore, then one per ancestor directory of the path.
    let mut base = String::new();
    loop {
        let dir = repository.resolve(&base);
        sources.push(load_source(dir.join(".gitignore"), base.clone(), true)?);
        let rest = &relative[base.len()..];
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        match rest.split_once('/') {
            Some((segment, _)) => {
                if !base.is_empty() {
                    base.push('/');
                }
                base.push_str(segment);
            }
            None => break,
        }
    }
    Ok(sources)
}

fn load_source(file: PathBuf, base: String, editable: bool) -> Result<Source> {
    let rules = match fs::read_to_string(&file) {
        Ok(text) => parse_rules(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    Ok(Source {
        file,
        base,
        rules,
        editable,
    })
}

/// The source and rule currently deciding a path's ignore state, if any.
fn deciding_rule<'s>(
    sources: &'s [Source],
    relative: &str,
    is_dir: bool,
) -> Option<(&'s Source, &'s IgnoreRule)> {
    sources
        .iter()
        .rev()
        .find_map(|source| {
            let sub = source.sub_path(relative)?;
            last_match(&source.rules, sub, is_dir).map(|rule| (source, rule))
        })
}

fn is_ignored(sources: &[Source], relative: &str, is_dir: bool) -> bool {
    deciding_rule(sources, relative, is_dir).is_some_and(|(_, rule)| !rule.negated)
}

/// The `.gitignore` next to the path, and the anchored rule body for it.
fn local_target(repository: &Repository, relative: &str) -> (PathBuf, String) {
    match relative.rsplit_once('/') {
        Some((dir, name)) => (
            repository.resolve(dir).join(".gitignore"),
            format!("/{name}"),
        ),
        None => (
            repository.work_dir().join(".gitignore"),
            format!("/{relative}"),
        ),
    }
}

fn append_rule(file: &Path, rule: &str) -> Result<()> {
    let mut text = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(rule);
    text.push('\n');
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file, text)?;
    Ok(())
}

fn remove_rule(file: &Path, rule_text: &str) -> Result<()> {
    let text = fs::read_to_string(file)?;
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| line.trim_end() != rule_text)
        .collect();
    let mut out = kept.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    fs::write(file, out)?;
    Ok(())
}

/// Make the given paths ignored. Returns the exclude files that changed.
pub(crate) fn ignore(ctx: &CommandContext<'_>, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    edit(ctx, paths, true)
}

/// Make the given paths not ignored. Returns the exclude files that changed.
pub(crate) fn unignore(ctx: &CommandContext<'_>, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    edit(ctx, paths, false)
}

fn edit(ctx: &CommandContext<'_>, paths: &[PathBuf], want_ignored: bool) -> Result<Vec<PathBuf>> {
    let repository = ctx.repository;
    let mut modified = Vec::new();
    for path in paths {
        if ctx.monitor.is_canceled() {
            return Err(GitError::Canceled);
        }
        let relative = repository.relativize(path)?;
        if relative.is_empty() {
            continue;
        }
        let is_dir = path.is_dir();
        let sources = load_sources(repository, &relative)?;
        if is_ignored(&sources, &relative, is_dir) == want_ignored {
            continue;
        }
        let (local_file, local_body) = local_target(repository, &relative);
        let anchored = if is_dir {
            format!("{local_body}/")
        } else {
            local_body
        };
        let counter_rule = if want_ignored {
            // Un-ignored because of a negation: drop it when it is the
            // exact counterpart, otherwise add an affirmative rule.
            format!("!{anchored}")
        } else {
            anchored.clone()
        };
        let decided = deciding_rule(&sources, &relative, is_dir);
        let removed = match decided {
            Some((source, rule))
                if source.editable && rule.text == counter_rule && source.file == local_file =>
            {
                remove_rule(&source.file, &counter_rule)?;
                modified.push(source.file.clone());
                true
            }
            _ => false,
        };
        if !removed {
            let new_rule = if want_ignored {
                anchored
            } else {
                format!("!{anchored}")
            };
            append_rule(&local_file, &new_rule)?;
            if !modified.contains(&local_file) {
                modified.push(local_file);
            }
        }
    }
    Ok(modified)
}
