// SPDX-License-Identifier: GPL-2.0-only

//! Key-value store over the git config file format.
//!
//! Covers the subset the command layer needs: `[section]` and
//! `[section "subsection"]` groups of `key = value` lines, with
//! load → mutate → save semantics. Concurrent writers are not protected
//! against; callers serialize config mutations externally.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{GitError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Section {
    name: String,
    subsection: Option<String>,
    entries: Vec<(String, String)>,
}

impl Section {
    fn matches(&self, name: &str, subsection: Option<&str>) -> bool {
        self.name.eq_ignore_ascii_case(name) && self.subsection.as_deref() == subsection
    }
}

/// One loaded git config file.
#[derive(Clone, Debug)]
pub struct GitConfig {
    path: PathBuf,
    sections: Vec<Section>,
}

impl GitConfig {
    /// Load the config file at `path`. A missing file loads as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<GitConfig> {
        let path = path.into();
        let mut config = GitConfig {
            path,
            sections: Vec::new(),
        };
        config.load()?;
        Ok(config)
    }

    /// Re-read the backing file, discarding unsaved mutations.
    pub fn load(&mut self) -> Result<()> {
        self.sections.clear();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for (lineno, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(header) = line.strip_prefix('[') {
                let header = header
                    .strip_suffix(']')
                    .ok_or_else(|| GitError::ConfigParse(lineno + 1, raw.to_string()))?;
                let (name, subsection) = match header.split_once(' ') {
                    Some((name, quoted)) => {
                        let quoted = quoted.trim();
                        let subsection = quoted
                            .strip_prefix('"')
                            .and_then(|q| q.strip_suffix('"'))
                            .ok_or_else(|| {
                                GitError::ConfigParse(lineno + 1, raw.to_string())
                            })?;
                        (name, Some(subsection.replace("\\\"", "\"").replace("\\\\", "\\")))
                    }
                    None => (header, None),
                };
                self.sections.push(Section {
                    name: name.trim().to_ascii_lowercase(),
                    subsection,
                    entries: Vec::new(),
                });
            } else {
                let section = self
                    .sections
                    .last_mut()
                    .ok_or_else(|| GitError::ConfigParse(lineno + 1, raw.to_string()))?;
                let (key, value) = match line.split_once('=') {
                    Some((key, value)) => (key.trim(), value.trim()),
                    // A bare key is shorthand for `key = true`.
                    None => (line, "true"),
                };
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(value);
                section
                    .entries
                    .push((key.to_ascii_lowercase(), value.to_string()));
            }
        }
        Ok(())
    }

    /// Write the current state back to the backing file.
    pub fn save(&self) -> Result<()> {
        let mut out = String::new();
        for section in &self.sections {
            if let Some(subsection) = &section.subsection {
                let quoted = subsection.replace('\\', "\\\\").replace('"', "\\\"");
                out.push_str(&format!("[{} \"{}\"]\n", section.name, quoted));
            } else {
                out.push_str(&format!("[{}]\n", section.name));
            }
            for (key, value) in &section.entries {
                out.push_str(&format!("\t{key} = {value}\n"));
            }
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, out)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_string(&self, section: &str, subsection: Option<&str>, key: &str) -> Option<String> {
        let section = self.sections.iter().find(|s| s.matches(section, subsection))?;
        section
            .entries
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.clone())
    }

    pub fn set_string(
        &mut self,
        section: &str,
        subsection: Option<&str>,
        key: &str,
        value: &str,
    ) {
        let key = key.to_ascii_lowercase();
        if let Some(section) = self
            .sections
            .iter_mut()
            .find(|s| s.matches(section, subsection))
        {
            if let Some(entry) = section.entries.iter_mut().find(|(k, _)| *k == key) {
                entry.1 = value.to_string();
            } else {
                section.entries.push((key, value.to_string()));
            }
        } else {
            self.sections.push(Section {
                name: section.to_ascii_lowercase(),
                subsection: subsection.map(str::to_string),
                entries: vec![(key, value.to_string())],
            });
        }
    }

    /// Append one more value for a multi-valued key such as a refspec.
    pub fn add_string(
        &mut self,
        section: &str,
        subsection: Option<&str>,
        key: &str,
        value: &str,
    ) {
        let key = key.to_ascii_lowercase();
        if let Some(section) = self
            .sections
            .iter_mut()
            .find(|s| s.matches(section, subsection))
        {
            section.entries.push((key, value.to_string()));
        } else {
            self.sections.push(Section {
                name: section.to_ascii_lowercase(),
                subsection: subsection.map(str::to_string),
                entries: vec![(key, value.to_string())],
            });
        }
    }

    pub fn unset(&mut self, section: &str, subsection: Option<&str>, key: &str) {
        if let Some(section) = self
            .sections
            .iter_mut()
            .find(|s| s.matches(section, subsection))
        {
            section.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
        }
    }

    pub fn unset_section(&mut self, section: &str, subsection: Option<&str>) {
        self.sections.retain(|s| !s.matches(section, subsection));
    }

    /// All subsection names under `section`, e.g. remote names under `remote`.
    pub fn subsections(&self, section: &str) -> Vec<String> {
        self.sections
            .iter()
            .filter(|s| s.name.eq_ignore_ascii_case(section))
            .filter_map(|s| s.subsection.clone())
            .collect()
    }

    /// All values recorded for a multi-valued key, in file order.
    pub fn get_all(&self, section: &str, subsection: Option<&str>, key: &str) -> Vec<String> {
        self.sections
            .iter()
            .filter(|s| s.matches(section, subsection))
            .flat_map(|s| {
                s.entries
                    .iter()
                    .filter(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
[core]
\trepositoryformatversion = 0
\tbare = false
[remote \"origin\"]
\turl = https://example.com/repo.git
\tfetch = +refs/heads/*:refs/remotes/origin/*
[branch \"main\"]
\tremote = origin
\tmerge = refs/heads/main
";

    fn example_config(dir: &Path) -> GitConfig {
        let path = dir.join("config");
        fs::write(&path, EXAMPLE).unwrap();
        GitConfig::open(path).unwrap()
    }

    #[test]
    fn read_sections_and_values() {
        let dir = tempfile::tempdir().unwrap();
        let config = example_config(dir.path());
        assert_eq!(
            config.get_string("remote", Some("origin"), "url").as_deref(),
            Some("https://example.com/repo.git")
        );
        assert_eq!(
            config.get_string("core", None, "bare").as_deref(),
            Some("false")
        );
        assert_eq!(config.get_string("remote", Some("other"), "url"), None);
        assert_eq!(config.subsections("remote"), vec!["origin".to_string()]);
        assert_eq!(config.subsections("branch"), vec!["main".to_string()]);
    }

    #[test]
    fn mutate_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = example_config(dir.path());
        config.set_string("remote", Some("origin"), "pushurl", "ssh://push");
        config.unset("branch", Some("main"), "merge");
        config.unset_section("core", None);
        config.save().unwrap();

        let reloaded = GitConfig::open(dir.path().join("config")).unwrap();
        assert_eq!(
            reloaded
                .get_string("remote", Some("origin"), "pushurl")
                .as_deref(),
            Some("ssh://push")
        );
        assert_eq!(reloaded.get_string("branch", Some("main"), "merge"), None);
        assert_eq!(
            reloaded.get_string("branch", Some("main"), "remote").as_deref(),
            Some("origin")
        );
        assert_eq!(reloaded.get_string("core", None, "bare"), None);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = GitConfig::open(dir.path().join("nope")).unwrap();
        assert!(config.subsections("remote").is_empty());
    }

    #[test]
    fn multi_valued_fetch_refspecs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(
            &path,
            "[remote \"origin\"]\n\tfetch = +refs/heads/a:refs/remotes/origin/a\n\tfetch = +refs/heads/b:refs/remotes/origin/b\n",
        )
        .unwrap();
        let config = GitConfig::open(path).unwrap();
        assert_eq!(config.get_all("remote", Some("origin"), "fetch").len(), 2);
    }
}
