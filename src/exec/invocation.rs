// SPDX-License-Identifier: GPL-2.0-only

//! Argument list for one `git` sub-invocation.

use std::path::Path;

use crate::{error::Result, repository::Repository};

/// One discrete external-process execution within a pipeline.
///
/// The first argument is the git subcommand. File arguments are converted to
/// repository-relative form up front so argument lists are complete before
/// the process is spawned; a path outside the repository root fails
/// validation here, before anything runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Invocation {
    args: Vec<String>,
}

impl Invocation {
    pub(crate) fn new(subcommand: &str) -> Invocation {
        Invocation {
            args: vec![subcommand.to_string()],
        }
    }

    pub(crate) fn arg(mut self, arg: impl Into<String>) -> Invocation {
        self.args.push(arg.into());
        self
    }

    pub(crate) fn args<I, S>(mut self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub(crate) fn arg_if(self, condition: bool, arg: impl Into<String>) -> Invocation {
        if condition {
            self.arg(arg)
        } else {
            self
        }
    }

    /// Append a file argument as a repository-relative path.
    pub(crate) fn file_arg(self, repository: &Repository, path: &Path) -> Result<Invocation> {
        let relative = repository.relativize(path)?;
        // The work tree root relativizes to "", which git spells ".".
        Ok(self.arg(if relative.is_empty() {
            ".".to_string()
        } else {
            relative
        }))
    }

    /// Append `--` followed by repository-relative paths.
    pub(crate) fn file_args<'p>(
        mut self,
        repository: &Repository,
        paths: impl IntoIterator<Item = &'p Path>,
    ) -> Result<Invocation> {
        self = self.arg("--");
        for path in paths {
            self = self.file_arg(repository, path)?;
        }
        Ok(self)
    }

    pub(crate) fn argv(&self) -> &[String] {
        &self.args
    }

    /// Full command line as a display string, e.g. `"branch -vv -a"`.
    pub(crate) fn command_line(&self) -> String {
        self.args.join(" ")
    }
}
