// SPDX-License-Identifier: GPL-2.0-only

//! Staging files into the index.

use std::path::{Path, PathBuf};

use bstr::BStr;

use crate::{
    error::Result,
    exec::{Invocation, Pipeline, Plan, Step},
    parse::verbose,
    progress::FileListener,
};

use super::CommandContext;

/// Stage the given files, returning the repository-relative paths git
/// actually touched.
///
/// Verbose mode echoes one `add '<path>'` line per staged file; each echo
/// is forwarded to the listener as it is parsed. Any stderr is an error.
pub(crate) fn add(
    ctx: &CommandContext<'_>,
    paths: &[PathBuf],
    listener: Option<&dyn FileListener>,
) -> Result<Vec<String>> {
    let repository = ctx.repository;
    let pipeline = Pipeline::new(vec![Step::output(
        |_: &Vec<String>| {
            Ok(Plan::Run(Invocation::new("add").arg("-v").file_args(
                repository,
                paths.iter().map(PathBuf::as_path),
            )?))
        },
        |touched: &mut Vec<String>, out: &BStr| {
            for relative in verbose::touched_files(&out.to_string()) {
                if let Some(listener) = listener {
                    listener.notify_file(&repository.resolve(&relative), &relative);
                }
                touched.push(relative);
            }
            Ok(())
        },
    )]);
    let mut touched = Vec::new();
    ctx.run(&pipeline, &mut touched)?;
    Ok(touched)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::exec::testing::ScriptedExecutor;
    use crate::exec::ExecOutput;
    use crate::progress::NullProgressMonitor;
    use crate::repository::Repository;

    pub(crate) struct CollectingListener {
        pub(crate) seen: RefCell<Vec<String>>,
    }

    impl CollectingListener {
        pub(crate) fn new() -> CollectingListener {
            CollectingListener {
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl FileListener for CollectingListener {
        fn notify_file(&self, _path: &Path, relative: &str) {
            self.seen.borrow_mut().push(relative.to_string());
        }
    }

    #[test]
    fn stages_and_notifies() {
        let repository = Repository::new("/work/repo");
        let executor = ScriptedExecutor::new([ExecOutput::out("add 'a.txt'\nadd 'dir/b.txt'\n")]);
        let monitor = NullProgressMonitor::new();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let listener = CollectingListener::new();
        let touched = add(
            &ctx,
            &[
                PathBuf::from("/work/repo/a.txt"),
                PathBuf::from("/work/repo/dir/b.txt"),
            ],
            Some(&listener),
        )
        .unwrap();
        assert_eq!(executor.calls(), ["add -v -- a.txt dir/b.txt"]);
        assert_eq!(touched, ["a.txt", "dir/b.txt"]);
        assert_eq!(*listener.seen.borrow(), ["a.txt", "dir/b.txt"]);
    }

    #[test]
    fn stderr_is_an_error() {
        let repository = Repository::new("/work/repo");
        let executor =
            ScriptedExecutor::new([ExecOutput::err("fatal: pathspec did not match\n", 128)]);
        let monitor = NullProgressMonitor::new();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        assert!(add(&ctx, &[PathBuf::from("/work/repo/a.txt")], None).is_err());
    }
}
