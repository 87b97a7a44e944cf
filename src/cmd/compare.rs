// SPDX-License-Identifier: GPL-2.0-only

//! Tree-to-tree comparison.

use std::path::PathBuf;

use bstr::BStr;

use crate::{
    error::Result,
    exec::{Invocation, Pipeline, Plan, Step},
    model::GitFileInfo,
    parse::revision,
};

use super::CommandContext;

/// List the files that differ between two revisions, optionally narrowed
/// to the given paths.
pub(crate) fn compare(
    ctx: &CommandContext<'_>,
    revision_first: &str,
    revision_second: &str,
    paths: &[PathBuf],
) -> Result<Vec<GitFileInfo>> {
    let repository = ctx.repository;
    let pipeline = Pipeline::new(vec![Step::output(
        |_: &Vec<GitFileInfo>| {
            let mut invocation = Invocation::new("diff")
                .arg("--raw")
                .arg(revision_first)
                .arg(revision_second);
            if !paths.is_empty() {
                invocation =
                    invocation.file_args(repository, paths.iter().map(PathBuf::as_path))?;
            }
            Ok(Plan::Run(invocation))
        },
        |files: &mut Vec<GitFileInfo>, out: &BStr| {
            files.extend(revision::parse_raw_files(&out.to_string()));
            Ok(())
        },
    )]);
    let mut files = Vec::new();
    ctx.run(&pipeline, &mut files)?;
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::ScriptedExecutor;
    use crate::exec::ExecOutput;
    use crate::model::FileStatus;
    use crate::progress::NullProgressMonitor;
    use crate::repository::Repository;

    #[test]
    fn compares_two_trees() {
        let repository = Repository::new("/work/repo");
        let executor = ScriptedExecutor::new([ExecOutput::out(
            ":100644 100644 1111111 2222222 M\tsrc/lib.rs\n:100644 100644 3333333 3333333 R100\told.rs\tnew.rs\n",
        )]);
        let monitor = NullProgressMonitor::new();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let files = compare(&ctx, "HEAD~2", "HEAD", &[]).unwrap();
        assert_eq!(executor.calls(), ["diff --raw HEAD~2 HEAD"]);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].relative_path, "src/lib.rs");
        assert_eq!(files[0].status, FileStatus::Modified);
        assert_eq!(files[1].original_path.as_deref(), Some("old.rs"));
    }

    #[test]
    fn narrows_to_paths() {
        let repository = Repository::new("/work/repo");
        let executor = ScriptedExecutor::new([ExecOutput::out("")]);
        let monitor = NullProgressMonitor::new();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        compare(&ctx, "v1.0", "v2.0", &[PathBuf::from("/work/repo/src")]).unwrap();
        assert_eq!(executor.calls(), ["diff --raw v1.0 v2.0 -- src"]);
    }
}
