// SPDX-License-Identifier: GPL-2.0-only

//! Reading blob contents from a revision or the index.

use std::path::Path;

use bstr::BStr;

use crate::{
    error::{GitError, Result},
    exec::{Invocation, Pipeline, Plan, Step},
};

use super::CommandContext;

/// Read a file's contents at `revision`.
///
/// A revision or path that does not resolve to an object is the typed
/// [`GitError::MissingObject`]; there is no partial result.
pub(crate) fn cat(
    ctx: &CommandContext<'_>,
    path: &Path,
    revision: &str,
) -> Result<Vec<u8>> {
    let relative = ctx.repository.relativize(path)?;
    let spec = format!("{revision}:{relative}");
    cat_object(ctx, spec)
}

/// Read a file's contents from the index at the given stage (0 for a
/// normally staged file, 1-3 during a conflict).
pub(crate) fn cat_index(ctx: &CommandContext<'_>, path: &Path, stage: u8) -> Result<Vec<u8>> {
    let relative = ctx.repository.relativize(path)?;
    let spec = format!(":{stage}:{relative}");
    cat_object(ctx, spec)
}

fn cat_object(ctx: &CommandContext<'_>, spec: String) -> Result<Vec<u8>> {
    let build_spec = spec.clone();
    let error_spec = spec.clone();
    let pipeline = Pipeline::new(vec![Step::output_error(
        move |_: &Vec<u8>| {
            Ok(Plan::Run(
                Invocation::new("cat-file").arg("blob").arg(build_spec.clone()),
            ))
        },
        |content: &mut Vec<u8>, out: &BStr| {
            content.extend_from_slice(out);
            Ok(())
        },
        move |_, err: &BStr| {
            let text = err.to_string();
            if text.contains("Not a valid object name")
                || text.contains("does not exist")
                || text.contains("bad revision")
            {
                Err(GitError::MissingObject(error_spec.clone()))
            } else {
                Err(GitError::failure(format!("cat-file blob {error_spec}"), err))
            }
        },
    )]);
    let mut content = Vec::new();
    ctx.run(&pipeline, &mut content)?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::ScriptedExecutor;
    use crate::exec::ExecOutput;
    use crate::progress::NullProgressMonitor;
    use crate::repository::Repository;

    #[test]
    fn reads_blob_at_revision() {
        let repository = Repository::new("/work/repo");
        let executor = ScriptedExecutor::new([ExecOutput::out("blob content\n")]);
        let monitor = NullProgressMonitor::new();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        let content = cat(&ctx, Path::new("/work/repo/src/lib.rs"), "HEAD").unwrap();
        assert_eq!(executor.calls(), ["cat-file blob HEAD:src/lib.rs"]);
        assert_eq!(content, b"blob content\n");
    }

    #[test]
    fn missing_object_is_typed() {
        let repository = Repository::new("/work/repo");
        let executor = ScriptedExecutor::new([ExecOutput::err(
            "fatal: Not a valid object name HEAD:nope.txt\n",
            128,
        )]);
        let monitor = NullProgressMonitor::new();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        assert!(matches!(
            cat(&ctx, Path::new("/work/repo/nope.txt"), "HEAD"),
            Err(GitError::MissingObject(spec)) if spec == "HEAD:nope.txt"
        ));
    }

    #[test]
    fn index_stage_spec() {
        let repository = Repository::new("/work/repo");
        let executor = ScriptedExecutor::new([ExecOutput::out("ours")]);
        let monitor = NullProgressMonitor::new();
        let ctx = CommandContext {
            repository: &repository,
            executor: &executor,
            monitor: &monitor,
        };
        cat_index(&ctx, Path::new("/work/repo/a.txt"), 2).unwrap();
        assert_eq!(executor.calls(), ["cat-file blob :2:a.txt"]);
    }
}
