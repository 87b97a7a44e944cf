// SPDX-License-Identifier: GPL-2.0-only

//! Pipeline assembly, one module per command family.
//!
//! Most functions here build a [`Pipeline`](crate::exec::Pipeline) over a
//! family-specific result container, run it against the caller's
//! [`Executor`](crate::exec::Executor), and hand the finished container
//! back; the ignore and remote families work on files directly and spawn
//! nothing. No module in this layer reads process output itself; all text
//! goes through `parse`.

pub(crate) mod add;
pub(crate) mod blame;
pub(crate) mod branch;
pub(crate) mod cat;
pub(crate) mod compare;
pub(crate) mod fetch;
pub(crate) mod ignore;
pub(crate) mod merge;
pub(crate) mod pick;
pub(crate) mod pull;
pub(crate) mod push;
pub(crate) mod rebase;
pub(crate) mod remote;
pub(crate) mod remove;
pub(crate) mod rename;
pub(crate) mod reset;
pub(crate) mod revert;
pub(crate) mod status;
pub(crate) mod tag;

use crate::{
    error::Result,
    exec::{Executor, Pipeline},
    progress::ProgressMonitor,
    repository::Repository,
};

/// Everything a command family needs to plan and run its sub-invocations.
pub(crate) struct CommandContext<'a> {
    pub(crate) repository: &'a Repository,
    pub(crate) executor: &'a dyn Executor,
    pub(crate) monitor: &'a dyn ProgressMonitor,
}

impl CommandContext<'_> {
    pub(crate) fn run<C>(&self, pipeline: &Pipeline<'_, C>, container: &mut C) -> Result<()> {
        pipeline.run(self.executor, self.monitor, container)
    }
}
