// SPDX-License-Identifier: GPL-2.0-only

//! Execution of `git` sub-invocations.
//!
//! [`Invocation`] builds the argument list for one external process run,
//! [`GitRunner`] executes it with cooperative cancellation, and
//! [`Pipeline`] sequences several sub-invocations into one command,
//! dispatching captured output to the per-family parsers.

mod invocation;
mod pipeline;
mod runner;

pub(crate) use self::{
    invocation::Invocation,
    pipeline::{Handler, Pipeline, Plan, Step},
    runner::{ExecOutput, Executor, GitRunner},
};
