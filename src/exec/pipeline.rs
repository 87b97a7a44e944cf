// SPDX-License-Identifier: GPL-2.0-only

//! Multi-step command pipelines.
//!
//! A command is an ordered sequence of [`Step`]s sharing one mutable result
//! container. Each step plans its own sub-invocation as a pure function of
//! the container, so an argument only known after an earlier step's output
//! has been parsed is simply read out of the container when the later step
//! builds its argument list. Skipping and short-circuiting fall out of the
//! same mechanism: a step may plan [`Plan::Skip`] or end the whole pipeline
//! with [`Plan::Done`].

use bstr::BStr;

use crate::{
    error::{GitError, Result},
    exec::{ExecOutput, Executor, Invocation},
    progress::ProgressMonitor,
};

/// What a step decided to do once it saw the accumulated container.
pub(crate) enum Plan {
    /// Execute this sub-invocation.
    Run(Invocation),
    /// Skip this step and continue with the next one.
    Skip,
    /// Stop the pipeline; the container already holds the final result.
    Done,
}

/// How a step's captured output is dispatched.
///
/// Exactly one handler function runs per executed sub-invocation:
///
/// * `Output`: stdout on clean exit; any stderr is the generic failure.
/// * `OutputError`: stdout on clean exit; stderr goes to the classifier,
///   which may recognize it as benign (or as a typed error) instead of
///   falling back to the generic failure.
/// * `Mixed`: the command family defines its own semantics over
///   stdout/stderr/exit code (e.g. `reset --mixed` listing files on stdout
///   with exit code 1).
pub(crate) enum Handler<'a, C> {
    Output(Box<dyn Fn(&mut C, &BStr) -> Result<()> + 'a>),
    OutputError {
        output: Box<dyn Fn(&mut C, &BStr) -> Result<()> + 'a>,
        error: Box<dyn Fn(&mut C, &BStr) -> Result<()> + 'a>,
    },
    Mixed(Box<dyn Fn(&mut C, &ExecOutput) -> Result<()> + 'a>),
}

/// One sub-invocation descriptor: argument planning plus output dispatch.
pub(crate) struct Step<'a, C> {
    build: Box<dyn Fn(&C) -> Result<Plan> + 'a>,
    handler: Handler<'a, C>,
}

impl<'a, C> Step<'a, C> {
    pub(crate) fn output(
        build: impl Fn(&C) -> Result<Plan> + 'a,
        on_output: impl Fn(&mut C, &BStr) -> Result<()> + 'a,
    ) -> Step<'a, C> {
        Step {
            build: Box::new(build),
            handler: Handler::Output(Box::new(on_output)),
        }
    }

    pub(crate) fn output_error(
        build: impl Fn(&C) -> Result<Plan> + 'a,
        on_output: impl Fn(&mut C, &BStr) -> Result<()> + 'a,
        on_error: impl Fn(&mut C, &BStr) -> Result<()> + 'a,
    ) -> Step<'a, C> {
        Step {
            build: Box::new(build),
            handler: Handler::OutputError {
                output: Box::new(on_output),
                error: Box::new(on_error),
            },
        }
    }

    pub(crate) fn mixed(
        build: impl Fn(&C) -> Result<Plan> + 'a,
        on_result: impl Fn(&mut C, &ExecOutput) -> Result<()> + 'a,
    ) -> Step<'a, C> {
        Step {
            build: Box::new(build),
            handler: Handler::Mixed(Box::new(on_result)),
        }
    }
}

/// Ordered sequence of steps over a shared result container.
pub(crate) struct Pipeline<'a, C> {
    steps: Vec<Step<'a, C>>,
}

impl<'a, C> Pipeline<'a, C> {
    pub(crate) fn new(steps: Vec<Step<'a, C>>) -> Pipeline<'a, C> {
        Pipeline { steps }
    }

    /// Run steps in order, feeding each executed sub-invocation's output to
    /// its handler. Cancellation is checked before every step and inside the
    /// runner; a tripped token yields `Err(Canceled)` with no result.
    pub(crate) fn run(
        &self,
        executor: &dyn Executor,
        monitor: &dyn ProgressMonitor,
        container: &mut C,
    ) -> Result<()> {
        for step in &self.steps {
            if monitor.is_canceled() {
                return Err(GitError::Canceled);
            }
            let invocation = match (step.build)(container)? {
                Plan::Run(invocation) => invocation,
                Plan::Skip => continue,
                Plan::Done => break,
            };
            let output = executor.run(&invocation, monitor.cancel_token())?;
            match &step.handler {
                Handler::Mixed(on_result) => on_result(container, &output)?,
                Handler::Output(on_output) => {
                    if !output.stderr.is_empty() {
                        return Err(GitError::failure(invocation.command_line(), &output.stderr));
                    } else if output.code == 0 {
                        on_output(container, output.stdout_bstr())?;
                    } else {
                        return Err(GitError::UnexpectedExit {
                            command: invocation.command_line(),
                            code: output.code,
                        });
                    }
                }
                Handler::OutputError { output: on_output, error: on_error } => {
                    if !output.stderr.is_empty() {
                        on_error(container, output.stderr_bstr())?;
                    } else if output.code == 0 {
                        on_output(container, output.stdout_bstr())?;
                    } else {
                        return Err(GitError::UnexpectedExit {
                            command: invocation.command_line(),
                            code: output.code,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
