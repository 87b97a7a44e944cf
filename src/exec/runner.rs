// SPDX-License-Identifier: GPL-2.0-only

//! Process runner for `git` sub-invocations.
//!
//! It is assumed/required that `git` is in `PATH`. One invocation blocks the
//! calling thread until the child exits or the cancel token trips, in which
//! case the child is killed and [`GitError::Canceled`] is returned without
//! dispatching any parser.

use std::{
    io::Read,
    process::{Command, Stdio},
    time::Duration,
};

use bstr::{BStr, BString, ByteSlice};
use tracing::debug;

use crate::{
    error::{GitError, Result},
    exec::Invocation,
    progress::CancelToken,
    repository::Repository,
};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured streams and exit code of one finished sub-invocation.
#[derive(Clone, Debug, Default)]
pub(crate) struct ExecOutput {
    pub(crate) stdout: BString,
    pub(crate) stderr: BString,
    pub(crate) code: i32,
}

impl ExecOutput {
    #[cfg(test)]
    pub(crate) fn out(stdout: &str) -> ExecOutput {
        ExecOutput {
            stdout: BString::from(stdout),
            stderr: BString::default(),
            code: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn err(stderr: &str, code: i32) -> ExecOutput {
        ExecOutput {
            stdout: BString::default(),
            stderr: BString::from(stderr),
            code,
        }
    }

    #[cfg(test)]
    pub(crate) fn mixed(stdout: &str, stderr: &str, code: i32) -> ExecOutput {
        ExecOutput {
            stdout: BString::from(stdout),
            stderr: BString::from(stderr),
            code,
        }
    }

    pub(crate) fn stdout_bstr(&self) -> &BStr {
        self.stdout.as_bstr()
    }

    pub(crate) fn stderr_bstr(&self) -> &BStr {
        self.stderr.as_bstr()
    }
}

/// Seam between pipelines and the external process boundary.
pub(crate) trait Executor {
    fn run(&self, invocation: &Invocation, token: &CancelToken) -> Result<ExecOutput>;
}

/// Executor spawning the real `git` executable.
#[derive(Clone, Debug)]
pub(crate) struct GitRunner {
    repository: Repository,
}

impl GitRunner {
    pub(crate) fn new(repository: Repository) -> GitRunner {
        GitRunner { repository }
    }

    fn command(&self, invocation: &Invocation) -> Command {
        let mut command = Command::new("git");
        command.current_dir(self.repository.work_dir());
        command.env("GIT_DIR", self.repository.git_dir());
        command.env("GIT_WORK_TREE", self.repository.work_dir());
        command.args(invocation.argv());
        command
    }
}

impl Executor for GitRunner {
    fn run(&self, invocation: &Invocation, token: &CancelToken) -> Result<ExecOutput> {
        if token.canceled() {
            return Err(GitError::Canceled);
        }
        debug!(argv = %invocation.command_line(), "spawning git");
        let mut child = self
            .command(invocation)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(GitError::Exec)?;

        // Both streams are drained on their own threads so a chatty child
        // cannot deadlock against a full pipe while we poll for exit.
        let mut stdout_pipe = child.stdout.take().expect("stdout is piped");
        let mut stderr_pipe = child.stderr.take().expect("stderr is piped");
        let stdout_thread = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stdout_pipe.read_to_end(&mut buf).map(|_| buf)
        });
        let stderr_thread = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stderr_pipe.read_to_end(&mut buf).map(|_| buf)
        });

        let status = loop {
            if token.canceled() {
                // Cooperative cancellation: kill, reap, and report Canceled
                // without touching the partial output.
                let _ = child.kill();
                let _ = child.wait();
                let _ = stdout_thread.join();
                let _ = stderr_thread.join();
                debug!(argv = %invocation.command_line(), "canceled git invocation");
                return Err(GitError::Canceled);
            }
            match child.try_wait()? {
                Some(status) => break status,
                None => std::thread::sleep(POLL_INTERVAL),
            }
        };

        let stdout = stdout_thread
            .join()
            .map_err(|_| GitError::failure(invocation.command_line(), b"stdout reader panicked"))??;
        let stderr = stderr_thread
            .join()
            .map_err(|_| GitError::failure(invocation.command_line(), b"stderr reader panicked"))??;
        let code = status.code().unwrap_or(-1);
        debug!(
            argv = %invocation.command_line(),
            code,
            stderr = %stderr.as_bstr().to_str_lossy().trim_end(),
            "git exited"
        );
        Ok(ExecOutput {
            stdout: BString::from(stdout),
            stderr: BString::from(stderr),
            code,
        })
    }
}
