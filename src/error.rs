// SPDX-License-Identifier: GPL-2.0-only

//! Error taxonomy for git command execution.
//!
//! Three families of failures are distinguished. Validation errors are raised
//! before any process is spawned. Recognized git-domain failures map to typed
//! variants when the command has no meaningful partial result (deleting a
//! branch, showing a missing object); commands with rich result types fold the
//! equivalent conditions into their result status instead. Anything
//! unrecognized becomes [`GitError::Failure`] carrying the raw stderr and the
//! offending command line, so no failure is silently swallowed.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    /// The operation was canceled through the shared [`CancelToken`].
    ///
    /// Not an error in the usual sense: the pipeline stops, the child process
    /// is killed, and no parser runs for the aborted step.
    ///
    /// [`CancelToken`]: crate::progress::CancelToken
    #[error("operation canceled")]
    Canceled,

    /// Fallback for stderr no parser recognized.
    #[error("`git {command}` failed: {stderr}")]
    Failure { command: String, stderr: String },

    /// `git` exited nonzero without printing anything to stderr and without
    /// the command family defining mixed-output semantics.
    #[error("`git {command}` exited with code {code}")]
    UnexpectedExit { command: String, code: i32 },

    /// The `git` executable could not be spawned at all.
    #[error("could not execute `git`: {0}")]
    Exec(#[source] std::io::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("missing object or invalid revision `{0}`")]
    MissingObject(String),

    #[error("branch `{0}` is not fully merged")]
    BranchNotFullyMerged(String),

    #[error("branch `{0}` is the currently checked-out branch and cannot be deleted")]
    CannotDeleteCurrentBranch(String),

    #[error("`{0}` does not lie under the repository root `{1}`")]
    OutsideRepository(PathBuf, PathBuf),

    #[error("source `{0}` does not exist")]
    SourceDoesNotExist(PathBuf),

    #[error("target `{0}` already exists")]
    TargetExists(PathBuf),

    #[error("target `{0}` does not exist")]
    TargetDoesNotExist(PathBuf),

    #[error("target `{1}` lies under source `{0}`")]
    TargetUnderSource(PathBuf, PathBuf),

    #[error("cannot move the working tree root")]
    CannotMoveWorkTreeRoot,

    #[error("remote `{0}` not found")]
    RemoteNotFound(String),

    #[error("malformed config at line {0}: {1}")]
    ConfigParse(usize, String),
}

impl GitError {
    /// Build the generic fallback failure from a command line and raw stderr.
    pub(crate) fn failure(command: impl Into<String>, stderr: &[u8]) -> GitError {
        use bstr::ByteSlice;
        GitError::Failure {
            command: command.into(),
            stderr: stderr.to_str_lossy().trim_end().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GitError>;
