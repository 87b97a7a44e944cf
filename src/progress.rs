// SPDX-License-Identifier: GPL-2.0-only

//! Cancellation and notification sinks.
//!
//! Commands accept a [`ProgressMonitor`] and poll its [`CancelToken`] between
//! and within sub-invocations. Cancellation is cooperative: tripping the token
//! makes the runner kill the child process and the pipeline return
//! [`GitError::Canceled`](crate::GitError::Canceled) without running any
//! parser for the aborted step.

use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::model::GitStatus;

/// Shared one-way cancellation flag.
///
/// Cloning yields another handle to the same flag; once tripped it stays
/// tripped for the lifetime of the operation.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Request cancellation of the operation holding this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn canceled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Progress and cancellation sink handed to every command.
pub trait ProgressMonitor {
    /// Token polled by the process runner.
    fn cancel_token(&self) -> &CancelToken;

    fn is_canceled(&self) -> bool {
        self.cancel_token().canceled()
    }

    /// Called when a command fails validation before any process was spawned.
    fn preparations_failed(&self, _message: &str) {}

    /// Called for conditions that are tolerated but worth surfacing, e.g. a
    /// freshly created branch missing from the subsequent listing.
    fn notify_warning(&self, _message: &str) {}
}

/// Monitor with no outputs; useful default for non-interactive callers.
#[derive(Default)]
pub struct NullProgressMonitor {
    token: CancelToken,
}

impl NullProgressMonitor {
    pub fn new() -> NullProgressMonitor {
        NullProgressMonitor::default()
    }

    pub fn with_token(token: CancelToken) -> NullProgressMonitor {
        NullProgressMonitor { token }
    }
}

impl ProgressMonitor for NullProgressMonitor {
    fn cancel_token(&self) -> &CancelToken {
        &self.token
    }
}

/// Per-file notification during add/remove/rename/copy.
pub trait FileListener {
    /// `path` is absolute, `relative` is repository-relative as git printed it.
    fn notify_file(&self, path: &Path, relative: &str);
}

/// Per-entry notification while a status command accumulates its result.
pub trait StatusListener {
    fn notify_status(&self, status: &GitStatus);
}
