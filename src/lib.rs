// SPDX-License-Identifier: GPL-2.0-only

//! Typed driver for the external `git` executable.
//!
//! Each command is a pipeline of one or more `git` sub-invocations whose
//! text output is parsed into typed results; nothing links against a git
//! library. A [`GitClient`] is bound to one [`Repository`] and exposes one
//! method per command family. All methods are synchronous and cooperatively
//! cancelable through a [`CancelToken`] carried by the caller's
//! [`ProgressMonitor`].
//!
//! ```no_run
//! use gitpipe::{GitClient, NullProgressMonitor};
//!
//! let client = GitClient::new("/path/to/repo");
//! let monitor = NullProgressMonitor::new();
//! let branches = client.branches(true, &monitor)?;
//! for branch in branches.values() {
//!     println!("{} {}", branch.id, branch.name);
//! }
//! # Ok::<(), gitpipe::GitError>(())
//! ```

mod client;
mod cmd;
mod exec;
mod parse;

pub mod config;
pub mod error;
pub mod model;
pub mod progress;
pub mod repository;

pub use self::client::GitClient;
pub use self::cmd::merge::FastForwardOption;
pub use self::cmd::pick::CherryPickOperation;
pub use self::cmd::rebase::RebaseOperation;
pub use self::cmd::reset::ResetType;
pub use self::config::GitConfig;
pub use self::error::{GitError, Result};
pub use self::model::*;
pub use self::progress::{
    CancelToken, FileListener, NullProgressMonitor, ProgressMonitor, StatusListener,
};
pub use self::repository::Repository;
