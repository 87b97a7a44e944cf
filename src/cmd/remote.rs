// SPDX-License-Identifier: GPL-2.0-only

//! Remote configuration, edited directly in the repository config file.

use crate::{
    config::GitConfig,
    error::{GitError, Result},
    model::GitRemoteConfig,
};

use super::CommandContext;

fn read_remote(config: &GitConfig, name: &str) -> GitRemoteConfig {
    GitRemoteConfig {
        name: name.to_string(),
        uris: config.get_all("remote", Some(name), "url"),
        push_uris: config.get_all("remote", Some(name), "pushurl"),
        fetch_specs: config.get_all("remote", Some(name), "fetch"),
        push_specs: config.get_all("remote", Some(name), "push"),
    }
}

/// All configured remotes, in config-file order.
pub(crate) fn remotes(ctx: &CommandContext<'_>) -> Result<Vec<GitRemoteConfig>> {
    let config = ctx.repository.config()?;
    Ok(config
        .subsections("remote")
        .iter()
        .map(|name| read_remote(&config, name))
        .collect())
}

pub(crate) fn remote(ctx: &CommandContext<'_>, name: &str) -> Result<GitRemoteConfig> {
    let config = ctx.repository.config()?;
    if !config.subsections("remote").iter().any(|n| n == name) {
        return Err(GitError::RemoteNotFound(name.to_string()));
    }
    Ok(read_remote(&config, name))
}

/// Create or replace a `remote.<name>` section from the given description.
pub(crate) fn set_remote(ctx: &CommandContext<'_>, remote: &GitRemoteConfig) -> Result<()> {
    let mut config = ctx.repository.config()?;
    let name = remote.name.as_str();
    config.unset_section("remote", Some(name));
    for uri in &remote.uris {
        config.add_string("remote", Some(name), "url", uri);
    }
    for uri in &remote.push_uris {
        config.add_string("remote", Some(name), "pushurl", uri);
    }
    for spec in &remote.fetch_specs {
        config.add_string("remote", Some(name), "fetch", spec);
    }
    for spec in &remote.push_specs {
        config.add_string("remote", Some(name), "push", spec);
    }
    config.save()
}

/// Drop a remote and every branch binding that pointed at it.
pub(crate) fn remove_remote(ctx: &CommandContext<'_>, name: &str) -> Result<()> {
    let mut config = ctx.repository.config()?;
    if !config.subsections("remote").iter().any(|n| n == name) {
        return Err(GitError::RemoteNotFound(name.to_string()));
    }
    config.unset_section("remote", Some(name));
    for branch in config.subsections("branch") {
        if config.get_string("branch", Some(&branch), "remote").as_deref() == Some(name) {
            config.unset("branch", Some(&branch), "remote");
            config.unset("branch", Some(&branch), "merge");
        }
    }
    config.save()
}
