// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! commit-notify library
//!
//! Exposes the configuration, webhook client and notification run used by
//! the `commit-notify` binary, for integration tests and embedding.

pub mod config;
pub mod notifier;
pub mod webhook;

use commit_notify_git::GitRepo;
use tracing::debug;

use crate::config::Config;
use crate::notifier::{NotifyError, Notifier, RunSummary};
use crate::webhook::SlackWebhook;

/// Validate `config`, open the repository and perform one notification run
///
/// # Errors
///
/// Returns `NotifyError::Config` for invalid configuration, otherwise any
/// error of [`Notifier::run`].
pub fn run(config: &Config) -> Result<RunSummary, NotifyError> {
    config.validate()?;

    let repo = GitRepo::discover(&config.repo)?;
    debug!(path = %repo.path().display(), "Opened repository");

    let webhook = config
        .webhook_url
        .as_deref()
        .map(SlackWebhook::new)
        .transpose()?;

    Notifier::new(repo, webhook, config.notify_options()).run()
}
