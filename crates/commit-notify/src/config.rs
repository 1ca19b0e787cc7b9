// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for commit-notify
//!
//! Every value has a command-line flag and, except for the boolean switches,
//! an environment variable. The defaults reproduce the behaviour of a plain
//! run in a checkout of the main line: tag `SlackCommits`, branch `dev`,
//! remote `origin`, 100 ms between messages.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::notifier::{MissingMarker, NotifyOptions};

/// Default name of the marker tag
pub const DEFAULT_MARKER: &str = "SlackCommits";

/// Default main-line branch used for ordinals
pub const DEFAULT_BRANCH: &str = "dev";

/// Default remote the marker is pushed to
pub const DEFAULT_REMOTE: &str = "origin";

/// Default pause after each delivered message, in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 100;

/// Announce unpublished git commits to a Slack channel
#[derive(Parser, Debug, Clone)]
#[command(name = "commit-notify")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path inside the repository to announce
    ///
    /// The repository is discovered by walking up from this path.
    #[arg(short = 'C', long, env = "COMMIT_NOTIFY_REPO", default_value = ".")]
    pub repo: PathBuf,

    /// Slack incoming-webhook URL
    ///
    /// Required unless --dry-run is given.
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Tag marking the last announced commit
    #[arg(long, env = "COMMIT_NOTIFY_MARKER", default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// Main-line branch that commit numbers are counted on
    #[arg(long, env = "COMMIT_NOTIFY_BRANCH", default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Remote the marker tag is force-pushed to
    #[arg(long, env = "COMMIT_NOTIFY_REMOTE", default_value = DEFAULT_REMOTE)]
    pub remote: String,

    /// Pause after each delivered message, in milliseconds
    #[arg(long, env = "COMMIT_NOTIFY_DELAY_MS", default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Announce the whole history when the marker tag does not exist yet
    ///
    /// Without this flag a missing marker is an error.
    #[arg(long, default_value = "false")]
    pub from_start: bool,

    /// Print what would be sent without posting or moving the marker
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            webhook_url: None,
            marker: DEFAULT_MARKER.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            delay_ms: DEFAULT_DELAY_MS,
            from_start: false,
            dry_run: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The repository path doesn't exist
    /// - The marker, branch or remote name is empty
    /// - No webhook URL is given outside of a dry run
    /// - The webhook URL is not an absolute `http`/`https` URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.repo.exists() {
            return Err(ConfigError::RepositoryPathNotFound(self.repo.clone()));
        }

        for (name, value) in [
            ("marker", &self.marker),
            ("branch", &self.branch),
            ("remote", &self.remote),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyValue(name));
            }
        }

        match self.webhook_url.as_deref() {
            Some(url) => {
                validate_webhook_url(url)?;
            }
            None if !self.dry_run => return Err(ConfigError::MissingWebhookUrl),
            None => {}
        }

        Ok(())
    }

    /// Pause taken after each delivered message
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Options for a notification run
    #[must_use]
    pub fn notify_options(&self) -> NotifyOptions {
        NotifyOptions {
            marker: self.marker.clone(),
            branch: self.branch.clone(),
            remote: self.remote.clone(),
            delay: self.delay(),
            missing_marker: if self.from_start {
                MissingMarker::AnnounceAll
            } else {
                MissingMarker::Fail
            },
            dry_run: self.dry_run,
        }
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Parse a webhook URL, accepting only absolute `http`/`https` URLs
///
/// # Errors
///
/// Returns `ConfigError::InvalidWebhookUrl` when the URL does not parse or
/// uses another scheme.
pub fn validate_webhook_url(url: &str) -> Result<Url, ConfigError> {
    let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidWebhookUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ConfigError::InvalidWebhookUrl(format!(
            "unsupported scheme '{other}'"
        ))),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepositoryPathNotFound(PathBuf),

    /// A required name was empty
    #[error("The {0} name must not be empty")]
    EmptyValue(&'static str),

    /// No webhook URL outside of a dry run
    #[error("No webhook URL given; pass --webhook-url or set SLACK_WEBHOOK_URL")]
    MissingWebhookUrl,

    /// Webhook URL could not be used
    #[error("Invalid webhook URL: {0}")]
    InvalidWebhookUrl(String),
}
