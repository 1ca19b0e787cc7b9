// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The notification run
//!
//! A run announces every commit between the marker tag and `HEAD`, oldest
//! first, then moves the marker to the `HEAD` it started from and pushes it.
//! The marker only moves after every message was delivered, so a failed run
//! is retried from the same starting point. Messages sent before the failure
//! are sent again on that retry.
//!
//! # Example
//!
//! ```no_run
//! use commit_notify::notifier::{Notifier, NotifyOptions};
//! use commit_notify::webhook::SlackWebhook;
//! use commit_notify_git::GitRepo;
//!
//! let repo = GitRepo::discover(".").expect("open repo");
//! let webhook = SlackWebhook::new("https://hooks.slack.com/services/T/B/X").expect("webhook");
//! let summary = Notifier::new(repo, webhook, NotifyOptions::default())
//!     .run()
//!     .expect("run");
//! println!("sent {} messages", summary.sent);
//! ```

use std::thread;
use std::time::Duration;

use commit_notify_git::{Commit, GitError, GitRepo, HistoryIndex};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, DEFAULT_BRANCH, DEFAULT_DELAY_MS, DEFAULT_MARKER, DEFAULT_REMOTE};
use crate::webhook::{Messenger, WebhookError};

// ============================================================================
// Error Types
// ============================================================================

/// Notification run errors
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Repository access or a `git` subprocess failed
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// The marker tag does not exist and the run may not start from scratch
    #[error("Marker tag '{marker}' not found; pass --from-start to announce the whole history")]
    MarkerNotFound {
        /// Name of the missing tag
        marker: String,
    },

    /// An unpublished commit is not part of the main line
    #[error("Commit {sha} is not reachable from branch '{branch}'")]
    Lookup {
        /// SHA of the commit that could not be numbered
        sha: String,
        /// Main-line branch that was searched
        branch: String,
    },

    /// The webhook client could not be set up
    #[error("Webhook setup failed: {0}")]
    Webhook(#[from] WebhookError),

    /// The webhook did not accept a message
    #[error("Failed to deliver commit {sha}: {source}")]
    Delivery {
        /// SHA of the commit whose message failed
        sha: String,
        /// Underlying webhook failure
        #[source]
        source: WebhookError,
    },
}

// ============================================================================
// Collaborators
// ============================================================================

/// Version-control operations a run depends on
pub trait VersionControl {
    /// SHA of the commit `HEAD` points to
    fn head_sha(&self) -> Result<String, GitError>;

    /// Whether `reference` resolves to a commit
    fn has_reference(&self, reference: &str) -> Result<bool, GitError>;

    /// Commits reachable from `head` and not from `since`, oldest first
    fn commits_between(&self, since: Option<&str>, head: &str) -> Result<Vec<Commit>, GitError>;

    /// SHAs reachable from `branch`, oldest first
    fn mainline(&self, branch: &str) -> Result<Vec<String>, GitError>;

    /// Create or move the annotated tag `name` onto `target`
    fn tag_marker(&self, name: &str, target: &str) -> Result<(), GitError>;

    /// Force-push the tag `name` to `remote`
    fn push_marker(&self, remote: &str, name: &str) -> Result<(), GitError>;
}

impl VersionControl for GitRepo {
    fn head_sha(&self) -> Result<String, GitError> {
        GitRepo::head_sha(self)
    }

    fn has_reference(&self, reference: &str) -> Result<bool, GitError> {
        GitRepo::has_reference(self, reference)
    }

    fn commits_between(&self, since: Option<&str>, head: &str) -> Result<Vec<Commit>, GitError> {
        GitRepo::commits_between(self, since, head)
    }

    fn mainline(&self, branch: &str) -> Result<Vec<String>, GitError> {
        GitRepo::mainline(self, branch)
    }

    fn tag_marker(&self, name: &str, target: &str) -> Result<(), GitError> {
        GitRepo::tag_marker(self, name, target)
    }

    fn push_marker(&self, remote: &str, name: &str) -> Result<(), GitError> {
        GitRepo::push_marker(self, remote, name)
    }
}

impl<V: VersionControl + ?Sized> VersionControl for &V {
    fn head_sha(&self) -> Result<String, GitError> {
        (**self).head_sha()
    }

    fn has_reference(&self, reference: &str) -> Result<bool, GitError> {
        (**self).has_reference(reference)
    }

    fn commits_between(&self, since: Option<&str>, head: &str) -> Result<Vec<Commit>, GitError> {
        (**self).commits_between(since, head)
    }

    fn mainline(&self, branch: &str) -> Result<Vec<String>, GitError> {
        (**self).mainline(branch)
    }

    fn tag_marker(&self, name: &str, target: &str) -> Result<(), GitError> {
        (**self).tag_marker(name, target)
    }

    fn push_marker(&self, remote: &str, name: &str) -> Result<(), GitError> {
        (**self).push_marker(remote, name)
    }
}

// ============================================================================
// Options and results
// ============================================================================

/// What to do when the marker tag does not exist yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingMarker {
    /// Fail with `NotifyError::MarkerNotFound` before sending anything
    #[default]
    Fail,
    /// Treat the whole history behind `HEAD` as unpublished
    AnnounceAll,
}

/// Options for a notification run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOptions {
    /// Marker tag name
    pub marker: String,
    /// Main-line branch used for ordinals
    pub branch: String,
    /// Remote the marker is pushed to
    pub remote: String,
    /// Pause after each delivered message
    pub delay: Duration,
    /// First-run behaviour
    pub missing_marker: MissingMarker,
    /// Compose messages without sending them or moving the marker
    pub dry_run: bool,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            missing_marker: MissingMarker::default(),
            dry_run: false,
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `HEAD` at the start of the run
    pub head: String,
    /// Unpublished commits found
    pub pending: usize,
    /// Messages composed (sent, or printed in a dry run)
    pub announced: usize,
    /// Messages accepted by the webhook
    pub sent: usize,
    /// Empty and merge commits left out
    pub skipped: usize,
    /// Whether the marker was moved and pushed
    pub marker_moved: bool,
}

// ============================================================================
// Message rules
// ============================================================================

/// Whether a commit body is left out of the channel
///
/// Empty messages and messages starting with `Merge` are never announced.
#[must_use]
pub fn is_ignored(body: &str) -> bool {
    body.is_empty() || body.starts_with("Merge")
}

/// Text posted for a commit: its ordinal in bold, then the message
#[must_use]
pub fn compose(ordinal: usize, body: &str) -> String {
    format!("*{ordinal}* {body}")
}

// ============================================================================
// Notifier
// ============================================================================

/// Announces unpublished commits through a messenger
pub struct Notifier<V, M> {
    vcs: V,
    messenger: M,
    options: NotifyOptions,
}

impl<V: VersionControl, M: Messenger> Notifier<V, M> {
    /// Create a notifier over a repository and a messenger
    pub fn new(vcs: V, messenger: M, options: NotifyOptions) -> Self {
        Self {
            vcs,
            messenger,
            options,
        }
    }

    /// Announce every unpublished commit, then advance and push the marker
    ///
    /// # Errors
    ///
    /// Fails on the first error and leaves the marker where it was:
    /// - `NotifyError::MarkerNotFound` if the marker is missing and
    ///   `MissingMarker::Fail` is set
    /// - `NotifyError::Lookup` if a commit is not on the main line
    /// - `NotifyError::Delivery` if the webhook rejects a message
    /// - `NotifyError::Git` if repository access or the push fails
    pub fn run(&self) -> Result<RunSummary, NotifyError> {
        let options = &self.options;
        let head = self.vcs.head_sha()?;
        let since = self.starting_point()?;

        let pending = self.vcs.commits_between(since, &head)?;
        info!(
            marker = %options.marker,
            head = %head,
            count = pending.len(),
            "Found unpublished commits"
        );

        let history = HistoryIndex::new(self.vcs.mainline(&options.branch)?);
        debug!(branch = %options.branch, commits = history.len(), "Indexed main line");

        let mut summary = RunSummary {
            head: head.clone(),
            pending: pending.len(),
            ..Default::default()
        };

        for commit in &pending {
            let body = commit.body();
            if is_ignored(body) {
                info!(sha = commit.short_sha(), "Ignoring {body}");
                summary.skipped += 1;
                continue;
            }

            let ordinal = history
                .ordinal(&commit.sha)
                .ok_or_else(|| NotifyError::Lookup {
                    sha: commit.sha.clone(),
                    branch: options.branch.clone(),
                })?;

            let text = compose(ordinal, body);
            info!(sha = commit.short_sha(), author = %commit.author, "{text}");
            summary.announced += 1;

            if options.dry_run {
                continue;
            }

            self.messenger
                .post(&text)
                .map_err(|source| NotifyError::Delivery {
                    sha: commit.sha.clone(),
                    source,
                })?;
            summary.sent += 1;

            if !options.delay.is_zero() {
                thread::sleep(options.delay);
            }
        }

        if options.dry_run {
            info!(marker = %options.marker, "Dry run, marker left in place");
            return Ok(summary);
        }

        self.vcs.tag_marker(&options.marker, &head)?;
        self.vcs.push_marker(&options.remote, &options.marker)?;
        summary.marker_moved = true;

        Ok(summary)
    }

    /// Lower bound of the unpublished range, `None` for the whole history
    fn starting_point(&self) -> Result<Option<&str>, NotifyError> {
        let marker = self.options.marker.as_str();
        if self.vcs.has_reference(marker)? {
            return Ok(Some(marker));
        }

        match self.options.missing_marker {
            MissingMarker::Fail => Err(NotifyError::MarkerNotFound {
                marker: marker.to_string(),
            }),
            MissingMarker::AnnounceAll => {
                warn!(marker, "Marker tag missing, announcing the whole history");
                Ok(None)
            }
        }
    }
}
