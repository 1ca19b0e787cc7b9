//! Git commit types

use chrono::{DateTime, Utc};

/// A commit as seen by a notification run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// The commit SHA (40 hex characters)
    pub sha: String,
    /// Full commit message, exactly as stored
    pub message: String,
    /// Author name
    pub author: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

impl Commit {
    /// Get the short SHA (first 7 characters)
    #[must_use]
    pub fn short_sha(&self) -> &str {
        &self.sha[..7.min(self.sha.len())]
    }

    /// Get the first line of the commit message (subject)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.body().lines().next().unwrap_or("")
    }

    /// The message without the newlines git keeps around it
    ///
    /// Inner blank lines and trailing spaces on the last line are preserved.
    #[must_use]
    pub fn body(&self) -> &str {
        self.message.trim_matches(|c| c == '\n' || c == '\r')
    }
}
