// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! commit-notify-git: repository access for commit-notify
//!
//! This library crate finds the commits a notification run has to announce,
//! numbers them against the main line of development and moves the marker
//! tag once they have been delivered.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use commit_notify_git::{GitRepo, HistoryIndex};
//!
//! let repo = GitRepo::discover(".").expect("open repo");
//! let head = repo.head_sha().expect("resolve HEAD");
//! let pending = repo.commits_between(Some("SlackCommits"), &head).expect("walk");
//! let index = HistoryIndex::new(repo.mainline("dev").expect("walk dev"));
//!
//! for c in pending {
//!     println!("{:?} {}", index.ordinal(&c.sha), c.subject());
//! }
//! ```

pub mod commit;
pub mod error;
pub mod history;
pub mod repo;

pub use commit::Commit;
pub use error::GitError;
pub use history::HistoryIndex;
pub use repo::GitRepo;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::Commit;
    pub use crate::error::GitError;
    pub use crate::history::HistoryIndex;
    pub use crate::repo::GitRepo;
}
