// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository access
//!
//! Reads go through `git2` revision walks, so commit messages are never
//! parsed out of text output. Publishing the marker shells out to the `git`
//! CLI, which picks up the user's credential helpers and SSH configuration.

use crate::commit::Commit;
use crate::error::GitError;
use chrono::{TimeZone, Utc};
use git2::{ErrorCode, Oid, Repository, Sort};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// A git repository wrapper used by notification runs
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if the path is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Get the repository path (the `.git` directory)
    #[must_use]
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Get the working directory path (None for bare repos)
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Get the SHA of the commit HEAD points to
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if HEAD is unborn or detached onto
    /// something that is not a commit.
    pub fn head_sha(&self) -> Result<String, GitError> {
        let commit = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|_| GitError::InvalidReference {
                reference: "HEAD".to_string(),
            })?;
        Ok(commit.id().to_string())
    }

    /// Check whether a revision (tag, branch or SHA) resolves to a commit
    ///
    /// # Errors
    ///
    /// Returns `GitError` for failures other than the revision being absent.
    pub fn has_reference(&self, reference: &str) -> Result<bool, GitError> {
        match self.repo.revparse_single(reference) {
            Ok(object) => Ok(object.peel_to_commit().is_ok()),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Commits reachable from `head` but not from `since`, oldest first
    ///
    /// With `since == None` the whole history behind `head` is returned.
    /// Parents always come before their children.
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if either revision cannot be
    /// resolved, or `GitError::Git2` if the walk fails.
    pub fn commits_between(&self, since: Option<&str>, head: &str) -> Result<Vec<Commit>, GitError> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)?;
        revwalk.push(self.resolve_commit(head)?)?;
        if let Some(since) = since {
            revwalk.hide(self.resolve_commit(since)?)?;
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let git_commit = self.repo.find_commit(oid_result?)?;
            commits.push(extract_commit(&git_commit));
        }

        debug!(
            since = since.unwrap_or("<root>"),
            head,
            count = commits.len(),
            "Collected unpublished commits"
        );
        Ok(commits)
    }

    /// SHAs of every commit reachable from `branch`, oldest first
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if the branch cannot be resolved.
    pub fn mainline(&self, branch: &str) -> Result<Vec<String>, GitError> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)?;
        revwalk.push(self.resolve_commit(branch)?)?;

        let shas = revwalk
            .map(|oid| oid.map(|oid| oid.to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(branch, count = shas.len(), "Walked main line");
        Ok(shas)
    }

    /// Create or move the annotated tag `name` onto `target`
    ///
    /// The tag message is the tag name. The tagger identity comes from the
    /// repository configuration (`user.name` / `user.email`).
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if `target` does not resolve, or
    /// `GitError::Git2` if no signature is configured or the tag cannot be
    /// written.
    pub fn tag_marker(&self, name: &str, target: &str) -> Result<(), GitError> {
        let oid = self.resolve_commit(target)?;
        let object = self.repo.find_object(oid, None)?;
        let tagger = self.repo.signature()?;
        let tag_oid = self.repo.tag(name, &object, &tagger, name, true)?;
        info!(marker = name, commit = %oid, tag = %tag_oid, "Moved marker tag");
        Ok(())
    }

    /// Force-push the tag `name` to `remote`
    ///
    /// # Errors
    ///
    /// Returns `GitError::Io` if `git` cannot be started and
    /// `GitError::Subprocess` if the push exits unsuccessfully.
    pub fn push_marker(&self, remote: &str, name: &str) -> Result<(), GitError> {
        let refspec = format!("refs/tags/{name}");
        let args = ["push", remote, refspec.as_str(), "--force"];
        let dir = self.repo.workdir().unwrap_or_else(|| self.repo.path());

        let output = Command::new("git").current_dir(dir).args(args).output()?;
        if !output.status.success() {
            return Err(GitError::Subprocess {
                command: format!("git {}", args.join(" ")),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!(marker = name, remote, "Pushed marker tag");
        Ok(())
    }

    /// Resolve a revision to the commit it names
    fn resolve_commit(&self, reference: &str) -> Result<Oid, GitError> {
        self.repo
            .revparse_single(reference)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id())
            .map_err(|_| GitError::InvalidReference {
                reference: reference.to_string(),
            })
    }
}

/// Extract commit metadata from a git2 commit
fn extract_commit(git_commit: &git2::Commit<'_>) -> Commit {
    let timestamp = Utc
        .timestamp_opt(git_commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    Commit {
        sha: git_commit.id().to_string(),
        message: String::from_utf8_lossy(git_commit.message_bytes()).into_owned(),
        author: git_commit.author().name().unwrap_or("Unknown").to_string(),
        timestamp,
    }
}
