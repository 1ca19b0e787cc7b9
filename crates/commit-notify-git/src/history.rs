// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Ordinal numbering of the main line of development
//!
//! A commit's ordinal is its zero-based position in the oldest-first history
//! of the main-line branch. Ordinals are display labels only and are never
//! stored.

use std::collections::HashMap;

/// Lookup table from commit SHA to its oldest-first position
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    positions: HashMap<String, usize>,
}

impl HistoryIndex {
    /// Build the index from SHAs ordered oldest first
    ///
    /// If a SHA appears more than once, its first position wins.
    #[must_use]
    pub fn new<I, S>(oldest_first: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positions = HashMap::new();
        for (position, sha) in oldest_first.into_iter().enumerate() {
            positions.entry(sha.into()).or_insert(position);
        }
        Self { positions }
    }

    /// Position of `sha` in the history, `None` if it is not on the main line
    #[must_use]
    pub fn ordinal(&self, sha: &str) -> Option<usize> {
        self.positions.get(sha).copied()
    }

    /// Number of commits in the history
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
