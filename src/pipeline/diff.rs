//! Diff of the current post set against the persisted baseline.
//!
//! Decides which normalized, deduplicated posts are "new" since the last
//! run and produces the fingerprint set to persist for the next one.

use std::collections::HashSet;

use crate::models::RawPost;

/// Partition of one poll cycle against the previous baseline.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Posts whose fingerprint was absent from the previous state
    pub new_posts: Vec<RawPost>,

    /// Every current fingerprint, in source-display order
    pub current_ids: Vec<String>,

    /// True on a first run: a baseline was established, nothing is "new"
    pub baseline_only: bool,
}

impl DiffResult {
    pub fn has_new(&self) -> bool {
        !self.new_posts.is_empty()
    }
}

/// Compare the deduplicated current posts against the previously persisted
/// fingerprints.
///
/// An empty previous state signals a first run: nothing is reported as new
/// (no notification storm on initial deployment), but `current_ids` is
/// still computed so the next run has a baseline. Otherwise a post is new
/// iff its fingerprint is absent from the previous state, regardless of
/// its position in the source ordering.
pub fn partition_new(previous: &[String], current: &[RawPost]) -> DiffResult {
    let current_ids: Vec<String> = current.iter().map(|p| p.fingerprint.clone()).collect();

    if previous.is_empty() {
        return DiffResult {
            new_posts: Vec::new(),
            current_ids,
            baseline_only: true,
        };
    }

    let known: HashSet<&str> = previous.iter().map(String::as_str).collect();
    let new_posts = current
        .iter()
        .filter(|post| !known.contains(post.fingerprint.as_str()))
        .cloned()
        .collect();

    DiffResult {
        new_posts,
        current_ids,
        baseline_only: false,
    }
}
