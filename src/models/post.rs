//! Normalized post records shared by every monitored source.

use serde::{Deserialize, Serialize};

/// A normalized record extracted from a monitored source.
///
/// Two posts with equal `fingerprint` are the same logical post regardless
/// of textual differences elsewhere; the first occurrence wins. Posts are
/// rebuilt on every poll and never persisted — only their fingerprints are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawPost {
    /// Stable identity, unique per logical post
    pub fingerprint: String,

    /// Post title (never empty)
    pub title: String,

    /// Source-native date/metadata label, opaque text kept for display
    pub published_label: String,

    /// URL for display; falls back to a source-level page when the source
    /// exposes no per-item link
    pub detail_link: String,
}

/// Summary of one poll cycle for a single source.
#[derive(Debug, Default)]
pub struct MonitorReport {
    pub source: String,
    pub fetched: usize,
    pub new_posts: usize,
    pub delivery_failures: usize,
    /// True when this cycle only established a first-run baseline
    pub baseline_established: bool,
}
