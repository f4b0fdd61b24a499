//! Persisted fingerprint state.
//!
//! One plain-text file per monitored source, one fingerprint per line in
//! source-display order, replaced wholesale at the end of a successful
//! cycle. Fingerprints for posts that disappeared from the source drop out
//! with the replacement.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::FileStateStore;

/// Durable record of previously seen fingerprints.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the fingerprints persisted for a source. A missing file is an
    /// empty state, not an error.
    async fn load(&self, source_file: &str) -> Result<Vec<String>>;

    /// Replace the persisted set atomically with the current cycle's
    /// fingerprints. A failure before the swap leaves the previous state
    /// intact.
    async fn replace(&self, source_file: &str, ids: &[String]) -> Result<()>;
}
