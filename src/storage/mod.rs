//! Fingerprint persistence.
//!
//! Each monitor instance keeps two artifacts side by side:
//!
//! ```text
//! {data_dir}/
//! ├── hash.json        # URL → { hash, timestamp }
//! └── content.jsonl    # one {"url", "content"} record per line
//! ```
//!
//! The hash index stays small and is what change detection reads; the
//! archive keeps the extracted headings inspectable. `record_snapshot`
//! rewrites both for the recorded target.

pub mod archive;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ContentMap, HashIndex, RecordOutcome, Snapshot, Target};

// Re-export for convenience
pub use local::LocalStore;

/// Trait for fingerprint storage backends.
#[async_trait]
pub trait FingerprintStore: Send + Sync {
    /// Load the hash index. Missing or unreadable state yields an empty index.
    async fn load_index(&self) -> HashIndex;

    /// Load archived contents, keeping every record that parses.
    async fn load_contents(&self) -> ContentMap;

    /// Replace the hash index.
    async fn save_index(&self, index: &HashIndex) -> Result<()>;

    /// Replace the content archive.
    async fn save_contents(&self, contents: &ContentMap) -> Result<()>;

    /// Store `content` for `target` and classify it against the prior hash.
    ///
    /// Content below the minimum length leaves the store untouched.
    async fn record_snapshot(&self, target: &Target, content: &str) -> Result<RecordOutcome>;

    /// Full stored snapshot for a URL, if both artifacts have it.
    async fn snapshot(&self, url: &str) -> Option<Snapshot>;
}
