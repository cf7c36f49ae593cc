// src/models/snapshot.rs

//! Persisted fingerprint records.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Hash index entry for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Lowercase hex SHA-256 of the stored content
    pub hash: String,

    /// When the content was last recorded, in local time
    pub timestamp: DateTime<FixedOffset>,
}

/// Full snapshot of a target at its last successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub hash: String,
    pub timestamp: DateTime<FixedOffset>,
    pub content: String,
}

impl Snapshot {
    /// Split into the hash index entry and the archived content.
    pub fn into_parts(self) -> (SnapshotMeta, String) {
        (
            SnapshotMeta {
                hash: self.hash,
                timestamp: self.timestamp,
            },
            self.content,
        )
    }
}

/// URL → hash index entry.
pub type HashIndex = BTreeMap<String, SnapshotMeta>;

/// URL → extracted content.
pub type ContentMap = BTreeMap<String, String>;

/// Outcome of recording a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First observation, baseline saved
    Initial,
    /// Same hash as before
    Unchanged,
    /// Hash differs from the stored one
    Changed { previous_hash: String },
    /// Content below the minimum length, store untouched
    Invalid { length: usize },
}

impl RecordOutcome {
    /// True for the first observation of a target.
    pub fn is_initial(&self) -> bool {
        matches!(self, Self::Initial)
    }

    /// True only when a prior hash existed and differs.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    /// Short label for logs and status output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Unchanged => "unchanged",
            Self::Changed { .. } => "changed",
            Self::Invalid { .. } => "invalid",
        }
    }
}
