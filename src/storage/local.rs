//! Local filesystem store.
//!
//! ## Features
//!
//! - **Atomic writes**: every artifact is written to a temp file and renamed
//! - **Tolerant reads**: corrupt files degrade to empty state with a warning
//! - **Legacy import**: a marker-delimited archive is read when the
//!   line-record archive does not exist yet

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::logging::Logger;
use crate::models::{ContentMap, HashIndex, PathsConfig, RecordOutcome, Snapshot, SnapshotMeta, Target};
use crate::storage::{FingerprintStore, archive};
use crate::utils::content_hash;

/// Filesystem-backed fingerprint store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
    hash_file: String,
    content_file: String,
    legacy_content_file: Option<String>,
    min_content_length: usize,
    logger: Logger,
}

impl LocalStore {
    /// Create a store from the configured paths.
    pub fn new(paths: &PathsConfig, min_content_length: usize, logger: &Logger) -> Self {
        Self {
            root_dir: paths.data_dir.clone(),
            hash_file: paths.hash_file.clone(),
            content_file: paths.content_file.clone(),
            legacy_content_file: paths
                .legacy_content_file
                .clone()
                .filter(|name| !name.trim().is_empty()),
            min_content_length,
            logger: logger.scoped("store"),
        }
    }

    /// Get the full path for a file name.
    fn path(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(name);
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let tmp = self.path(&format!("{}.tmp", name));
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read text, returning None if the file doesn't exist.
    async fn read_text(&self, name: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path(name)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Whether content is long enough to be trusted as a baseline.
    fn is_valid_content(&self, content: &str) -> bool {
        !content.is_empty() && content.chars().count() >= self.min_content_length
    }

    /// Record with an explicit timestamp.
    pub async fn record_snapshot_at(
        &self,
        target: &Target,
        content: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<RecordOutcome> {
        if !self.is_valid_content(content) {
            let length = content.chars().count();
            self.logger.debug(&format!(
                "{} - invalid content ({} chars, minimum {}), store untouched",
                target.name, length, self.min_content_length
            ));
            return Ok(RecordOutcome::Invalid { length });
        }

        let mut index = self.load_index().await;
        let mut contents = self.load_contents().await;
        // Archive keys must mirror the index; drops imported blocks for unknown URLs.
        contents.retain(|url, _| index.contains_key(url));

        let new_hash = content_hash(content);
        let previous = index.get(&target.url).map(|meta| meta.hash.clone());

        let (meta, content) = Snapshot {
            hash: new_hash.clone(),
            timestamp,
            content: content.to_string(),
        }
        .into_parts();

        contents.insert(target.url.clone(), content);
        index.insert(target.url.clone(), meta);
        self.save_contents(&contents).await?;
        self.save_index(&index).await?;

        let outcome = match previous {
            None => RecordOutcome::Initial,
            Some(old) if old.is_empty() => RecordOutcome::Initial,
            Some(old) if old == new_hash => RecordOutcome::Unchanged,
            Some(old) => RecordOutcome::Changed { previous_hash: old },
        };
        self.logger.debug(&format!(
            "{} - recorded {} ({})",
            target.name,
            &new_hash[..12],
            outcome.label()
        ));
        Ok(outcome)
    }
}

#[async_trait]
impl FingerprintStore for LocalStore {
    async fn load_index(&self) -> HashIndex {
        let text = match self.read_text(&self.hash_file).await {
            Ok(Some(text)) => text,
            Ok(None) => return HashIndex::new(),
            Err(e) => {
                self.logger
                    .warn(&format!("Failed to read {}: {}", self.hash_file, e));
                return HashIndex::new();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            self.logger.warn(&format!(
                "Corrupt hash index {}: {}. Starting without history.",
                self.hash_file, e
            ));
            HashIndex::new()
        })
    }

    async fn load_contents(&self) -> ContentMap {
        match self.read_text(&self.content_file).await {
            Ok(Some(text)) => {
                let decoded = archive::decode(&text);
                if !decoded.skipped_lines.is_empty() {
                    self.logger.warn(&format!(
                        "Skipped {} damaged record(s) in {} (lines {:?})",
                        decoded.skipped_lines.len(),
                        self.content_file,
                        decoded.skipped_lines
                    ));
                }
                return decoded.contents;
            }
            Ok(None) => {}
            Err(e) => {
                self.logger
                    .warn(&format!("Failed to read {}: {}", self.content_file, e));
                return ContentMap::new();
            }
        }

        let Some(legacy) = &self.legacy_content_file else {
            return ContentMap::new();
        };
        match self.read_text(legacy).await {
            Ok(Some(text)) => {
                let contents = archive::decode_legacy(&text);
                self.logger.info(&format!(
                    "Imported {} block(s) from legacy archive {}",
                    contents.len(),
                    legacy
                ));
                contents
            }
            Ok(None) => ContentMap::new(),
            Err(e) => {
                self.logger
                    .warn(&format!("Failed to read legacy archive {}: {}", legacy, e));
                ContentMap::new()
            }
        }
    }

    async fn save_index(&self, index: &HashIndex) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(index)?;
        self.write_bytes(&self.hash_file, &bytes).await
    }

    async fn save_contents(&self, contents: &ContentMap) -> Result<()> {
        let text = archive::encode(contents)?;
        self.write_bytes(&self.content_file, text.as_bytes()).await
    }

    async fn record_snapshot(&self, target: &Target, content: &str) -> Result<RecordOutcome> {
        self.record_snapshot_at(target, content, Local::now().fixed_offset())
            .await
    }

    async fn snapshot(&self, url: &str) -> Option<Snapshot> {
        let meta = self.load_index().await.remove(url)?;
        let content = self.load_contents().await.remove(url)?;
        Some(Snapshot {
            hash: meta.hash,
            timestamp: meta.timestamp,
            content,
        })
    }
}
