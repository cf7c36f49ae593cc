// src/pipeline/detect.rs

//! Change detection: extraction piped into the fingerprint store.

use std::sync::Arc;

use crate::error::Result;
use crate::logging::Logger;
use crate::models::{RecordOutcome, Target};
use crate::services::ContentExtractor;
use crate::storage::FingerprintStore;

/// Classifies a freshly fetched page against its stored fingerprint.
pub struct ChangeDetector {
    extractor: ContentExtractor,
    store: Arc<dyn FingerprintStore>,
    logger: Logger,
}

impl ChangeDetector {
    pub fn new(extractor: ContentExtractor, store: Arc<dyn FingerprintStore>, logger: &Logger) -> Self {
        Self {
            extractor,
            store,
            logger: logger.scoped("detect"),
        }
    }

    /// Extract, record, and classify. Only [`RecordOutcome::Changed`] counts as a change.
    pub async fn detect(&self, target: &Target, markup: &str) -> Result<RecordOutcome> {
        let content = self.extractor.extract(markup);
        let outcome = self.store.record_snapshot(target, &content).await?;

        match &outcome {
            RecordOutcome::Initial => {
                self.logger
                    .info(&format!("{} - initial fingerprint saved", target.name));
            }
            RecordOutcome::Unchanged => {
                self.logger.info(&format!("{} - no change detected", target.name));
            }
            RecordOutcome::Changed { .. } => {
                self.logger.info(&format!("{} - CHANGE DETECTED", target.name));
            }
            RecordOutcome::Invalid { length } => {
                self.logger.warn(&format!(
                    "{} - extracted content rejected ({} chars)",
                    target.name, length
                ));
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PathsConfig;
    use crate::storage::LocalStore;
    use tempfile::TempDir;

    fn detector(tmp: &TempDir, min_content_length: usize) -> ChangeDetector {
        let paths = PathsConfig {
            data_dir: tmp.path().to_path_buf(),
            ..PathsConfig::default()
        };
        let logger = Logger::new();
        let store = LocalStore::new(&paths, min_content_length, &logger);
        ChangeDetector::new(ContentExtractor::default(), Arc::new(store), &logger)
    }

    fn page(headings: &[&str]) -> String {
        let body: String = headings
            .iter()
            .map(|h| format!("<h2>{}</h2>", h))
            .collect();
        format!("<html><body><nav><h1>Navigation menu entry</h1></nav>{}</body></html>", body)
    }

    #[tokio::test]
    async fn test_detect_lifecycle() {
        let tmp = TempDir::new().unwrap();
        let detector = detector(&tmp, 20);
        let target = Target::new("https://www.example.com/").unwrap();

        let markup = page(&["Weekly bulletin published", "Service changes for March"]);
        assert!(detector.detect(&target, &markup).await.unwrap().is_initial());
        assert!(!detector.detect(&target, &markup).await.unwrap().changed());

        let reordered = page(&[
            "Service changes for March",
            "Weekly bulletin published",
            "Service changes for March",
        ]);
        assert!(!detector.detect(&target, &reordered).await.unwrap().changed());

        let updated = page(&["Weekly bulletin published", "Service changes for April"]);
        assert!(detector.detect(&target, &updated).await.unwrap().changed());
    }

    #[tokio::test]
    async fn test_empty_render_does_not_reset_baseline() {
        let tmp = TempDir::new().unwrap();
        let detector = detector(&tmp, 20);
        let target = Target::new("https://www.example.com/").unwrap();

        let markup = page(&["Weekly bulletin published", "Service changes for March"]);
        detector.detect(&target, &markup).await.unwrap();

        let outcome = detector
            .detect(&target, "<html><body></body></html>")
            .await
            .unwrap();
        assert_eq!(outcome, RecordOutcome::Invalid { length: 0 });

        assert_eq!(
            detector.detect(&target, &markup).await.unwrap(),
            RecordOutcome::Unchanged
        );
    }
}
