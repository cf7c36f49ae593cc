// src/pipeline/status.rs

//! Stored fingerprint overview.

use crate::error::Result;
use crate::logging::Logger;
use crate::models::Config;
use crate::storage::FingerprintStore;

/// One row of the status listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub name: String,
    pub url: String,
    /// `None` when nothing has been recorded yet
    pub recorded: Option<Recorded>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub hash_prefix: String,
    pub timestamp: String,
    pub headings: usize,
}

/// Collect the stored state of every configured target.
pub async fn collect_status(config: &Config, store: &dyn FingerprintStore) -> Result<Vec<StatusLine>> {
    let mut lines = Vec::new();
    for target in config.targets()? {
        let recorded = store.snapshot(&target.url).await.map(|snapshot| Recorded {
            hash_prefix: snapshot.hash.chars().take(12).collect(),
            timestamp: snapshot.timestamp.to_rfc3339(),
            headings: snapshot.content.lines().count(),
        });
        lines.push(StatusLine {
            name: target.name,
            url: target.url,
            recorded,
        });
    }
    Ok(lines)
}

/// Log the stored state of every configured target.
pub async fn run_status(config: &Config, store: &dyn FingerprintStore, logger: &Logger) -> Result<()> {
    logger.header("Stored fingerprints");
    for line in collect_status(config, store).await? {
        match line.recorded {
            Some(recorded) => {
                logger.info(&format!("{} ({})", line.name, line.url));
                logger.sub_item(&format!("Hash: {}…", recorded.hash_prefix));
                logger.sub_item(&format!("Last checked: {}", recorded.timestamp));
                logger.sub_item(&format!("Headings: {}", recorded.headings));
            }
            None => logger.info(&format!("{} ({}) - not recorded yet", line.name, line.url)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PathsConfig, Target, TargetEntry};
    use crate::storage::LocalStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_status_lists_recorded_and_missing() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            paths: PathsConfig {
                data_dir: tmp.path().to_path_buf(),
                ..PathsConfig::default()
            },
            targets: vec![
                TargetEntry {
                    url: "https://www.alpha.com/".into(),
                    name: None,
                },
                TargetEntry {
                    url: "https://www.bravo.com/".into(),
                    name: Some("Bravo".into()),
                },
            ],
            ..Config::default()
        };
        let store = LocalStore::new(&config.paths, 5, &Logger::new());
        store
            .record_snapshot(
                &Target::new("https://www.alpha.com/").unwrap(),
                "First heading\nSecond heading",
            )
            .await
            .unwrap();

        let lines = collect_status(&config, &store).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].name, "ALPHA");
        let recorded = lines[0].recorded.as_ref().unwrap();
        assert_eq!(recorded.headings, 2);
        assert_eq!(recorded.hash_prefix.len(), 12);
        assert_eq!(lines[1].name, "Bravo");
        assert!(lines[1].recorded.is_none());
    }
}
