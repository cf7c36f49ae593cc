//! Pipeline entry points.
//!
//! - `run_monitor`: fetch every target, detect changes, notify once
//! - `run_validate`: check the configuration
//! - `run_status`: list stored fingerprints

pub mod detect;
pub mod run;
pub mod status;
pub mod validate;

use std::sync::Arc;
use std::time::Duration;

pub use detect::ChangeDetector;
pub use run::{Monitor, RunReport, TargetError, TargetStatus};
pub use status::{collect_status, run_status};
pub use validate::run_validate;

use crate::error::Result;
use crate::logging::Logger;
use crate::models::Config;
use crate::services::{ContentExtractor, HttpFetcher, Notifier, Transport};
use crate::storage::LocalStore;

/// Wire the configured components and execute one run.
pub async fn run_monitor(
    config: &Config,
    transport: Box<dyn Transport>,
    recipients: Vec<String>,
    logger: &Logger,
) -> Result<RunReport> {
    config.validate()?;

    let store = LocalStore::new(&config.paths, config.monitor.min_content_length, logger);
    let detector = ChangeDetector::new(
        ContentExtractor::new(&config.extract),
        Arc::new(store),
        logger,
    );
    let notifier = Notifier::new(transport, recipients, &config.mail.sender_name, logger);
    let monitor = Monitor::new(
        config.targets()?,
        detector,
        notifier,
        Duration::from_millis(config.monitor.target_delay_ms),
        logger,
    );

    let mut fetcher = HttpFetcher::new(config.fetch.clone(), logger);
    monitor.run(&mut fetcher).await
}
