// src/pipeline/run.rs

//! Run orchestration.
//!
//! One sequential pass over the configured targets. A failing target is
//! recorded and skipped; structural failures (resource acquisition, store
//! writes, notification delivery) end the run. The fetcher is released on
//! every exit path.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::logging::Logger;
use crate::models::{RecordOutcome, Target};
use crate::pipeline::ChangeDetector;
use crate::services::{FetchGuard, Fetcher, Notifier};

/// A target that could not be checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetError {
    pub target: Target,
    pub message: String,
}

/// Per-target result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    Recorded(RecordOutcome),
    Failed(String),
}

/// Summary of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// Every target in processing order
    pub statuses: Vec<(Target, TargetStatus)>,
    /// Targets whose fingerprint changed, in processing order
    pub changed: Vec<Target>,
    /// Targets that failed, in processing order
    pub errors: Vec<TargetError>,
    /// Whether a notification went out
    pub notified: bool,
}

impl RunReport {
    fn new() -> Self {
        let now = Local::now();
        Self {
            started_at: now,
            finished_at: now,
            statuses: Vec::new(),
            changed: Vec::new(),
            errors: Vec::new(),
            notified: false,
        }
    }

    fn count(&self, label: &str) -> usize {
        self.statuses
            .iter()
            .filter(|(_, status)| match status {
                TargetStatus::Recorded(outcome) => outcome.label() == label,
                TargetStatus::Failed(_) => label == "failed",
            })
            .count()
    }
}

/// Drives fetch → detect → notify over all targets.
pub struct Monitor {
    targets: Vec<Target>,
    detector: ChangeDetector,
    notifier: Notifier,
    target_delay: Duration,
    logger: Logger,
}

impl Monitor {
    pub fn new(
        targets: Vec<Target>,
        detector: ChangeDetector,
        notifier: Notifier,
        target_delay: Duration,
        logger: &Logger,
    ) -> Self {
        Self {
            targets,
            detector,
            notifier,
            target_delay,
            logger: logger.scoped("run"),
        }
    }

    /// Execute one run. The fetcher is closed before this returns.
    pub async fn run(&self, fetcher: &mut dyn Fetcher) -> Result<RunReport> {
        self.logger
            .header(&format!("PAGE MONITOR - watching {} target(s)", self.targets.len()));

        let result = {
            let mut guard = FetchGuard::new(fetcher);
            self.check_all(&mut guard).await
        };

        match &result {
            Ok(report) => self.log_summary(report),
            Err(e) => self.logger.error(&format!("Run failed: {}", e)),
        }
        result
    }

    async fn check_all(&self, fetcher: &mut FetchGuard<'_>) -> Result<RunReport> {
        let mut report = RunReport::new();

        for (idx, target) in self.targets.iter().enumerate() {
            if idx > 0 && !self.target_delay.is_zero() {
                tokio::time::sleep(self.target_delay).await;
            }

            self.logger
                .info(&format!("Checking {} ({})", target.name, target.url));

            match self.check(fetcher, target).await {
                Ok(outcome) => {
                    if outcome.changed() {
                        report.changed.push(target.clone());
                    }
                    report
                        .statuses
                        .push((target.clone(), TargetStatus::Recorded(outcome)));
                }
                Err(e) if e.is_structural() => return Err(e),
                Err(e) => {
                    let message = e.to_string();
                    self.logger.error(&format!("{} - {}", target.name, message));
                    report
                        .statuses
                        .push((target.clone(), TargetStatus::Failed(message.clone())));
                    report.errors.push(TargetError {
                        target: target.clone(),
                        message,
                    });
                }
            }
        }

        if report.changed.is_empty() {
            self.logger.info("Run complete - no changes detected");
        } else {
            self.notifier
                .notify(&report.changed, self.targets.len())
                .await?;
            report.notified = true;
            self.logger.info(&format!(
                "Run complete - {} change(s) detected",
                report.changed.len()
            ));
        }

        if !report.errors.is_empty() {
            self.logger
                .warn(&format!("{} target(s) failed:", report.errors.len()));
            for error in &report.errors {
                self.logger
                    .warn(&format!("  - {}: {}", error.target.name, error.message));
            }
        }

        report.finished_at = Local::now();
        Ok(report)
    }

    async fn check(&self, fetcher: &mut FetchGuard<'_>, target: &Target) -> Result<RecordOutcome> {
        let markup = fetcher.fetch(&target.url).await?;
        self.detector.detect(target, &markup).await
    }

    fn log_summary(&self, report: &RunReport) {
        let elapsed = report.finished_at - report.started_at;
        self.logger.summary(
            "Run",
            &[
                ("Targets", self.targets.len().to_string()),
                ("Changed", report.count("changed").to_string()),
                ("Unchanged", report.count("unchanged").to_string()),
                ("Initial", report.count("initial").to_string()),
                ("Invalid", report.count("invalid").to_string()),
                ("Failed", report.count("failed").to_string()),
                ("Notified", report.notified.to_string()),
                ("Elapsed", format!("{}s", elapsed.num_seconds())),
            ],
        );
    }
}
