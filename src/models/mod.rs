// src/models/mod.rs

//! Domain models for the monitor.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod snapshot;
mod target;

// Re-export all public types
pub use config::{
    Config, Credentials, ExtractConfig, FetchConfig, MailConfig, MonitorConfig, PathsConfig,
    TargetEntry,
};
pub use snapshot::{ContentMap, HashIndex, RecordOutcome, Snapshot, SnapshotMeta};
pub use target::{Target, display_name};
