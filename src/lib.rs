// src/lib.rs

//! pagewatch library: heading fingerprints, change detection, notification.

pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
