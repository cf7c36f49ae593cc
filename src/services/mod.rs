//! Services used by the run pipeline.
//!
//! - `extractor`: markup → heading fingerprint
//! - `fetcher`: URL → markup, with a run-scoped resource
//! - `notifier`: changed targets → one email

pub mod extractor;
pub mod fetcher;
pub mod notifier;

pub use extractor::ContentExtractor;
pub use fetcher::{FetchGuard, Fetcher, HttpFetcher};
pub use notifier::{LogTransport, Notifier, Report, SmtpMailer, Transport};
