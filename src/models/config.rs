//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Target;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Change detection settings
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Page loading behavior
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Heading extraction settings
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Persisted state locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Mail relay settings
    #[serde(default)]
    pub mail: MailConfig,

    /// Pages to monitor, in processing order
    #[serde(default)]
    pub targets: Vec<TargetEntry>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Resolve the configured target list.
    pub fn targets(&self) -> Result<Vec<Target>> {
        self.targets.iter().map(TargetEntry::to_target).collect()
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(AppError::validation("No targets defined"));
        }
        self.targets()?;
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if !(1..=2).contains(&self.fetch.attempts) {
            return Err(AppError::validation("fetch.attempts must be 1 or 2"));
        }
        if self.paths.hash_file.trim().is_empty() || self.paths.content_file.trim().is_empty() {
            return Err(AppError::validation("paths.hash_file and paths.content_file must be set"));
        }
        if self.paths.hash_file == self.paths.content_file {
            return Err(AppError::validation(
                "paths.hash_file and paths.content_file must differ",
            ));
        }
        if self.mail.smtp_host.trim().is_empty() {
            return Err(AppError::validation("mail.smtp_host is empty"));
        }
        Ok(())
    }
}

/// Change detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Extracted content shorter than this (in characters) is ignored
    #[serde(default = "defaults::min_content_length")]
    pub min_content_length: usize,

    /// Pause between targets in milliseconds
    #[serde(default = "defaults::target_delay")]
    pub target_delay_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            min_content_length: defaults::min_content_length(),
            target_delay_ms: defaults::target_delay(),
        }
    }
}

/// Page loading behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for page requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Page load timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Wait before reloading a page whose markup has no `<body>` yet, in
    /// milliseconds (0 disables the reload)
    #[serde(default = "defaults::settle_delay")]
    pub settle_delay_ms: u64,

    /// Markup smaller than this many bytes is rejected (0 disables)
    #[serde(default = "defaults::min_markup_bytes")]
    pub min_markup_bytes: usize,

    /// Page load attempts (1 or 2)
    #[serde(default = "defaults::attempts")]
    pub attempts: u32,

    /// Pause before the second attempt, in milliseconds
    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            settle_delay_ms: defaults::settle_delay(),
            min_markup_bytes: defaults::min_markup_bytes(),
            attempts: defaults::attempts(),
            retry_delay_ms: defaults::retry_delay(),
        }
    }
}

/// Heading extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Headings shorter than this (in characters) are dropped
    #[serde(default = "defaults::min_heading_length")]
    pub min_heading_length: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_heading_length: defaults::min_heading_length(),
        }
    }
}

/// Persisted state locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the store files
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,

    /// Hash index file name
    #[serde(default = "defaults::hash_file")]
    pub hash_file: String,

    /// Content archive file name
    #[serde(default = "defaults::content_file")]
    pub content_file: String,

    /// Marker-delimited archive imported when `content_file` is absent
    #[serde(default)]
    pub legacy_content_file: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
            hash_file: defaults::hash_file(),
            content_file: defaults::content_file(),
            legacy_content_file: None,
        }
    }
}

/// Mail relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP submission host
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// SMTP submission port (STARTTLS)
    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Display name in the From header
    #[serde(default = "defaults::sender_name")]
    pub sender_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            sender_name: defaults::sender_name(),
        }
    }
}

/// A configured target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetEntry {
    /// Page URL
    pub url: String,

    /// Display name override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TargetEntry {
    fn to_target(&self) -> Result<Target> {
        match &self.name {
            Some(name) => Target::with_name(&self.url, name),
            None => Target::new(&self.url),
        }
    }
}

/// SMTP login and recipient list, supplied through the environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    pub recipients: Vec<String>,
}

impl Credentials {
    /// Assemble credentials from raw environment values.
    ///
    /// `recipients` is a comma-separated list; blank entries are dropped.
    pub fn from_env_values(
        user: Option<String>,
        password: Option<String>,
        recipients: Option<String>,
    ) -> Result<Self> {
        let user = user.unwrap_or_default().trim().to_string();
        let password = password.unwrap_or_default();
        let recipients: Vec<String> = recipients
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();

        if user.is_empty() {
            return Err(AppError::config("GMAIL_USER is not set"));
        }
        if password.is_empty() {
            return Err(AppError::config("GMAIL_APP_PASSWORD is not set"));
        }
        if recipients.is_empty() {
            return Err(AppError::config("EMAIL_RECIPIENTS is not set"));
        }

        Ok(Self {
            user,
            password,
            recipients,
        })
    }
}

mod defaults {
    use std::path::PathBuf;

    // Monitor defaults
    pub fn min_content_length() -> usize {
        50
    }
    pub fn target_delay() -> u64 {
        2_000
    }

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn settle_delay() -> u64 {
        0
    }
    pub fn min_markup_bytes() -> usize {
        5_000
    }
    pub fn attempts() -> u32 {
        1
    }
    pub fn retry_delay() -> u64 {
        5_000
    }

    // Extract defaults
    pub fn min_heading_length() -> usize {
        10
    }

    // Path defaults
    pub fn data_dir() -> PathBuf {
        PathBuf::from("data")
    }
    pub fn hash_file() -> String {
        "hash.json".into()
    }
    pub fn content_file() -> String {
        "content.jsonl".into()
    }

    // Mail defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn sender_name() -> String {
        "Page Monitor".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_targets(urls: &[&str]) -> Config {
        Config {
            targets: urls
                .iter()
                .map(|url| TargetEntry {
                    url: url.to_string(),
                    name: None,
                })
                .collect(),
            ..Config::default()
        }
    }

    #[test]
    fn validate_rejects_empty_targets() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn validate_accepts_targets() {
        let config = with_targets(&["https://www.example.com/"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.targets().unwrap()[0].name, "EXAMPLE");
    }

    #[test]
    fn validate_rejects_bad_target_url() {
        let config = with_targets(&["https://www.example.com/", "nope"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = with_targets(&["https://example.com/"]);
        config.fetch.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_three_attempts() {
        let mut config = with_targets(&["https://example.com/"]);
        config.fetch.attempts = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_single_site_profile() {
        let toml = r#"
            [monitor]
            min_content_length = 100

            [fetch]
            timeout_secs = 60
            settle_delay_ms = 10000
            min_markup_bytes = 0
            attempts = 2

            [paths]
            hash_file = "urbs_hash.json"
            content_file = "urbs_content.jsonl"

            [[targets]]
            url = "https://www.urbs.curitiba.pr.gov.br/transporte/boletim-de-transportes"
            name = "URBS"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.min_content_length, 100);
        assert_eq!(config.monitor.target_delay_ms, 2_000);
        assert_eq!(config.fetch.attempts, 2);
        assert_eq!(config.paths.hash_file, "urbs_hash.json");
        assert_eq!(config.paths.legacy_content_file, None);
        assert_eq!(config.mail.smtp_port, 587);
    }

    #[test]
    fn bundled_profiles_keep_archives_apart() {
        let multi: Config = toml::from_str(include_str!("../../data/config.toml")).unwrap();
        let single: Config = toml::from_str(include_str!("../../data/urbs.toml")).unwrap();
        assert!(multi.validate().is_ok());
        assert!(single.validate().is_ok());

        assert_eq!(multi.paths.legacy_content_file.as_deref(), Some("content.txt"));
        assert_eq!(single.paths.legacy_content_file, None);
        assert_ne!(multi.paths.hash_file, single.paths.hash_file);
        assert_ne!(multi.paths.content_file, single.paths.content_file);
        assert_eq!(single.monitor.min_content_length, 100);
    }

    #[test]
    fn credentials_split_recipients() {
        let creds = Credentials::from_env_values(
            Some("bot@example.com".into()),
            Some("secret".into()),
            Some(" a@example.com, ,b@example.com ".into()),
        )
        .unwrap();
        assert_eq!(creds.recipients, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn credentials_reject_missing_values() {
        assert!(Credentials::from_env_values(None, Some("x".into()), Some("a@b.c".into())).is_err());
        assert!(
            Credentials::from_env_values(Some("u".into()), Some("".into()), Some("a@b.c".into()))
                .is_err()
        );
        assert!(
            Credentials::from_env_values(Some("u".into()), Some("x".into()), Some(" , ".into()))
                .is_err()
        );
    }
}
