// src/models/target.rs

//! Monitored target: a URL plus its display name.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// A monitored page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Full URL, also the store key
    pub url: String,

    /// Short display name used in logs and notifications
    pub name: String,
}

impl Target {
    /// Build a target, deriving the display name from the host.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let name = display_name(&url)?;
        Ok(Self { url, name })
    }

    /// Build a target with an explicit display name.
    ///
    /// The URL is still checked so a bad entry fails at startup.
    pub fn with_name(url: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let url = url.into();
        display_name(&url)?;
        Ok(Self {
            url,
            name: name.into(),
        })
    }
}

/// Derive a display name from a URL.
///
/// `https://www.example.com.br/x` becomes `EXAMPLE`.
pub fn display_name(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::config(format!("URL has no host: {}", url)))?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    let label = host.split('.').next().unwrap_or(host);
    Ok(label.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_www() {
        assert_eq!(
            display_name("https://www.urbs.curitiba.pr.gov.br/transporte/boletim").unwrap(),
            "URBS"
        );
        assert_eq!(display_name("https://www.rektmag.net/").unwrap(), "REKTMAG");
    }

    #[test]
    fn test_display_name_without_www() {
        assert_eq!(display_name("https://news.example.com/a").unwrap(), "NEWS");
        assert_eq!(display_name("http://localhost:8080/").unwrap(), "LOCALHOST");
    }

    #[test]
    fn test_display_name_rejects_bad_urls() {
        assert!(display_name("not a url").is_err());
        assert!(display_name("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_target_with_name_override() {
        let target = Target::with_name("https://www.example.com/", "Example Home").unwrap();
        assert_eq!(target.name, "Example Home");
        assert!(Target::with_name("::", "Broken").is_err());
    }
}
