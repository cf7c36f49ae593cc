// src/services/fetcher.rs

//! Page fetching.
//!
//! A [`Fetcher`] owns a run-scoped resource (for [`HttpFetcher`], the HTTP
//! client) that is created on the first `fetch` and released by `close`.
//! [`FetchGuard`] ties that release to scope exit.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::logging::Logger;
use crate::models::FetchConfig;
use crate::utils::http;

/// Source of raw page markup.
#[async_trait]
pub trait Fetcher: Send {
    /// Load `url` and return its markup.
    async fn fetch(&mut self, url: &str) -> Result<String>;

    /// Release the underlying resource. Safe to call more than once.
    fn close(&mut self);
}

/// HTTP-backed fetcher with a lazily built client.
pub struct HttpFetcher {
    config: FetchConfig,
    client: Option<reqwest::Client>,
    logger: Logger,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig, logger: &Logger) -> Self {
        Self {
            config,
            client: None,
            logger: logger.scoped("fetch"),
        }
    }

    /// Whether the client is currently held.
    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }

    fn client(&mut self) -> Result<reqwest::Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        self.logger.info("Creating HTTP client");
        let client = http::create_async_client(&self.config)?;
        self.client = Some(client.clone());
        Ok(client)
    }

    async fn load(&self, client: &reqwest::Client, url: &str) -> Result<String> {
        let attempts = self.config.attempts.max(1);
        let mut attempt = 1;
        loop {
            match http::fetch_text(client, url, self.config.timeout_secs).await {
                Ok(markup) => return Ok(markup),
                Err(e) if attempt < attempts => {
                    self.logger
                        .warn(&format!("Attempt {} failed for {}: {}", attempt, url, e));
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        let client = self.client()?;
        let mut markup = self.load(&client, url).await?;

        if !has_body(&markup) && self.config.settle_delay_ms > 0 {
            self.logger.info(&format!(
                "No <body> yet in {}, reloading after {}ms",
                url, self.config.settle_delay_ms
            ));
            tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
            markup = self.load(&client, url).await?;
        }
        if !has_body(&markup) {
            self.logger.warn(&format!("No <body> found in {}", url));
        }

        check_markup_size(url, &markup, self.config.min_markup_bytes)?;
        self.logger
            .info(&format!("Page loaded: {} ({} chars)", url, markup.chars().count()));
        Ok(markup)
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            self.logger.info("HTTP client released");
        }
    }
}

/// Minimal readiness check: the document has started its body.
fn has_body(markup: &str) -> bool {
    markup.to_ascii_lowercase().contains("<body")
}

/// Reject markup below the configured size floor.
fn check_markup_size(url: &str, markup: &str, min_bytes: usize) -> Result<()> {
    if markup.len() < min_bytes {
        return Err(AppError::fetch(
            url,
            format!("markup too small ({} bytes)", markup.len()),
        ));
    }
    Ok(())
}

/// Closes the wrapped fetcher when dropped.
pub struct FetchGuard<'a> {
    fetcher: &'a mut dyn Fetcher,
}

impl<'a> FetchGuard<'a> {
    pub fn new(fetcher: &'a mut dyn Fetcher) -> Self {
        Self { fetcher }
    }
}

impl<'a> Deref for FetchGuard<'a> {
    type Target = dyn Fetcher + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.fetcher
    }
}

impl DerefMut for FetchGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.fetcher
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.fetcher.close();
    }
}
