// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::FetchConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &FetchConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(AppError::resource)
}

/// Fetch a page body as text, mapping timeouts to their own error.
pub async fn fetch_text(client: &reqwest::Client, url: &str, timeout_secs: u64) -> Result<String> {
    let classify = |e: reqwest::Error| {
        if e.is_timeout() {
            AppError::Timeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            AppError::fetch(url, e)
        }
    };

    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(classify)?;
    response.text().await.map_err(classify)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_with_defaults() {
        assert!(create_async_client(&FetchConfig::default()).is_ok());
    }
}
