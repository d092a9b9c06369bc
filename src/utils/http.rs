// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Read a response body as text, keeping it for error messages.
pub async fn read_body(response: reqwest::Response) -> Result<(reqwest::StatusCode, String)> {
    let status = response.status();
    let text = response.text().await?;
    Ok((status, text))
}
