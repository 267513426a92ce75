//! HTTP client utilities
//!
//! Provides a reqwest::Client configured with a timeout. reqwest already
//! honours HTTP_PROXY / HTTPS_PROXY / NO_PROXY from the environment.

use crate::error::AppError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Build a reqwest Client with the given timeout
pub fn client_with_timeout(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("wanderhawaii/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Single GET of a JSON document. No retry: callers decide how to degrade.
pub async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, AppError> {
    debug!("GET {}", url);

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(AppError::CatalogFetchFailed(format!(
            "GET {} returned {}",
            url, status
        )));
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
