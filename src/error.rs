//! Error types and handling for the tour catalog pipeline

use serde::Serialize;
use thiserror::Error;

/// Maximum accepted length of a free-text search query, in characters
pub const MAX_QUERY_LEN: usize = 500;

/// Application error types
#[derive(Debug, Error, Serialize)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Catalog fetch failed: {0}")]
    CatalogFetchFailed(String),
    #[error("Catalog parse failed: {0}")]
    CatalogParseFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the error code for tool-server responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::CatalogFetchFailed(_) => "catalog_fetch_failed",
            AppError::CatalogParseFailed(_) => "catalog_parse_failed",
            AppError::ConfigError(_) => "config_error",
            AppError::Timeout(_) => "timeout",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Convert anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert reqwest::Error to AppError
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_status() {
            AppError::CatalogFetchFailed(err.to_string())
        } else if err.is_decode() {
            AppError::CatalogParseFailed(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

/// Convert serde_json::Error to AppError
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::CatalogParseFailed(err.to_string())
    }
}

/// Convert std::io::Error to AppError
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::CatalogFetchFailed(err.to_string())
    }
}

pub fn validate_query(query: &str) -> Result<(), AppError> {
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(AppError::InvalidInput(format!(
            "Query too long, maximum {} characters",
            MAX_QUERY_LEN
        )));
    }

    Ok(())
}

/// Validate an optional price window supplied by a caller
pub fn validate_price_bounds(min: Option<f64>, max: Option<f64>) -> Result<(), AppError> {
    for bound in [min, max].into_iter().flatten() {
        if !bound.is_finite() || bound < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "Price bound must be a non-negative number, got {}",
                bound
            )));
        }
    }

    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(AppError::InvalidInput(format!(
                "Minimum price {} exceeds maximum price {}",
                min, max
            )));
        }
    }

    Ok(())
}

/// Normalize free text the way the search matcher expects it: trimmed and lower-cased
pub fn normalize_query(text: &str) -> String {
    text.trim().to_lowercase()
}
