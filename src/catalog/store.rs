//! Catalog Store: the immutable list of tours for a session
//!
//! Loaded once from a local JSON file or a single HTTP GET. Every derived view
//! (filtered, sorted, shuffled) holds shared handles to the same records, so
//! nothing downstream can mutate the source.

use super::tour::Tour;
use crate::error::AppError;
use crate::http;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Where the catalog JSON array comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// Anything starting with http:// or https:// is fetched, everything else is a path
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            CatalogSource::Url(trimmed.to_string())
        } else {
            CatalogSource::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Immutable catalog of tours
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    tours: Arc<[Arc<Tour>]>,
}

impl CatalogStore {
    pub fn new(tours: Vec<Tour>) -> Self {
        Self {
            tours: tours.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of tour records
    pub fn from_json(data: &[u8]) -> Result<Self, AppError> {
        let tours: Vec<Tour> = serde_json::from_slice(data)?;
        Ok(Self::new(tours))
    }

    /// Load the catalog from its source
    pub async fn load(source: &CatalogSource, timeout: Duration) -> Result<Self, AppError> {
        let store = match source {
            CatalogSource::File(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    AppError::CatalogFetchFailed(format!("{}: {}", path.display(), e))
                })?;
                Self::from_json(&data)?
            }
            CatalogSource::Url(url) => {
                let client = http::client_with_timeout(timeout)?;
                let tours: Vec<Tour> = http::get_json(&client, url).await?;
                Self::new(tours)
            }
        };

        info!("Loaded {} tours from {}", store.len(), source);
        Ok(store)
    }

    /// Load the catalog, degrading to an empty store on any failure.
    ///
    /// Returns the store together with the error that caused the fallback so
    /// the presentation layer can show its error placeholder.
    pub async fn load_or_empty(
        source: &CatalogSource,
        timeout: Duration,
    ) -> (Self, Option<AppError>) {
        match Self::load(source, timeout).await {
            Ok(store) => (store, None),
            Err(e) => {
                error!("Error loading tours from {}: {}", source, e);
                (Self::empty(), Some(e))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Tour>> {
        self.tours.iter()
    }

    /// Shared handles to every record, in catalog order
    pub fn to_view(&self) -> Vec<Arc<Tour>> {
        self.tours.to_vec()
    }

    /// True when any record carries a price, i.e. price filtering and the
    /// price-weighted featured score are meaningful for this catalog
    pub fn is_price_aware(&self) -> bool {
        self.tours.iter().any(|t| t.has_price())
    }

    /// A new store with the same records in a different order
    pub fn reordered(&self, order: Vec<Arc<Tour>>) -> Self {
        debug_assert_eq!(order.len(), self.len());
        Self {
            tours: order.into(),
        }
    }
}
