//! Runtime configuration
//!
//! Every knob that varied between historical versions of the site (price
//! awareness, synonym table, badge thresholds, load shuffle) lives here as
//! data. The file is JSON; missing fields take their defaults.

use crate::catalog::CatalogSource;
use crate::error::AppError;
use crate::search::{
    FilterEngine, PremiumRule, SearchMatcher, SessionOptions, ShuffleMode, SynonymTable,
    DEFAULT_MATCH_THRESHOLD, DEFAULT_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "WANDERHAWAII_CONFIG";

/// Quality thresholds for card badges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeThresholds {
    pub top_rated: f64,
    pub popular: f64,
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            top_rated: 95.0,
            popular: 85.0,
        }
    }
}

impl BadgeThresholds {
    /// Badge label for a quality score, if it earns one
    pub fn badge_for(&self, quality: f64) -> Option<&'static str> {
        if quality >= self.top_rated {
            Some("Top Rated")
        } else if quality >= self.popular {
            Some("Popular")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Local path or http(s) URL of the tour JSON array
    pub catalog: String,
    pub page_size: usize,
    pub match_threshold: f64,
    /// `None` means detect from the catalog
    pub price_aware: Option<bool>,
    pub shuffle_on_load: ShuffleMode,
    pub premium: PremiumRule,
    pub badges: BadgeThresholds,
    /// JSON object of keyword → related terms replacing the built-in table
    pub synonyms_path: Option<PathBuf>,
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: "tours-data.json".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            price_aware: None,
            shuffle_on_load: ShuffleMode::None,
            premium: PremiumRule::default(),
            badges: BadgeThresholds::default(),
            synonyms_path: None,
            http_timeout_secs: 30,
        }
    }
}

/// Default location: `<config dir>/wanderhawaii/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wanderhawaii").join("config.json"))
}

/// Load configuration: explicit path, then `$WANDERHAWAII_CONFIG`, then the
/// default location if it exists, then built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, AppError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if !env_path.trim().is_empty() {
            return load_config_file(Path::new(env_path.trim()));
        }
    }

    match default_config_path() {
        Some(path) if path.exists() => load_config_file(&path),
        _ => {
            debug!("No config file, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Read and validate one config file
pub fn load_config_file(path: &Path) -> Result<AppConfig, AppError> {
    let data = fs::read_to_string(path).map_err(|e| {
        AppError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let config: AppConfig = serde_json::from_str(&data).map_err(|e| {
        AppError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    config.validate()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page_size == 0 {
            return Err(AppError::ConfigError(
                "page_size must be at least 1".to_string(),
            ));
        }
        if !(self.match_threshold > 0.0 && self.match_threshold <= 1.0) {
            return Err(AppError::ConfigError(format!(
                "match_threshold must be in (0, 1], got {}",
                self.match_threshold
            )));
        }
        if self.http_timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "http_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Built-in table unless `synonyms_path` names a replacement
    pub fn synonym_table(&self) -> Result<SynonymTable, AppError> {
        match &self.synonyms_path {
            Some(path) => SynonymTable::from_file(path),
            None => Ok(SynonymTable::builtin()),
        }
    }

    pub fn filter_engine(&self) -> Result<FilterEngine, AppError> {
        let matcher = SearchMatcher::new(Arc::new(self.synonym_table()?))
            .with_threshold(self.match_threshold);
        Ok(FilterEngine::new(matcher))
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            page_size: self.page_size,
            price_aware: self.price_aware,
            shuffle_on_load: self.shuffle_on_load,
            premium: self.premium.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.match_threshold, 0.6);
        assert_eq!(config.badges.top_rated, 95.0);
        assert_eq!(config.premium.quota_min, 3);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.catalog_source(),
            CatalogSource::File(PathBuf::from("tours-data.json"))
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = write_config(
            r#"{"catalog": "https://example.com/tours.json", "page_size": 24, "shuffle_on_load": "stratified"}"#,
        );
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.page_size, 24);
        assert_eq!(config.shuffle_on_load, ShuffleMode::Stratified);
        assert_eq!(config.match_threshold, 0.6);
        assert!(matches!(config.catalog_source(), CatalogSource::Url(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config(r#"{"page_size": 0}"#);
        assert!(matches!(
            load_config(Some(file.path())),
            Err(AppError::ConfigError(_))
        ));

        let file = write_config(r#"{"match_threshold": 1.5}"#);
        assert!(load_config(Some(file.path())).is_err());

        let file = write_config("not json");
        assert!(matches!(
            load_config(Some(file.path())),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("nope.json")));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_badges() {
        let badges = BadgeThresholds::default();
        assert_eq!(badges.badge_for(97.0), Some("Top Rated"));
        assert_eq!(badges.badge_for(95.0), Some("Top Rated"));
        assert_eq!(badges.badge_for(90.0), Some("Popular"));
        assert_eq!(badges.badge_for(84.9), None);
    }

    #[test]
    fn test_custom_synonyms() {
        let mut synonyms = NamedTempFile::new().unwrap();
        synonyms
            .write_all(br#"{"poke": ["ahi", "raw fish"]}"#)
            .unwrap();
        let config = AppConfig {
            synonyms_path: Some(synonyms.path().to_path_buf()),
            ..AppConfig::default()
        };
        let table = config.synonym_table().unwrap();
        assert_eq!(table.len(), 1);
        assert!(config.filter_engine().is_ok());
    }
}
