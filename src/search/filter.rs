//! Filter state and Filter Engine
//!
//! The filter state is a value object: callers build a whole new one on each
//! interaction. The engine is a single pass over the catalog keeping records
//! for which every active predicate holds.

use super::matcher::SearchMatcher;
use super::sort::SortKey;
use crate::catalog::{CatalogStore, Tour};
use crate::error::{normalize_query, validate_price_bounds, validate_query, AppError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Requested price window. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Interval overlap: record.min <= requested.max and record.max >= requested.min
    pub fn overlaps(&self, record_min: f64, record_max: f64) -> bool {
        let below_max = self.max.map_or(true, |max| record_min <= max);
        let above_min = self.min.map_or(true, |min| record_max >= min);
        below_max && above_min
    }
}

/// Everything the visitor has chosen. Empty strings and `None` mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterState {
    /// Island, compared case-insensitively against the record's island
    #[serde(default)]
    pub island: Option<String>,
    /// Activity, matched against tags by substring in either direction
    #[serde(default)]
    pub activity: Option<String>,
    /// Price window
    #[serde(default)]
    pub price: PriceRange,
    /// Free-text search
    #[serde(default)]
    pub search: Option<String>,
    /// Sort order applied after filtering
    #[serde(default)]
    pub sort: SortKey,
}

impl FilterState {
    pub fn with_island(mut self, island: impl Into<String>) -> Self {
        self.island = Some(island.into());
        self
    }

    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn with_price(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.price = PriceRange::new(min, max);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Normalized island filter, `None` when inactive
    pub fn island_filter(&self) -> Option<String> {
        active(&self.island).map(normalize_query)
    }

    pub fn activity_filter(&self) -> Option<String> {
        active(&self.activity).map(normalize_query)
    }

    pub fn search_filter(&self) -> Option<String> {
        active(&self.search).map(normalize_query)
    }

    /// True when no predicate is active (sort does not count)
    pub fn is_unfiltered(&self) -> bool {
        self.island_filter().is_none()
            && self.activity_filter().is_none()
            && self.search_filter().is_none()
            && self.price.is_unbounded()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(search) = &self.search {
            validate_query(search)?;
        }
        validate_price_bounds(self.price.min, self.price.max)
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Applies island, activity, price and search predicates to a catalog
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    matcher: SearchMatcher,
}

impl FilterEngine {
    pub fn new(matcher: SearchMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &SearchMatcher {
        &self.matcher
    }

    /// Records passing every active predicate, in catalog order
    pub fn apply(&self, catalog: &CatalogStore, state: &FilterState) -> Vec<Arc<Tour>> {
        let island = state.island_filter();
        let activity = state.activity_filter();
        let query = state.search_filter().map(|q| self.matcher.parse(&q));
        let price = state.price;

        let filtered: Vec<Arc<Tour>> = catalog
            .iter()
            .filter(|tour| island.as_deref().map_or(true, |i| island_matches(tour, i)))
            .filter(|tour| activity.as_deref().map_or(true, |a| activity_matches(tour, a)))
            .filter(|tour| price_matches(tour, &price))
            .filter(|tour| {
                query
                    .as_ref()
                    .map_or(true, |q| self.matcher.matches_parsed(tour, q))
            })
            .cloned()
            .collect();

        debug!(
            "Filtered {} of {} tours (island={:?}, activity={:?}, price={:?}, search={:?})",
            filtered.len(),
            catalog.len(),
            island,
            activity,
            price,
            query.as_ref().map(|q| q.whole_query.as_str())
        );

        filtered
    }
}

/// `island` is already lower-cased
pub fn island_matches(tour: &Tour, island: &str) -> bool {
    tour.island.to_lowercase() == island
}

/// Symmetric partial match so "Snorkel" finds "Snorkeling" and vice versa.
/// `activity` is already lower-cased.
pub fn activity_matches(tour: &Tour, activity: &str) -> bool {
    tour.tags.iter().any(|tag| {
        let tag = tag.to_lowercase();
        tag.contains(activity) || activity.contains(tag.as_str())
    })
}

/// Records without any price always pass
pub fn price_matches(tour: &Tour, range: &PriceRange) -> bool {
    if range.is_unbounded() {
        return true;
    }
    match tour.price_range() {
        Some((min, max)) => range.overlaps(min, max),
        None => true,
    }
}
