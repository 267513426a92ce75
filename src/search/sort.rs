//! Sort Stage
//!
//! Orders a filtered view by the selected key. Sorting is stable, so records
//! that compare equal keep the order of the previous stage.

use crate::catalog::Tour;
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Sort keys offered to visitors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    /// Composite score, higher first
    #[default]
    Featured,
    /// Quality score, higher first
    Quality,
    /// Display name, A to Z
    Name,
    /// Remaining availability, higher first
    Availability,
    /// Lowest starting price first
    PriceLow,
    /// Highest top price first
    PriceHigh,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Featured,
        SortKey::Quality,
        SortKey::Name,
        SortKey::Availability,
        SortKey::PriceLow,
        SortKey::PriceHigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Featured => "featured",
            SortKey::Quality => "quality",
            SortKey::Name => "name",
            SortKey::Availability => "availability",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
        }
    }

    /// Lenient parse: unknown keys fall back to `Featured`
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "quality" | "rating" => SortKey::Quality,
            "name" => SortKey::Name,
            "availability" | "popularity" | "popular" => SortKey::Availability,
            "price-low" | "price-asc" => SortKey::PriceLow,
            "price-high" | "price-desc" => SortKey::PriceHigh,
            _ => SortKey::Featured,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<SortKey> for String {
    fn from(value: SortKey) -> Self {
        value.as_str().to_string()
    }
}

impl JsonSchema for SortKey {
    fn schema_name() -> String {
        "SortKey".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// Reorder `view` in place by `key`.
///
/// `price_aware` selects the featured score: quality × top price when the
/// catalog models prices, quality + availability otherwise.
pub fn sort_tours(view: &mut [Arc<Tour>], key: SortKey, price_aware: bool) {
    match key {
        SortKey::Quality => view.sort_by(|a, b| b.quality.total_cmp(&a.quality)),
        SortKey::Name => view.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::Availability => view.sort_by(|a, b| b.availability.cmp(&a.availability)),
        SortKey::PriceLow => view.sort_by(|a, b| cmp_missing_last(low_price(a), low_price(b), false)),
        SortKey::PriceHigh => {
            view.sort_by(|a, b| cmp_missing_last(high_price(a), high_price(b), true))
        }
        SortKey::Featured => view.sort_by(|a, b| {
            featured_score(b, price_aware).total_cmp(&featured_score(a, price_aware))
        }),
    }
}

/// Composite score used by the default ordering
pub fn featured_score(tour: &Tour, price_aware: bool) -> f64 {
    if price_aware {
        tour.quality * high_price(tour).unwrap_or(0.0)
    } else {
        tour.quality + tour.availability as f64
    }
}

/// Prices are read through `Tour::price_range`, so a one-sided record
/// uses its single bound for both ends
fn low_price(tour: &Tour) -> Option<f64> {
    tour.price_range().map(|(min, _)| min)
}

fn high_price(tour: &Tour) -> Option<f64> {
    tour.price_range().map(|(_, max)| max)
}

/// Records without a value go after all others in either direction
fn cmp_missing_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.total_cmp(&a),
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Accent- and case-insensitive ordering, raw text as tie-break
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
