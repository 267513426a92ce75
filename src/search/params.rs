//! Filter state from a shared link
//!
//! Links like `tours.html?island=maui&activity=Snorkel&q=sunset` seed the
//! initial filter state. Unknown keys are ignored, malformed numbers are
//! dropped with a warning.

use super::filter::FilterState;
use super::sort::SortKey;
use crate::error::AppError;
use tracing::warn;
use url::form_urlencoded;
use url::Url;

impl FilterState {
    /// Parse a raw query string, with or without the leading `?`
    pub fn from_query_string(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut state = FilterState::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "island" => state.island = Some(value.to_lowercase()),
                "activity" => state.activity = Some(value.to_string()),
                "q" | "search" => state.search = Some(value.to_lowercase()),
                "sort" => state.sort = SortKey::parse_lenient(value),
                "min_price" | "minPrice" => state.price.min = parse_price(&key, value),
                "max_price" | "maxPrice" => state.price.max = parse_price(&key, value),
                _ => {}
            }
        }

        state
    }

    /// Parse the query part of a full link
    pub fn from_url(link: &str) -> Result<Self, AppError> {
        let url = Url::parse(link)
            .map_err(|e| AppError::InvalidInput(format!("Invalid link '{}': {}", link, e)))?;
        Ok(Self::from_query_string(url.query().unwrap_or("")))
    }

    /// Inverse of `from_query_string`, for building shareable links
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(island) = self.island_filter() {
            out.append_pair("island", &island);
        }
        if let Some(activity) = self.activity.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            out.append_pair("activity", activity);
        }
        if let Some(q) = self.search_filter() {
            out.append_pair("q", &q);
        }
        if self.sort != SortKey::Featured {
            out.append_pair("sort", self.sort.as_str());
        }
        if let Some(min) = self.price.min {
            out.append_pair("min_price", &min.to_string());
        }
        if let Some(max) = self.price.max {
            out.append_pair("max_price", &max.to_string());
        }
        out.finish()
    }
}

fn parse_price(key: &str, value: &str) -> Option<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            warn!("Ignoring link parameter {}={:?}", key, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_params() {
        let state = FilterState::from_query_string("?island=Maui&activity=Snorkel&q=Sunset%20Sail");
        assert_eq!(state.island.as_deref(), Some("maui"));
        assert_eq!(state.activity.as_deref(), Some("Snorkel"));
        assert_eq!(state.search.as_deref(), Some("sunset sail"));
        assert_eq!(state.sort, SortKey::Featured);
    }

    #[test]
    fn test_plus_is_space() {
        let state = FilterState::from_query_string("q=big+island");
        assert_eq!(state.search.as_deref(), Some("big island"));
    }

    #[test]
    fn test_sort_and_prices() {
        let state = FilterState::from_query_string("sort=price-low&min_price=50&maxPrice=200");
        assert_eq!(state.sort, SortKey::PriceLow);
        assert_eq!(state.price.min, Some(50.0));
        assert_eq!(state.price.max, Some(200.0));
    }

    #[test]
    fn test_bad_values_ignored() {
        let state = FilterState::from_query_string("min_price=cheap&max_price=-5&island=&color=red");
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_from_url() {
        let state = FilterState::from_url("https://example.com/tours.html?island=kauai").unwrap();
        assert_eq!(state.island.as_deref(), Some("kauai"));

        let state = FilterState::from_url("https://example.com/tours.html").unwrap();
        assert_eq!(state, FilterState::default());

        assert!(FilterState::from_url("not a link").is_err());
    }

    #[test]
    fn test_query_string_round_trip() {
        let state = FilterState::default()
            .with_island("oahu")
            .with_activity("Boat Tour")
            .with_search("whale")
            .with_sort(SortKey::Quality)
            .with_price(Some(10.0), None);
        let qs = state.to_query_string();
        assert_eq!(FilterState::from_query_string(&qs), state);
    }
}
