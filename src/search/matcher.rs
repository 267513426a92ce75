//! Search Matcher
//!
//! Decides whether one tour matches a free-text query. The decision is
//! boolean and tiered:
//!
//! 1. empty query matches everything
//! 2. the whole query found verbatim in the tour text matches
//! 3. a one-word query matches when any candidate term is found
//! 4. longer queries match when enough words (directly or through one of
//!    their expansions) are found: at least `ceil(words * threshold)`

use super::parser::{ParsedQuery, QueryParser};
use super::synonyms::SynonymTable;
use crate::catalog::Tour;
use std::sync::Arc;

/// Fraction of query words that must be found in a multi-word search
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Free-text matcher bound to a synonym table
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    synonyms: Arc<SynonymTable>,
    threshold: f64,
}

impl Default for SearchMatcher {
    fn default() -> Self {
        Self::new(Arc::new(SynonymTable::builtin()))
    }
}

impl SearchMatcher {
    pub fn new(synonyms: Arc<SynonymTable>) -> Self {
        Self {
            synonyms,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Parse and expand a query once for repeated matching
    pub fn parse(&self, query: &str) -> ParsedQuery {
        QueryParser::parse(query, &self.synonyms)
    }

    /// Convenience for one-off checks; parses the query every call
    pub fn matches(&self, tour: &Tour, query: &str) -> bool {
        self.matches_parsed(tour, &self.parse(query))
    }

    pub fn matches_parsed(&self, tour: &Tour, query: &ParsedQuery) -> bool {
        if query.is_empty() {
            return true;
        }
        self.matches_text(&tour.searchable_text(), query)
    }

    /// Core decision against already lower-cased searchable text
    pub fn matches_text(&self, text: &str, query: &ParsedQuery) -> bool {
        if query.is_empty() {
            return true;
        }

        // Exact phrase
        if text.contains(query.whole_query.as_str()) {
            return true;
        }

        if query.word_count() == 1 {
            return query
                .candidate_terms
                .iter()
                .any(|term| text.contains(term.as_str()));
        }

        let matched = query
            .word_terms
            .iter()
            .filter(|terms| terms.iter().any(|term| text.contains(term.as_str())))
            .count();

        matched >= self.required_matches(query.word_count())
    }

    /// Minimum number of query words that must be found
    pub fn required_matches(&self, word_count: usize) -> usize {
        (word_count as f64 * self.threshold).ceil() as usize
    }
}
