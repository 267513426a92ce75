//! Query Parser & Preprocessor
//!
//! Normalizes a raw search string, splits it into words and expands every
//! word through the synonym table once, so the matcher can test many tours
//! against the same parsed query without repeating the expansion.

use super::synonyms::SynonymTable;
use crate::error::normalize_query;
use std::collections::HashSet;

/// Parsed and expanded search query
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// Original unmodified query
    pub original: String,
    /// Trimmed, lower-cased query used for the exact-phrase check
    pub whole_query: String,
    /// Words longer than one character, in query order
    pub individual_words: Vec<String>,
    /// Expansion of each entry of `individual_words` (word first)
    pub word_terms: Vec<Vec<String>>,
    /// Whole query plus every word expansion, duplicates collapsed
    pub candidate_terms: Vec<String>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.whole_query.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.individual_words.len()
    }
}

/// Query parser and preprocessor
pub struct QueryParser;

impl QueryParser {
    /// Parse a search query into its components
    pub fn parse(query: &str, synonyms: &SynonymTable) -> ParsedQuery {
        let whole_query = normalize_query(query);
        let individual_words = Self::tokenize(&whole_query);

        let word_terms: Vec<Vec<String>> = individual_words
            .iter()
            .map(|word| synonyms.expand(word))
            .collect();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut candidate_terms = Vec::new();
        for term in std::iter::once(&whole_query).chain(word_terms.iter().flatten()) {
            if !term.is_empty() && seen.insert(term.as_str()) {
                candidate_terms.push(term.clone());
            }
        }

        ParsedQuery {
            original: query.to_string(),
            whole_query,
            individual_words,
            word_terms,
            candidate_terms,
        }
    }

    /// Whitespace split; one-character tokens are noise for expansion
    fn tokenize(text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter(|w| w.chars().count() > 1)
            .map(str::to_string)
            .collect()
    }
}
