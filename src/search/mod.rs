//! Tour search pipeline
//!
//! Catalog → filter engine (island, activity, price, synonym-aware search) →
//! sort stage → pagination cursor, owned per visitor by [`Session`].

pub mod filter;
pub mod matcher;
pub mod pagination;
pub mod params;
pub mod parser;
pub mod session;
pub mod shuffle;
pub mod sort;
pub mod synonyms;

#[cfg(test)]
mod property_tests;

pub use filter::{FilterEngine, FilterState, PriceRange};
pub use matcher::{SearchMatcher, DEFAULT_MATCH_THRESHOLD};
pub use pagination::{Cursor, DEFAULT_PAGE_SIZE};
pub use parser::{ParsedQuery, QueryParser};
pub use session::{run_pipeline, Page, PageUpdate, Session, SessionOptions};
pub use shuffle::{PremiumRule, ShuffleMode};
pub use sort::{sort_tours, SortKey};
pub use synonyms::{SynonymTable, DEFAULT_SUGGESTION_LIMIT};
