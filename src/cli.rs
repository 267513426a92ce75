//! CLI mode implementation
//!
//! Argument structs double as tool-server input schemas, so every field is
//! optional on the wire and documented for both audiences.

use clap::{Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// WanderHawaii tour catalog
#[derive(Parser)]
#[command(name = "wanderhawaii")]
#[command(about = "Search, filter and browse the Hawaii tour catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Config file (defaults to $WANDERHAWAII_CONFIG, then the user config dir)
    #[arg(long, global = true, env = "WANDERHAWAII_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter, sort and page through tours
    Search(SearchArgs),
    /// Suggest search keywords related to a term
    Suggest(SuggestArgs),
}

/// Search tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug, Default)]
pub struct SearchArgs {
    /// Catalog file path or http(s) URL (overrides config)
    #[arg(short = 'c', long)]
    #[serde(default)]
    #[schemars(description = "Catalog file path or http(s) URL; when set, the server reloads the catalog and starts a fresh session")]
    pub catalog: Option<String>,

    /// Island (maui, oahu, kauai, big island, ...)
    #[arg(short = 'i', long)]
    #[serde(default)]
    #[schemars(description = "Island, case-insensitive (maui, oahu, kauai, big island)")]
    pub island: Option<String>,

    /// Activity, matched against tags (Snorkel, Boat Tour, ...)
    #[arg(short = 'a', long)]
    #[serde(default)]
    #[schemars(description = "Activity, partial match against tour tags (Snorkel, Boat Tour)")]
    pub activity: Option<String>,

    /// Free-text search, synonym aware
    #[arg(short = 'q', long)]
    #[serde(default)]
    #[schemars(description = "Free-text search; related terms are matched too")]
    pub query: Option<String>,

    /// Lowest acceptable price
    #[arg(long)]
    #[serde(default)]
    #[schemars(description = "Lowest acceptable price")]
    pub min_price: Option<f64>,

    /// Highest acceptable price
    #[arg(long)]
    #[serde(default)]
    #[schemars(description = "Highest acceptable price")]
    pub max_price: Option<f64>,

    /// featured, quality, name, availability, price-low, price-high
    #[arg(short = 's', long)]
    #[serde(default)]
    #[schemars(description = "Sort: featured (default), quality, name, availability, price-low, price-high")]
    pub sort: Option<String>,

    /// Number of pages to reveal (default 1)
    #[arg(short = 'p', long)]
    #[serde(default)]
    #[schemars(description = "Number of pages to reveal, starting at 1")]
    pub pages: Option<usize>,

    /// Shareable link whose ?island=&activity=&q= seed the filters
    #[arg(long)]
    #[serde(default)]
    #[schemars(description = "Shareable link whose query parameters (island, activity, q, sort, min_price, max_price) seed the filters; explicit arguments win")]
    pub link: Option<String>,

    /// Shuffle the results instead of sorting them
    #[arg(long)]
    #[serde(default)]
    #[schemars(description = "Shuffle the filtered results after sorting")]
    pub shuffle: bool,

    /// Seed for --shuffle, for reproducible orders
    #[arg(long)]
    #[serde(default)]
    #[schemars(description = "Random seed for shuffle")]
    pub seed: Option<u64>,

    /// Print JSON instead of markdown
    #[arg(long)]
    #[serde(default)]
    #[schemars(description = "Return the page as JSON instead of markdown")]
    pub json: bool,
}

/// Suggest tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SuggestArgs {
    /// Partial search term
    #[schemars(description = "Partial search term")]
    pub term: String,

    /// Maximum number of suggestions (default 5)
    #[arg(short = 'l', long)]
    #[serde(default)]
    #[schemars(description = "Maximum number of suggestions (default 5)")]
    pub limit: Option<usize>,
}

/// Load-more tool arguments (server only)
#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug, Default)]
pub struct LoadMoreArgs {
    #[serde(default)]
    #[schemars(description = "Return the page as JSON instead of markdown")]
    pub json: bool,
}

/// Shuffle tool arguments (server only)
#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug, Default)]
pub struct ShuffleArgs {
    #[serde(default)]
    #[schemars(description = "Lead with a few premium tours, shuffle the rest")]
    pub stratified: bool,

    #[serde(default)]
    #[schemars(description = "Random seed for a reproducible order")]
    pub seed: Option<u64>,

    #[serde(default)]
    #[schemars(description = "Return the page as JSON instead of markdown")]
    pub json: bool,
}

/// Clear-filters and quick-filter arguments (server only)
#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug, Default)]
pub struct ClearFiltersArgs {
    #[serde(default)]
    #[schemars(description = "Search term to apply after clearing (quick filter); omit to show everything")]
    pub term: Option<String>,

    #[serde(default)]
    #[schemars(description = "Return the page as JSON instead of markdown")]
    pub json: bool,
}
