//! wanderhawaii: tour catalog search, filtering and pagination
//!
//! The pipeline lives in [`search`]: a [`search::Session`] owns the filter
//! state, the filtered and sorted view, and the pagination cursor over an
//! immutable [`catalog::CatalogStore`]. [`tools`] and [`mcp`] put a CLI and a
//! JSON-RPC stdio server in front of it.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod search;
pub mod tools;
