//! Tour catalog: record shape and the immutable store loaded once per session

pub mod store;
pub mod tour;

pub use store::{CatalogSource, CatalogStore};
pub use tour::{Tour, DEFAULT_COMPANY};
