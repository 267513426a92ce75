//! Browsing session: the pipeline state owned by one visitor
//!
//! Catalog → Filter Engine → Sort Stage → Pagination Cursor. The catalog is
//! never mutated; every interaction that changes filters or sort recomputes
//! the view from scratch and resets the cursor. "Load more" only moves the
//! cursor.

use super::filter::{FilterEngine, FilterState};
use super::pagination::{Cursor, DEFAULT_PAGE_SIZE};
use super::shuffle::{shuffle_uniform, stratified_shuffle, PremiumRule, ShuffleMode};
use super::sort::{sort_tours, SortKey};
use crate::catalog::{CatalogStore, Tour};
use crate::error::{normalize_query, AppError};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Knobs that differed between historical versions of the site
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub page_size: usize,
    /// `None` decides from the catalog: price-aware when any tour has a price
    pub price_aware: Option<bool>,
    pub shuffle_on_load: ShuffleMode,
    pub premium: PremiumRule,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            price_aware: None,
            shuffle_on_load: ShuffleMode::None,
            premium: PremiumRule::default(),
        }
    }
}

/// How the presentation layer should apply a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageUpdate {
    /// Clear the grid, then show these tours
    Replace,
    /// Add these tours after the ones already shown
    Append,
}

/// Reveal-ready slice of the current view
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub tours: Vec<Arc<Tour>>,
    /// Length of the whole filtered view
    pub total: usize,
    /// Position of the first tour of this page in the view
    pub offset: usize,
    /// Tours on screen once this page is shown
    pub revealed: usize,
    /// Whether "load more" should stay visible
    pub has_more: bool,
    pub update: PageUpdate,
}

impl Page {
    pub fn is_empty_result(&self) -> bool {
        self.total == 0
    }
}

/// Filter then sort: the pure part of the pipeline
pub fn run_pipeline(
    engine: &FilterEngine,
    catalog: &CatalogStore,
    filters: &FilterState,
    price_aware: bool,
) -> Vec<Arc<Tour>> {
    let mut view = engine.apply(catalog, filters);
    sort_tours(&mut view, filters.sort, price_aware);
    view
}

/// Owned state for one visitor
#[derive(Debug, Clone)]
pub struct Session {
    catalog: CatalogStore,
    engine: FilterEngine,
    filters: FilterState,
    view: Vec<Arc<Tour>>,
    cursor: Cursor,
    price_aware: bool,
    premium: PremiumRule,
}

impl Session {
    /// Start a session on a loaded catalog. The initial view is the catalog
    /// order (after the configured load shuffle), not yet sorted.
    pub fn new<R: Rng + ?Sized>(
        catalog: CatalogStore,
        engine: FilterEngine,
        options: SessionOptions,
        rng: &mut R,
    ) -> Self {
        let catalog = match options.shuffle_on_load {
            ShuffleMode::None => catalog,
            ShuffleMode::Uniform => {
                let mut order = catalog.to_view();
                shuffle_uniform(&mut order, rng);
                catalog.reordered(order)
            }
            ShuffleMode::Stratified => {
                let order = stratified_shuffle(&catalog.to_view(), &options.premium, rng);
                catalog.reordered(order)
            }
        };

        let price_aware = options
            .price_aware
            .unwrap_or_else(|| catalog.is_price_aware());
        let view = catalog.to_view();

        debug!(
            "Session started: {} tours, page size {}, price aware {}",
            catalog.len(),
            options.page_size,
            price_aware
        );

        Self {
            catalog,
            engine,
            filters: FilterState::default(),
            view,
            cursor: Cursor::new(options.page_size),
            price_aware,
            premium: options.premium,
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn view(&self) -> &[Arc<Tour>] {
        &self.view
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_price_aware(&self) -> bool {
        self.price_aware
    }

    /// Replace the filter state wholesale and recompute the view
    pub fn apply(&mut self, filters: FilterState) -> Result<Page, AppError> {
        filters.validate()?;
        self.filters = filters;
        Ok(self.recompute())
    }

    /// Change only the sort key
    pub fn set_sort(&mut self, sort: SortKey) -> Page {
        self.filters.sort = sort;
        self.recompute()
    }

    /// Replace only the search text (tag chips, hero search box)
    pub fn quick_filter(&mut self, term: &str) -> Result<Page, AppError> {
        let filters = FilterState {
            search: Some(normalize_query(term)),
            ..self.filters.clone()
        };
        self.apply(filters)
    }

    /// Back to the default filter state
    pub fn clear_filters(&mut self) -> Page {
        self.filters = FilterState::default();
        self.recompute()
    }

    /// Reveal the next page of the existing view
    pub fn load_more(&mut self) -> Page {
        self.cursor.advance(self.view.len());
        self.page(PageUpdate::Append)
    }

    /// Randomize the current view; the next filter or sort change re-sorts
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Page {
        shuffle_uniform(&mut self.view, rng);
        self.cursor.reset();
        self.page(PageUpdate::Replace)
    }

    /// Premium-first shuffle of the current view
    pub fn shuffle_stratified<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Page {
        self.view = stratified_shuffle(&self.view, &self.premium, rng);
        self.cursor.reset();
        self.page(PageUpdate::Replace)
    }

    /// Everything revealed so far, for re-rendering from scratch
    pub fn visible(&self) -> &[Arc<Tour>] {
        &self.view[..self.cursor.revealed_count(self.view.len())]
    }

    /// Everything revealed so far as one redraw, for one-shot rendering
    pub fn visible_page(&self) -> Page {
        let total = self.view.len();
        Page {
            tours: self.visible().to_vec(),
            total,
            offset: 0,
            revealed: self.cursor.revealed_count(total),
            has_more: self.cursor.has_more(total),
            update: PageUpdate::Replace,
        }
    }

    fn recompute(&mut self) -> Page {
        self.view = run_pipeline(&self.engine, &self.catalog, &self.filters, self.price_aware);
        self.cursor.reset();
        self.page(PageUpdate::Replace)
    }

    fn page(&self, update: PageUpdate) -> Page {
        let total = self.view.len();
        Page {
            tours: self.cursor.reveal(&self.view).to_vec(),
            total,
            offset: self.cursor.offset(),
            revealed: self.cursor.revealed_count(total),
            has_more: self.cursor.has_more(total),
            update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog(n: usize) -> CatalogStore {
        CatalogStore::new(
            (0..n)
                .map(|i| {
                    let island = if i % 2 == 0 { "maui" } else { "oahu" };
                    Tour::new(i.to_string(), format!("Tour {:02}", i), island)
                        .with_tags(if i % 3 == 0 { vec!["Snorkel"] } else { vec!["Hiking"] })
                        .with_quality(i as f64)
                        .with_availability((n - i) as i64)
                })
                .collect(),
        )
    }

    fn session(n: usize) -> Session {
        Session::new(
            catalog(n),
            FilterEngine::default(),
            SessionOptions::default(),
            &mut StdRng::seed_from_u64(0),
        )
    }

    fn ids(tours: &[Arc<Tour>]) -> Vec<String> {
        tours.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_initial_view_is_catalog_order() {
        let s = session(5);
        assert_eq!(ids(s.view()), vec!["0", "1", "2", "3", "4"]);
        assert_eq!(s.visible_page().update, PageUpdate::Replace);
    }

    #[test]
    fn test_apply_filters_and_sorts() {
        let mut s = session(30);
        let page = s
            .apply(FilterState::default().with_island("Maui").with_sort(SortKey::Quality))
            .unwrap();
        assert_eq!(page.total, 15);
        assert_eq!(page.tours.len(), 12);
        assert_eq!(page.tours[0].id, "28");
        assert!(page.has_more);
        assert_eq!(page.update, PageUpdate::Replace);
    }

    #[test]
    fn test_load_more_appends_without_recompute() {
        let mut s = session(30);
        s.apply(FilterState::default().with_sort(SortKey::Name)).unwrap();
        let before: Vec<String> = ids(s.view());

        let page = s.load_more();
        assert_eq!(page.update, PageUpdate::Append);
        assert_eq!(page.offset, 12);
        assert_eq!(ids(&page.tours), before[12..24].to_vec());
        assert_eq!(ids(s.view()), before);

        let page = s.load_more();
        assert_eq!(page.tours.len(), 6);
        assert!(!page.has_more);
        assert_eq!(page.revealed, 30);

        let page = s.load_more();
        assert!(page.tours.is_empty());
        assert!(s.cursor().is_exhausted(30));
    }

    #[test]
    fn test_filter_change_resets_cursor() {
        let mut s = session(30);
        s.clear_filters();
        s.load_more();
        assert_eq!(s.cursor().offset(), 12);
        let page = s.set_sort(SortKey::Availability);
        assert_eq!(page.offset, 0);
        assert_eq!(page.tours[0].id, "0");
    }

    #[test]
    fn test_visible_accumulates() {
        let mut s = session(30);
        s.clear_filters();
        assert_eq!(s.visible().len(), 12);
        s.load_more();
        assert_eq!(s.visible().len(), 24);

        let page = s.visible_page();
        assert_eq!(page.tours.len(), 24);
        assert_eq!(page.offset, 0);
        assert!(page.has_more);
    }

    #[test]
    fn test_quick_filter_keeps_other_filters() {
        let mut s = session(30);
        s.apply(FilterState::default().with_island("oahu")).unwrap();
        let page = s.quick_filter("  SNORKEL ").unwrap();
        assert_eq!(s.filters().search.as_deref(), Some("snorkel"));
        assert_eq!(s.filters().island.as_deref(), Some("oahu"));
        // odd ids that are multiples of 3: 3, 9, 15, 21, 27
        assert_eq!(page.total, 5);
    }

    #[test]
    fn test_clear_filters() {
        let mut s = session(10);
        let page = s.apply(FilterState::default().with_search("zzz-not-there")).unwrap();
        assert!(page.is_empty_result());
        let page = s.clear_filters();
        assert_eq!(page.total, 10);
        assert_eq!(s.filters(), &FilterState::default());
    }

    #[test]
    fn test_invalid_filters_rejected_and_state_kept() {
        let mut s = session(10);
        s.apply(FilterState::default().with_island("maui")).unwrap();
        let err = s
            .apply(FilterState::default().with_price(Some(50.0), Some(10.0)))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(s.filters().island.as_deref(), Some("maui"));
    }

    #[test]
    fn test_shuffle_then_sort_overrides() {
        let mut s = session(20);
        s.apply(FilterState::default().with_sort(SortKey::Quality)).unwrap();
        let sorted = ids(s.view());

        s.shuffle(&mut StdRng::seed_from_u64(9));
        let mut shuffled = ids(s.view());
        shuffled.sort();
        let mut expected = sorted.clone();
        expected.sort();
        assert_eq!(shuffled, expected);

        s.set_sort(SortKey::Quality);
        assert_eq!(ids(s.view()), sorted);
    }

    #[test]
    fn test_shuffle_on_load_is_seeded() {
        let options = SessionOptions {
            shuffle_on_load: ShuffleMode::Uniform,
            ..SessionOptions::default()
        };
        let a = Session::new(
            catalog(20),
            FilterEngine::default(),
            options.clone(),
            &mut StdRng::seed_from_u64(5),
        );
        let b = Session::new(
            catalog(20),
            FilterEngine::default(),
            options,
            &mut StdRng::seed_from_u64(5),
        );
        assert_eq!(ids(a.view()), ids(b.view()));
        assert_eq!(a.catalog().len(), 20);
    }

    #[test]
    fn test_stratified_shuffle_view() {
        let mut s = session(40);
        s.clear_filters();
        let page = s.shuffle_stratified(&mut StdRng::seed_from_u64(2));
        // quality >= 90 never happens in this catalog, so everything is "rest"
        assert_eq!(page.total, 40);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_empty_catalog() {
        let mut s = Session::new(
            CatalogStore::empty(),
            FilterEngine::default(),
            SessionOptions::default(),
            &mut StdRng::seed_from_u64(0),
        );
        let page = s.apply(FilterState::default().with_search("snorkel")).unwrap();
        assert!(page.is_empty_result());
        assert!(!page.has_more);
        assert!(s.load_more().tours.is_empty());
    }

    #[test]
    fn test_price_awareness_detected() {
        let store = CatalogStore::new(vec![Tour::new("1", "A", "maui").with_price(1.0, 2.0)]);
        let s = Session::new(
            store,
            FilterEngine::default(),
            SessionOptions::default(),
            &mut StdRng::seed_from_u64(0),
        );
        assert!(s.is_price_aware());
    }
}
