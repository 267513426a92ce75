use proptest::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::catalog::{CatalogStore, Tour};
use crate::search::filter::{FilterEngine, FilterState};
use crate::search::matcher::SearchMatcher;
use crate::search::pagination::Cursor;
use crate::search::sort::{compare_names, sort_tours, SortKey};
use crate::search::synonyms::SynonymTable;

const ISLANDS: &[&str] = &["Maui", "maui", "Oahu", "Kauai", "big island", "Lanai"];

fn tour_strategy() -> impl Strategy<Value = Tour> {
    (
        "[A-Za-z][A-Za-z ]{0,15}",
        prop::sample::select(ISLANDS),
        prop::collection::vec("[A-Za-z]{2,10}", 0..4),
        0.0f64..100.0,
        0i64..50,
        prop::option::of((0.0f64..500.0, 0.0f64..500.0)),
    )
        .prop_map(|(name, island, tags, quality, availability, price)| {
            let tour = Tour::new("", name, island)
                .with_tags(tags)
                .with_quality(quality)
                .with_availability(availability);
            match price {
                Some((a, b)) => tour.with_price(a.min(b), a.max(b)),
                None => tour,
            }
        })
}

fn catalog_strategy() -> impl Strategy<Value = Vec<Tour>> {
    prop::collection::vec(tour_strategy(), 0..30).prop_map(|tours| {
        tours
            .into_iter()
            .enumerate()
            .map(|(i, mut t)| {
                t.id = i.to_string();
                t
            })
            .collect()
    })
}

fn sorted_ids(view: &[Arc<Tour>]) -> Vec<String> {
    let mut ids: Vec<String> = view.iter().map(|t| t.id.clone()).collect();
    ids.sort();
    ids
}

// Property: with every predicate empty the view is the whole catalog
proptest! {
    #[test]
    fn unfiltered_view_is_whole_catalog(tours in catalog_strategy()) {
        let store = CatalogStore::new(tours);
        let view = FilterEngine::default().apply(&store, &FilterState::default());
        prop_assert_eq!(sorted_ids(&view), sorted_ids(&store.to_view()));
    }
}

// Property: island filter has no false positives and no false negatives
proptest! {
    #[test]
    fn island_filter_exact(tours in catalog_strategy(), island in prop::sample::select(ISLANDS)) {
        let store = CatalogStore::new(tours);
        let view = FilterEngine::default()
            .apply(&store, &FilterState::default().with_island(island));
        let wanted = island.to_lowercase();

        for tour in &view {
            prop_assert_eq!(tour.island.to_lowercase(), wanted.clone());
        }
        let expected = store.iter().filter(|t| t.island.to_lowercase() == wanted).count();
        prop_assert_eq!(view.len(), expected);
    }
}

// Property: matching is a pure function of record and query
proptest! {
    #[test]
    fn matcher_is_idempotent(tour in tour_strategy(), query in "[a-z ]{0,24}") {
        let matcher = SearchMatcher::default();
        let first = matcher.matches(&tour, &query);
        let second = matcher.matches(&tour, &query);
        prop_assert_eq!(first, second);
    }
}

// Property: any verbatim slice of the searchable text matches, even with no synonyms
proptest! {
    #[test]
    fn exact_phrase_always_matches(tour in tour_strategy(), a in 0usize..64, len in 1usize..24) {
        let text = tour.searchable_text();
        prop_assume!(!text.is_empty());
        let start = a % text.len();
        let end = (start + len).min(text.len());
        let phrase = &text[start..end];

        let bare = SearchMatcher::new(Arc::new(SynonymTable::empty()));
        prop_assert!(bare.matches(&tour, phrase));
        prop_assert!(SearchMatcher::default().matches(&tour, phrase));
    }
}

// Property: three-word queries need two matching words
proptest! {
    #[test]
    fn multi_word_threshold(
        present in prop::collection::vec("[a-m]{3,8}", 2),
        absent in prop::collection::vec("[n-z]{3,8}", 2),
    ) {
        let tour = Tour::new("1", present.join(" "), "");
        let matcher = SearchMatcher::new(Arc::new(SynonymTable::empty()));

        let two_of_three = format!("{} {} {}", present[0], absent[0], present[1]);
        prop_assert!(matcher.matches(&tour, &two_of_three));

        let one_of_three = format!("{} {} {}", absent[0], present[0], absent[1]);
        prop_assert!(!matcher.matches(&tour, &one_of_three));
    }
}

// Property: price filter is interval overlap, unpriced records always pass
proptest! {
    #[test]
    fn price_filter_overlap(
        record in prop::option::of((0.0f64..500.0, 0.0f64..500.0)),
        requested in (0.0f64..500.0, 0.0f64..500.0),
    ) {
        let (lo, hi) = (requested.0.min(requested.1), requested.0.max(requested.1));
        let tour = match record {
            Some((a, b)) => Tour::new("1", "T", "maui").with_price(a.min(b), a.max(b)),
            None => Tour::new("1", "T", "maui"),
        };
        let store = CatalogStore::new(vec![tour.clone()]);
        let view = FilterEngine::default()
            .apply(&store, &FilterState::default().with_price(Some(lo), Some(hi)));

        let expected = match tour.price_range() {
            Some((min, max)) => min <= hi && max >= lo,
            None => true,
        };
        prop_assert_eq!(view.len() == 1, expected);
    }
}

// Property: k advances reveal the k-th page, and exhaustion is sticky
proptest! {
    #[test]
    fn pagination_reveals_kth_page(len in 0usize..100, page_size in 1usize..20, k in 0usize..12) {
        let view: Vec<usize> = (0..len).collect();
        let mut cursor = Cursor::new(page_size);
        for _ in 0..k {
            cursor.advance(view.len());
        }

        let start = (k * page_size).min(len);
        let end = ((k + 1) * page_size).min(len);
        prop_assert_eq!(cursor.reveal(&view), &view[start..end]);

        if cursor.is_exhausted(len) {
            cursor.advance(len);
            prop_assert!(cursor.reveal(&view).is_empty());
            prop_assert!(cursor.is_exhausted(len));
        }
    }
}

// Property: name and quality sorts are ordered, and a second sort fully takes over
proptest! {
    #[test]
    fn sort_orders_hold(tours in catalog_strategy()) {
        let store = CatalogStore::new(tours);

        let mut by_name = store.to_view();
        sort_tours(&mut by_name, SortKey::Name, false);
        for pair in by_name.windows(2) {
            prop_assert_ne!(compare_names(&pair[0].name, &pair[1].name), Ordering::Greater);
        }

        let mut by_quality = store.to_view();
        sort_tours(&mut by_quality, SortKey::Quality, false);
        for pair in by_quality.windows(2) {
            prop_assert!(pair[0].quality >= pair[1].quality);
        }

        // name first, then availability
        sort_tours(&mut by_name, SortKey::Availability, false);
        for pair in by_name.windows(2) {
            prop_assert!(pair[0].availability >= pair[1].availability);
        }
    }
}

#[test]
fn snorkel_and_swim_examples() {
    let store = CatalogStore::new(vec![
        Tour::new("1", "Sunset Snorkel", "Maui")
            .with_tags(["Snorkel"])
            .with_quality(90.0),
        Tour::new("2", "City Walk", "Oahu")
            .with_tags(["Walking Tour"])
            .with_quality(70.0),
    ]);
    let engine = FilterEngine::default();

    let view = engine.apply(&store, &FilterState::default().with_search("snorkel"));
    assert_eq!(sorted_ids(&view), vec!["1"]);

    let view = engine.apply(&store, &FilterState::default().with_search("swim"));
    assert_eq!(sorted_ids(&view), vec!["1"]);
}
