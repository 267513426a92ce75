//! Markdown and JSON rendering of result pages

use crate::catalog::Tour;
use crate::config::BadgeThresholds;
use crate::search::{FilterState, Page, PageUpdate};
use serde_json::{json, Value};

/// Tags shown on a card
const CARD_TAGS: usize = 3;

/// "Showing 1 adventure" / "Showing 12 adventures"
pub fn result_count_line(count: usize) -> String {
    format!(
        "Showing {} adventure{}",
        count,
        if count == 1 { "" } else { "s" }
    )
}

fn price_label(tour: &Tour) -> Option<String> {
    match tour.price_range()? {
        (min, max) if (max - min).abs() < f64::EPSILON => Some(format!("${:.0}", min)),
        (min, max) => Some(format!("${:.0}–${:.0}", min, max)),
    }
}

/// One tour as a markdown block
pub fn format_tour_card(tour: &Tour, badges: &BadgeThresholds) -> String {
    let mut md = String::new();

    md.push_str(&format!("### {}", tour.name));
    if let Some(badge) = badges.badge_for(tour.quality) {
        md.push_str(&format!(" · {}", badge));
    }
    md.push_str("\n\n");

    md.push_str(&format!(
        "{} · {}",
        tour.company_or_default(),
        tour.island_display()
    ));
    if let Some(location) = tour.location.as_deref().filter(|l| !l.is_empty()) {
        md.push_str(&format!(" · {}", location));
    }
    md.push('\n');

    let mut facts = vec![format!("Quality {:.0}", tour.quality)];
    if let Some(price) = price_label(tour) {
        facts.push(price);
    }
    md.push_str(&format!("{}\n", facts.join(" · ")));

    if !tour.tags.is_empty() {
        let tags: Vec<&str> = tour.tags.iter().take(CARD_TAGS).map(String::as_str).collect();
        md.push_str(&format!("Tags: {}\n", tags.join(", ")));
    }

    if let Some(link) = tour.booking_link.as_deref().filter(|l| !l.is_empty()) {
        md.push_str(&format!("[Book now]({})\n", link));
    }

    md
}

/// Human summary of the active filters, e.g. `island=maui, sort=name`
pub fn describe_filters(filters: &FilterState) -> String {
    let mut parts = Vec::new();
    if let Some(island) = filters.island_filter() {
        parts.push(format!("island={}", island));
    }
    if let Some(activity) = filters.activity_filter() {
        parts.push(format!("activity={}", activity));
    }
    if let Some(min) = filters.price.min {
        parts.push(format!("min_price={}", min));
    }
    if let Some(max) = filters.price.max {
        parts.push(format!("max_price={}", max));
    }
    if let Some(search) = filters.search_filter() {
        parts.push(format!("q=\"{}\"", search));
    }
    parts.push(format!("sort={}", filters.sort));
    parts.join(", ")
}

fn share_link(filters: &FilterState) -> String {
    let query = filters.to_query_string();
    if query.is_empty() {
        String::new()
    } else {
        format!("?{}", query)
    }
}

/// Full markdown for a page, including the empty state
pub fn format_page(
    page: &Page,
    filters: &FilterState,
    badges: &BadgeThresholds,
    suggestions: &[String],
) -> String {
    if page.is_empty_result() {
        return format_empty_state(filters, suggestions);
    }

    let mut md = String::new();

    if page.update == PageUpdate::Replace {
        md.push_str(&format!("# {}\n\n", result_count_line(page.total)));
        md.push_str(&format!("Filters: {}\n\n", describe_filters(filters)));
    } else if page.tours.is_empty() {
        md.push_str("All tours are already shown.\n");
        return md;
    }

    for tour in &page.tours {
        md.push_str(&format_tour_card(tour, badges));
        md.push_str("\n---\n\n");
    }

    md.push_str(&format!("Shown {} of {}", page.revealed, page.total));
    if page.has_more {
        md.push_str(" · more available (load_more)");
    }
    md.push('\n');

    md
}

/// No results: suggest alternative terms and the clear-filters action
pub fn format_empty_state(filters: &FilterState, suggestions: &[String]) -> String {
    let mut md = String::new();
    md.push_str("# No tours found\n\n");
    md.push_str(&format!("Filters: {}\n\n", describe_filters(filters)));

    if !suggestions.is_empty() {
        md.push_str("Try searching for:\n");
        for suggestion in suggestions {
            md.push_str(&format!("- {}\n", suggestion));
        }
        md.push('\n');
    }

    if filters.is_unfiltered() {
        md.push_str("The catalog has no tours to show.\n");
    } else {
        md.push_str("Clear all filters to see every tour.\n");
    }
    md
}

/// Machine-readable page. `link` is the query string that reproduces the
/// filters, e.g. `?island=maui&sort=name`.
pub fn page_to_json(page: &Page, filters: &FilterState, suggestions: &[String]) -> Value {
    json!({
        "update": page.update,
        "total": page.total,
        "offset": page.offset,
        "revealed": page.revealed,
        "hasMore": page.has_more,
        "summary": result_count_line(page.total),
        "filters": filters,
        "link": share_link(filters),
        "tours": page.tours,
        "suggestions": suggestions,
    })
}
