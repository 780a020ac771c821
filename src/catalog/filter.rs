use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::types::CatalogItem;
use super::view_state::ViewState;

/// The complete filter input. `"all"` is the sentinel for the select-style
/// fields; `show_past` is view-local and never part of the permalink.
#[derive(Debug, Clone)]
pub struct FilterState {
    pub query: String,
    pub category: String,
    pub subfield: String,
    pub status: String,
    pub show_past: bool,
}

impl FilterState {
    pub fn from_view(view: &ViewState, show_past: bool) -> Self {
        FilterState {
            query: view.query.clone(),
            category: view.category.clone(),
            subfield: view.subfield.clone(),
            status: view.status.clone(),
            show_past,
        }
    }
}

fn matches(item: &CatalogItem, state: &FilterState, query: &str, today: NaiveDate) -> bool {
    // Conferences that already ended are hidden unless asked for. Items
    // without an end date are never excluded by this rule.
    if !state.show_past {
        if let Some(end) = item.conf_end {
            if end < today {
                return false;
            }
        }
    }

    if state.status != "all" && item.status.as_str() != state.status {
        return false;
    }

    if state.category != "all" && !item.areas.contains_key(&state.category) {
        return false;
    }

    if state.subfield != "all" {
        let in_pool = if state.category == "all" {
            item.all_subfields().any(|s| s == state.subfield)
        } else {
            item.areas
                .get(&state.category)
                .is_some_and(|subs| subs.iter().any(|s| *s == state.subfield))
        };
        if !in_pool {
            return false;
        }
    }

    if !query.is_empty() {
        let subfields: Vec<&str> = item.all_subfields().collect();
        let hay = format!(
            "{} {} {} {}",
            item.name,
            item.location,
            item.tags.join(" "),
            subfields.join(" ")
        )
        .to_lowercase();
        if !hay.contains(query) {
            return false;
        }
    }

    true
}

/// Apply all predicates (AND semantics) against the normalized collection.
/// `today` is the local calendar date used for the past-conference cut.
pub fn apply<'a>(
    items: &'a [CatalogItem],
    state: &FilterState,
    today: NaiveDate,
) -> Vec<&'a CatalogItem> {
    let query = state.query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| matches(item, state, &query, today))
        .collect()
}

/// Sorted, deduplicated category names across the whole collection.
pub fn category_options(items: &[CatalogItem]) -> Vec<String> {
    let set: BTreeSet<&str> = items
        .iter()
        .flat_map(|it| it.areas.keys().map(String::as_str))
        .collect();
    set.into_iter().map(str::to_string).collect()
}

/// Sorted, deduplicated subfields for the category select: everything when
/// `category` is "all", else only that category's subfields.
pub fn subfield_options(items: &[CatalogItem], category: &str) -> Vec<String> {
    let set: BTreeSet<&str> = if category == "all" {
        items.iter().flat_map(|it| it.all_subfields()).collect()
    } else {
        items
            .iter()
            .filter_map(|it| it.areas.get(category))
            .flatten()
            .map(String::as_str)
            .collect()
    };
    set.into_iter().map(str::to_string).collect()
}
