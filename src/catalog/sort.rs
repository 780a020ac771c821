use std::cmp::Ordering;

use super::types::CatalogItem;

fn name_cmp(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

/// Default ordering: items with an upcoming deadline first (nearest first),
/// then the rest by conference start date, then by name. Ties keep input
/// order (stable sort).
fn next_due_cmp(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    match (a.next_due, b.next_due) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => match (a.conf_start, b.conf_start) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => name_cmp(a, b),
        },
    }
}

/// Sort the filtered view in place. Any key other than `name_asc` is the
/// deadline-proximity default (`next_due_asc`).
pub fn sort_items(items: &mut [&CatalogItem], sort_key: &str) {
    if sort_key == "name_asc" {
        items.sort_by(|a, b| name_cmp(a, b));
    } else {
        items.sort_by(|a, b| next_due_cmp(a, b));
    }
}
