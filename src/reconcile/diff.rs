//! Computes the "what changed" list shown to the admin before approving an
//! edit suggestion. Display only; the write path never consults this.

use chrono::NaiveDate;

use super::{areas_from_flat, suggestion_deadlines};
use crate::catalog::normalize::areas_from_value;
use crate::models::conference::{ConferenceRow, DeadlineInput};
use crate::models::suggestion::SuggestionRow;

fn show(s: &Option<String>) -> String {
    match s.as_deref() {
        Some(v) if !v.is_empty() => format!("'{v}'"),
        _ => "(empty)".to_string(),
    }
}

fn show_date(d: Option<NaiveDate>) -> String {
    d.map_or_else(|| "(none)".to_string(), |d| d.to_string())
}

/// Absent and empty string count as equal.
fn push_str_change(
    changes: &mut Vec<String>,
    field: &str,
    old: &Option<String>,
    new: &Option<String>,
) {
    if old.as_deref().unwrap_or("") != new.as_deref().unwrap_or("") {
        changes.push(format!("{field}: {} to {}", show(old), show(new)));
    }
}

fn push_date_change(
    changes: &mut Vec<String>,
    field: &str,
    old: Option<NaiveDate>,
    new: Option<NaiveDate>,
) {
    if old != new {
        changes.push(format!("{field}: {} to {}", show_date(old), show_date(new)));
    }
}

fn sorted(mut deadlines: Vec<DeadlineInput>) -> Vec<DeadlineInput> {
    deadlines.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.deadline_type.cmp(&b.deadline_type))
    });
    deadlines
}

/// Compare an edit suggestion against the record it targets.
/// Returns one human-readable line per changed field; an identical
/// suggestion yields an empty list.
pub fn changes(
    current: &ConferenceRow,
    current_deadlines: &[DeadlineInput],
    suggestion: &SuggestionRow,
) -> Vec<String> {
    let mut changes = Vec::new();

    if current.name != suggestion.name {
        changes.push(format!("name: '{}' to '{}'", current.name, suggestion.name));
    }
    push_str_change(&mut changes, "location", &current.location, &suggestion.location);
    push_str_change(&mut changes, "site_url", &current.site_url, &suggestion.site_url);
    push_date_change(
        &mut changes,
        "conf_start_date",
        current.conf_start_date,
        suggestion.conf_start_date,
    );
    push_date_change(
        &mut changes,
        "conf_end_date",
        current.conf_end_date,
        suggestion.conf_end_date,
    );
    push_str_change(&mut changes, "note", &current.note, &suggestion.note);
    push_str_change(&mut changes, "timezone", &current.timezone, &suggestion.timezone);

    let current_areas = areas_from_value(&current.areas);
    let suggested_areas =
        areas_from_flat(suggestion.category.as_deref(), suggestion.subfields.as_deref());
    if current_areas != suggested_areas {
        let describe = |areas: &std::collections::BTreeMap<String, Vec<String>>| {
            if areas.is_empty() {
                "(none)".to_string()
            } else {
                areas
                    .iter()
                    .map(|(cat, subs)| format!("{cat}: {}", subs.join(", ")))
                    .collect::<Vec<_>>()
                    .join("; ")
            }
        };
        changes.push(format!(
            "areas: {} to {}",
            describe(&current_areas),
            describe(&suggested_areas)
        ));
    }

    let old = sorted(current_deadlines.to_vec());
    let new = sorted(suggestion_deadlines(suggestion));
    if old != new {
        changes.push(format!(
            "deadlines: {} entries replaced by {}",
            old.len(),
            new.len()
        ));
    }

    changes
}
