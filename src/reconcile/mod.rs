//! Applies an approved suggestion to the canonical records (or discards a
//! rejected one). Create and edit are disjoint flows selected by
//! `is_edit`; both end with the suggestion deleted.

pub mod diff;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::normalize::parse_instant;
use crate::catalog::types::RawDeadline;
use crate::errors::AppError;
use crate::models::conference::{ConferenceRow, ConferenceUpdate, DeadlineInput};
use crate::models::suggestion::SuggestionRow;
use crate::store::RecordStore;

#[derive(Debug)]
pub enum ApprovalOutcome {
    Created {
        conference_id: String,
    },
    /// The conference row exists but its deadlines could not be written.
    /// Still a success overall; deadlines can be added later.
    CreatedWithoutDeadlines {
        conference_id: String,
        detail: String,
    },
    Updated {
        conference_id: String,
    },
}

#[derive(Debug)]
pub enum ReconcileError {
    SuggestionNotFound(i64),
    /// An edit suggestion pointing at a conference that no longer exists.
    /// Nothing was mutated.
    TargetMissing(String),
    /// A storage failure with no partial state to worry about; the action
    /// can simply be retried.
    Store(AppError),
    /// The edit flow's risk window: existing deadlines were deleted and the
    /// replacements failed to insert, leaving the record with none.
    DeadlinesCleared {
        conference_id: String,
        source: AppError,
    },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::SuggestionNotFound(id) => write!(f, "Suggestion {id} not found"),
            ReconcileError::TargetMissing(id) => {
                write!(f, "Target conference '{id}' does not exist")
            }
            ReconcileError::Store(e) => write!(f, "{e}"),
            ReconcileError::DeadlinesCleared { conference_id, source } => write!(
                f,
                "Deadlines for '{conference_id}' were cleared but the replacements \
                 failed to insert: {source}"
            ),
        }
    }
}

/// Derive the stable conference id: lower-cased name with non-alphanumeric
/// runs collapsed to single hyphens, suffixed with the conference year
/// (falling back to the current year). Collisions are left to the store's
/// uniqueness constraint and surface as an error to the operator.
pub fn derive_conference_id(
    name: &str,
    conf_start: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    let year = conf_start.map_or_else(|| now.year(), |d| d.year());
    format!("{slug}-{year}")
}

/// Bridge the suggestion side's flattened `category` + comma-joined
/// `subfields` back into the canonical `areas` mapping.
pub fn areas_from_flat(
    category: Option<&str>,
    subfields: Option<&str>,
) -> BTreeMap<String, Vec<String>> {
    let mut areas = BTreeMap::new();
    let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
        return areas;
    };
    let subs: Vec<String> = subfields
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    areas.insert(category.to_string(), subs);
    areas
}

/// Parse a suggestion's deadline list into insertable rows. Unparseable
/// entries are dropped, consistent with the normalizer.
pub fn suggestion_deadlines(s: &SuggestionRow) -> Vec<DeadlineInput> {
    let entries: Vec<RawDeadline> =
        serde_json::from_value(s.deadlines.clone()).unwrap_or_default();
    entries
        .into_iter()
        .filter_map(|d| {
            let due_date = d.due.as_deref().and_then(parse_instant)?;
            Some(DeadlineInput {
                deadline_type: d
                    .kind
                    .filter(|k| !k.is_empty())
                    .unwrap_or_else(|| "Deadline".to_string()),
                due_date,
            })
        })
        .collect()
}

fn areas_value(s: &SuggestionRow) -> serde_json::Value {
    let areas = areas_from_flat(s.category.as_deref(), s.subfields.as_deref());
    serde_json::to_value(areas).unwrap_or_else(|_| serde_json::json!({}))
}

/// Approve a suggestion: apply it to the canonical store, then delete it.
pub async fn approve<S: RecordStore>(
    store: &S,
    suggestion_id: i64,
    now: DateTime<Utc>,
) -> Result<ApprovalOutcome, ReconcileError> {
    let suggestion = store
        .find_suggestion(suggestion_id)
        .await
        .map_err(ReconcileError::Store)?
        .ok_or(ReconcileError::SuggestionNotFound(suggestion_id))?;

    if suggestion.is_edit {
        apply_edit(store, &suggestion, suggestion_id).await
    } else {
        apply_create(store, &suggestion, suggestion_id, now).await
    }
}

async fn apply_create<S: RecordStore>(
    store: &S,
    suggestion: &SuggestionRow,
    suggestion_id: i64,
    now: DateTime<Utc>,
) -> Result<ApprovalOutcome, ReconcileError> {
    let conference_id = derive_conference_id(&suggestion.name, suggestion.conf_start_date, now);
    let row = ConferenceRow {
        id: conference_id.clone(),
        name: suggestion.name.clone(),
        conf_start_date: suggestion.conf_start_date,
        conf_end_date: suggestion.conf_end_date,
        location: suggestion.location.clone(),
        site_url: suggestion.site_url.clone(),
        areas: areas_value(suggestion),
        tags: suggestion.tags.clone(),
        note: suggestion.note.clone(),
        timezone: suggestion.timezone.clone(),
    };

    store
        .insert_conference(&row)
        .await
        .map_err(ReconcileError::Store)?;

    let deadlines = suggestion_deadlines(suggestion);
    if !deadlines.is_empty() {
        if let Err(e) = store.insert_deadlines(&conference_id, &deadlines).await {
            // The conference exists, so this counts as done; the suggestion
            // goes away and the operator gets a warning instead of a retry.
            log::error!("deadline insert failed for new conference {conference_id}: {e}");
            if let Err(del) = store.delete_suggestion(suggestion_id).await {
                log::error!("could not delete suggestion {suggestion_id}: {del}");
            }
            return Ok(ApprovalOutcome::CreatedWithoutDeadlines {
                conference_id,
                detail: e.to_string(),
            });
        }
    }

    store
        .delete_suggestion(suggestion_id)
        .await
        .map_err(ReconcileError::Store)?;

    Ok(ApprovalOutcome::Created { conference_id })
}

async fn apply_edit<S: RecordStore>(
    store: &S,
    suggestion: &SuggestionRow,
    suggestion_id: i64,
) -> Result<ApprovalOutcome, ReconcileError> {
    let target_id = suggestion
        .target_conference_id
        .clone()
        .ok_or_else(|| ReconcileError::TargetMissing("unspecified".to_string()))?;

    let target = store
        .find_conference(&target_id)
        .await
        .map_err(ReconcileError::Store)?
        .ok_or_else(|| ReconcileError::TargetMissing(target_id.clone()))?;

    let patch = ConferenceUpdate {
        name: suggestion.name.clone(),
        conf_start_date: suggestion.conf_start_date,
        conf_end_date: suggestion.conf_end_date,
        location: suggestion.location.clone(),
        site_url: suggestion.site_url.clone(),
        note: suggestion.note.clone(),
        timezone: suggestion.timezone.clone(),
        areas: areas_value(suggestion),
    };
    store
        .update_conference(&target.id, &patch)
        .await
        .map_err(ReconcileError::Store)?;

    // The new deadline list replaces the old one wholesale. Delete-then-
    // insert is not transactional here; a failure between the two steps
    // leaves the record with zero deadlines and is reported as such.
    store
        .delete_deadlines(&target.id)
        .await
        .map_err(ReconcileError::Store)?;
    let deadlines = suggestion_deadlines(suggestion);
    store
        .insert_deadlines(&target.id, &deadlines)
        .await
        .map_err(|e| ReconcileError::DeadlinesCleared {
            conference_id: target.id.clone(),
            source: e,
        })?;

    store
        .delete_suggestion(suggestion_id)
        .await
        .map_err(ReconcileError::Store)?;

    Ok(ApprovalOutcome::Updated {
        conference_id: target.id,
    })
}

/// Reject a suggestion: delete it, nothing else.
pub async fn reject<S: RecordStore>(store: &S, suggestion_id: i64) -> Result<(), ReconcileError> {
    store
        .delete_suggestion(suggestion_id)
        .await
        .map_err(ReconcileError::Store)
}
