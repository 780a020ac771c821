use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A row of `conference_suggestions`. Conference-shaped, except that
/// `areas` arrives flattened as one `category` plus a comma-joined
/// `subfields` string, and `deadlines` is a JSON array of `{type, due}`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SuggestionRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub conf_start_date: Option<NaiveDate>,
    pub conf_end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub site_url: Option<String>,
    pub note: Option<String>,
    pub timezone: Option<String>,
    pub category: Option<String>,
    pub subfields: Option<String>,
    pub tags: Vec<String>,
    pub deadlines: serde_json::Value,
    pub is_edit: bool,
    pub target_conference_id: Option<String>,
}

/// Insert shape for a new suggestion.
#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub name: String,
    pub conf_start_date: Option<NaiveDate>,
    pub conf_end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub site_url: Option<String>,
    pub note: Option<String>,
    pub timezone: Option<String>,
    pub category: Option<String>,
    pub subfields: Option<String>,
    pub tags: Vec<String>,
    pub deadlines: serde_json::Value,
    pub is_edit: bool,
    pub target_conference_id: Option<String>,
}

/// The public submission form. Dates and the optional single deadline are
/// plain strings; anything that does not parse is stored as absent and
/// surfaces later as a diff or a parse-drop, not as a rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionForm {
    pub name: String,
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub conf_start_date: String,
    #[serde(default)]
    pub conf_end_date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subfields: String,
    #[serde(default)]
    pub deadline_type: String,
    #[serde(default)]
    pub deadline_date: String,
    #[serde(default)]
    pub is_edit: bool,
    #[serde(default)]
    pub target_conference_id: String,
}

fn none_if_empty(s: String) -> Option<String> {
    let s = s.trim().to_string();
    if s.is_empty() { None } else { Some(s) }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

impl SuggestionForm {
    /// Basic required-field validation only, then into insert shape.
    pub fn into_new(self) -> Result<NewSuggestion, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Conference name is required".to_string()));
        }
        let target_conference_id = none_if_empty(self.target_conference_id);
        if self.is_edit && target_conference_id.is_none() {
            return Err(AppError::Validation(
                "An edit suggestion needs a target conference".to_string(),
            ));
        }

        let deadlines = match none_if_empty(self.deadline_date) {
            Some(due) => {
                let kind = none_if_empty(self.deadline_type)
                    .unwrap_or_else(|| "Deadline".to_string());
                serde_json::json!([{ "type": kind, "due": due }])
            }
            None => serde_json::json!([]),
        };

        Ok(NewSuggestion {
            name,
            conf_start_date: parse_date(&self.conf_start_date),
            conf_end_date: parse_date(&self.conf_end_date),
            location: none_if_empty(self.location),
            site_url: none_if_empty(self.site_url),
            note: None,
            timezone: None,
            category: none_if_empty(self.category),
            subfields: none_if_empty(self.subfields),
            // The public form has no tag input.
            tags: vec![],
            deadlines,
            is_edit: self.is_edit,
            target_conference_id,
        })
    }
}
