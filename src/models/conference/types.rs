use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::types::{RawConference, RawDeadline, RawDeadlines};

/// A row of the `conferences` table. `id` is derived from name + year at
/// creation and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConferenceRow {
    pub id: String,
    pub name: String,
    pub conf_start_date: Option<NaiveDate>,
    pub conf_end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub site_url: Option<String>,
    pub areas: serde_json::Value,
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub timezone: Option<String>,
}

/// Field set for `update-by-id`. Overwrites scalars and `areas` wholesale;
/// `tags` stay untouched, an edit never rewrites them.
#[derive(Debug, Clone)]
pub struct ConferenceUpdate {
    pub name: String,
    pub conf_start_date: Option<NaiveDate>,
    pub conf_end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub site_url: Option<String>,
    pub note: Option<String>,
    pub timezone: Option<String>,
    pub areas: serde_json::Value,
}

/// A deadline owned by a conference, in wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeadlineInput {
    pub deadline_type: String,
    pub due_date: DateTime<Utc>,
}

impl ConferenceRow {
    /// Join a row with its deadlines into the normalizer's input shape.
    pub fn into_raw(self, deadlines: Vec<DeadlineInput>) -> RawConference {
        let deadlines = deadlines
            .into_iter()
            .map(|d| RawDeadline {
                kind: Some(d.deadline_type),
                due: Some(d.due_date.to_rfc3339()),
            })
            .collect();
        RawConference {
            id: self.id,
            name: Some(self.name),
            conf_start_date: self.conf_start_date,
            conf_end_date: self.conf_end_date,
            location: self.location,
            site_url: self.site_url,
            areas: self.areas,
            tags: self.tags,
            note: self.note,
            timezone: self.timezone,
            deadlines: RawDeadlines::List(deadlines),
        }
    }
}
