use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A conference record as retrieved from storage (or legacy JSON exports).
/// Everything except `id` is allowed to be missing or malformed; the
/// normalizer is total over this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConference {
    pub id: String,
    pub name: Option<String>,
    pub conf_start_date: Option<NaiveDate>,
    pub conf_end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub site_url: Option<String>,
    #[serde(default)]
    pub areas: serde_json::Value,
    #[serde(default)]
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub timezone: Option<String>,
    #[serde(default)]
    pub deadlines: RawDeadlines,
}

/// The three historical shapes of the `deadlines` field: absent, a single
/// legacy date string, or a list of `{type, due}` entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDeadlines {
    #[default]
    Missing,
    Legacy(String),
    List(Vec<RawDeadline>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDeadline {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub due: Option<String>,
}

/// Lifecycle classification of a conference relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    ComingSoon,
    Upcoming,
    Soon,
    Closed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::ComingSoon => "coming_soon",
            Status::Upcoming => "upcoming",
            Status::Soon => "soon",
            Status::Closed => "closed",
        }
    }
}

/// A parsed, displayable deadline. `due` is a real instant; unparseable
/// entries never make it this far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub kind: String,
    pub due: DateTime<Utc>,
}

impl Deadline {
    /// Deadline rendered in UTC-12 so it only reads as past once it has
    /// passed anywhere on Earth.
    pub fn due_aoe(&self) -> String {
        let aoe = FixedOffset::west_opt(12 * 3600).unwrap();
        format!("{} (AOE)", self.due.with_timezone(&aoe).format("%Y-%m-%d %H:%M"))
    }
}

/// A conference record after normalization. Recomputed wholesale on every
/// load; `status` and `next_due` are derived from `deadlines` and the `now`
/// passed to the normalizer, never mutated independently.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub conf_start: Option<NaiveDate>,
    pub conf_end: Option<NaiveDate>,
    pub location: String,
    pub site_url: String,
    pub areas: BTreeMap<String, Vec<String>>,
    pub tags: Vec<String>,
    pub note: String,
    /// Original input order, for display. The sorted order only exists
    /// internally while computing `next_due`/`status`.
    pub deadlines: Vec<Deadline>,
    pub next_due: Option<DateTime<Utc>>,
    pub status: Status,
}

impl CatalogItem {
    /// All subfields across every category, in category order.
    pub fn all_subfields(&self) -> impl Iterator<Item = &str> {
        self.areas.values().flatten().map(String::as_str)
    }
}
