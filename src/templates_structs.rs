use askama::Template;
use chrono::{DateTime, NaiveDate, Utc};

use crate::calendar;
use crate::catalog::types::{CatalogItem, Deadline, Status};
use crate::catalog::view_state::ViewState;
use crate::models::conference::{ConferenceRow, DeadlineInput};
use crate::models::suggestion::SuggestionRow;
use crate::reconcile::{self, diff};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub state: ViewState,
    pub show_past: bool,
    pub submitted: bool,
    pub load_error: Option<String>,
    pub categories: Vec<String>,
    pub subfields: Vec<String>,
    pub result_count: usize,
    pub cards: Vec<CardView>,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub notice: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub suggestions_error: Option<String>,
    pub conferences_error: Option<String>,
    pub suggestions: Vec<SuggestionView>,
    pub conferences: Vec<ConferenceView>,
}

/// Calendar links for one exportable event.
pub struct EventLinks {
    pub google: String,
    pub outlook: String,
    pub ics_path: String,
}

pub struct AreaGroup {
    pub category: String,
    pub subfields: Vec<String>,
}

pub struct DeadlineLine {
    pub kind: String,
    pub due_aoe: String,
    pub links: EventLinks,
}

/// Everything one browse card needs, precomputed against a single `now`.
pub struct CardView {
    pub id: String,
    pub name: String,
    pub location: String,
    pub site_url: String,
    pub date_range: String,
    pub badge_class: &'static str,
    pub badge_text: String,
    /// RFC 3339 next deadline, feeding the countdown's data attribute.
    pub countdown_iso: Option<String>,
    pub areas: Vec<AreaGroup>,
    pub tags: Vec<String>,
    pub note: String,
    pub deadlines: Vec<DeadlineLine>,
    pub conference_links: Option<EventLinks>,
}

fn badge(item: &CatalogItem, now: DateTime<Utc>) -> (&'static str, String) {
    if item.status == Status::ComingSoon {
        return ("badge-comingsoon", "Coming Soon!".to_string());
    }
    let Some(due) = item.next_due else {
        return ("badge-closed", "Closed".to_string());
    };
    let days = (due - now).num_seconds() / 86_400;
    let text = if days < 1 { "D-DAY".to_string() } else { format!("D-{days}") };
    let class = if days <= 7 { "badge-soon" } else { "badge-upcoming" };
    (class, text)
}

fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    if start.is_none() && end.is_none() {
        return String::new();
    }
    let show = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
    format!("{} ~ {}", show(start), show(end))
}

impl CardView {
    pub fn build(item: &CatalogItem, now: DateTime<Utc>) -> CardView {
        let (badge_class, badge_text) = badge(item, now);

        let conference_links = calendar::conference_event(item).map(|ev| EventLinks {
            google: calendar::google_link(&ev),
            outlook: calendar::outlook_link(&ev),
            ics_path: format!("/conferences/{}/calendar.ics", item.id),
        });

        let deadlines = item
            .deadlines
            .iter()
            .enumerate()
            .map(|(index, d)| {
                let ev = calendar::event_for_deadline(item, index, d);
                DeadlineLine {
                    kind: d.kind.clone(),
                    due_aoe: d.due_aoe(),
                    links: EventLinks {
                        google: calendar::google_link(&ev),
                        outlook: calendar::outlook_link(&ev),
                        ics_path: format!("/conferences/{}/deadlines/{}.ics", item.id, index),
                    },
                }
            })
            .collect();

        CardView {
            id: item.id.clone(),
            name: item.name.clone(),
            location: item.location.clone(),
            site_url: item.site_url.clone(),
            date_range: date_range(item.conf_start, item.conf_end),
            badge_class,
            badge_text,
            countdown_iso: item.next_due.map(|d| d.to_rfc3339()),
            areas: item
                .areas
                .iter()
                .map(|(category, subfields)| AreaGroup {
                    category: category.clone(),
                    subfields: subfields.clone(),
                })
                .collect(),
            tags: item.tags.clone(),
            note: item.note.clone(),
            deadlines,
            conference_links,
        }
    }
}

/// One entry of the admin review queue.
pub struct SuggestionView {
    pub id: i64,
    pub name: String,
    pub kind_label: &'static str,
    pub target: String,
    pub site_url: String,
    pub location: String,
    pub date_range: String,
    pub category_line: String,
    pub deadlines: Vec<String>,
    /// Diff against the target record; only populated for edits.
    pub changes: Vec<String>,
    pub target_missing: bool,
}

impl SuggestionView {
    pub fn build(
        s: &SuggestionRow,
        target: Option<(&ConferenceRow, &[DeadlineInput])>,
    ) -> SuggestionView {
        let deadlines = reconcile::suggestion_deadlines(s)
            .into_iter()
            .map(|d| {
                let parsed = Deadline {
                    kind: d.deadline_type,
                    due: d.due_date,
                };
                format!("{}: {}", parsed.kind, parsed.due_aoe())
            })
            .collect();

        let category_line = match s.category.as_deref() {
            Some(cat) if !cat.is_empty() => match s.subfields.as_deref() {
                Some(subs) if !subs.is_empty() => format!("{cat}: {subs}"),
                _ => cat.to_string(),
            },
            _ => String::new(),
        };

        let changes = target
            .map(|(row, dls)| diff::changes(row, dls, s))
            .unwrap_or_default();

        SuggestionView {
            id: s.id,
            name: s.name.clone(),
            kind_label: if s.is_edit { "Edit" } else { "New" },
            target: s.target_conference_id.clone().unwrap_or_default(),
            site_url: s.site_url.clone().unwrap_or_default(),
            location: s.location.clone().unwrap_or_default(),
            date_range: date_range(s.conf_start_date, s.conf_end_date),
            category_line,
            deadlines,
            changes,
            target_missing: s.is_edit && target.is_none(),
        }
    }
}

/// One row of the admin conference list, form-ready.
pub struct ConferenceView {
    pub id: String,
    pub name: String,
    pub location: String,
    pub site_url: String,
    pub conf_start: String,
    pub conf_end: String,
}

impl From<&ConferenceRow> for ConferenceView {
    fn from(row: &ConferenceRow) -> Self {
        let show = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        ConferenceView {
            id: row.id.clone(),
            name: row.name.clone(),
            location: row.location.clone().unwrap_or_default(),
            site_url: row.site_url.clone().unwrap_or_default(),
            conf_start: show(row.conf_start_date),
            conf_end: show(row.conf_end_date),
        }
    }
}
