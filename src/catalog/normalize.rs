use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;

use super::types::{CatalogItem, Deadline, RawConference, RawDeadline, RawDeadlines, Status};

/// A deadline counts as "soon" when it is this many days out or fewer.
const SOON_WINDOW_DAYS: i64 = 7;

/// Parse the date strings that occur in the wild: RFC 3339, a naive
/// datetime, or a bare date (taken as midnight UTC).
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0).unwrap().and_utc());
    }
    None
}

fn coerce_deadlines(raw: &RawDeadlines) -> Vec<RawDeadline> {
    match raw {
        RawDeadlines::Missing => vec![],
        // Legacy records carried a single bare date string.
        RawDeadlines::Legacy(s) => vec![RawDeadline {
            kind: None,
            due: Some(s.clone()),
        }],
        RawDeadlines::List(list) => list.clone(),
    }
}

/// Read an `areas` JSON value into the canonical mapping. Anything that is
/// not an object yields an empty map; non-string subfields are dropped.
pub fn areas_from_value(value: &serde_json::Value) -> BTreeMap<String, Vec<String>> {
    let serde_json::Value::Object(map) = value else {
        return BTreeMap::new();
    };
    map.iter()
        .map(|(category, subfields)| {
            let subs = subfields
                .as_array()
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            (category.clone(), subs)
        })
        .collect()
}

/// Turn a raw record into a displayable catalog item.
///
/// Total over any input: entries whose `due` is missing or unparseable are
/// dropped (a malformed deadline must never take down the view), missing
/// kinds default to "Deadline", and a non-object `areas` becomes empty.
/// The returned `deadlines` keep the original input order; `next_due` is
/// the earliest instant strictly after `now`, and `status` follows from it.
pub fn normalize(raw: &RawConference, now: DateTime<Utc>) -> CatalogItem {
    let deadlines: Vec<Deadline> = coerce_deadlines(&raw.deadlines)
        .into_iter()
        .filter_map(|d| {
            let Some(due) = d.due.as_deref().and_then(parse_instant) else {
                log::debug!("dropping unparseable deadline {:?} on {}", d.due, raw.id);
                return None;
            };
            let kind = d
                .kind
                .filter(|k| !k.is_empty())
                .unwrap_or_else(|| "Deadline".to_string());
            Some(Deadline { kind, due })
        })
        .collect();

    let mut ordered = deadlines.clone();
    ordered.sort_by_key(|d| d.due);
    let next_due = ordered.iter().map(|d| d.due).find(|due| *due > now);

    let status = if deadlines.is_empty() {
        Status::ComingSoon
    } else {
        match next_due {
            Some(due) => {
                let secs = (due - now).num_seconds();
                let days = secs / 86_400 + if secs % 86_400 > 0 { 1 } else { 0 };
                if days <= SOON_WINDOW_DAYS {
                    Status::Soon
                } else {
                    Status::Upcoming
                }
            }
            None => Status::Closed,
        }
    };

    CatalogItem {
        id: raw.id.clone(),
        name: raw.name.clone().unwrap_or_default(),
        conf_start: raw.conf_start_date,
        conf_end: raw.conf_end_date,
        location: raw.location.clone().unwrap_or_default(),
        site_url: raw.site_url.clone().unwrap_or_default(),
        areas: areas_from_value(&raw.areas),
        tags: raw.tags.clone(),
        note: raw.note.clone().unwrap_or_default(),
        deadlines,
        next_due,
        status,
    }
}
