//! Calendar export: one VEVENT per conference span or single deadline,
//! plus the Google/Outlook compose deeplinks used by the card dropdown.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike};

use crate::catalog::types::{CatalogItem, Deadline};

const UID_DOMAIN: &str = "alldeadlines.info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
    pub description: String,
}

fn date_to_instant(d: chrono::NaiveDate) -> DateTime<Utc> {
    d.and_hms_opt(0, 0, 0).unwrap().and_utc()
}

/// The conference span as an event. None when the start date is unknown.
pub fn conference_event(item: &CatalogItem) -> Option<CalendarEvent> {
    let start = date_to_instant(item.conf_start?);
    let end = item.conf_end.map_or(start, date_to_instant);
    let site = if item.site_url.is_empty() { "N/A" } else { &item.site_url };
    Some(CalendarEvent {
        uid: format!("{}-conference@{UID_DOMAIN}", item.id),
        summary: item.name.clone(),
        start,
        end,
        location: item.location.clone(),
        description: format!("Conference Website: {site}"),
    })
}

/// A single deadline as a zero-length event, addressed by display index.
pub fn deadline_event(item: &CatalogItem, index: usize) -> Option<CalendarEvent> {
    item.deadlines
        .get(index)
        .map(|d| event_for_deadline(item, index, d))
}

pub fn event_for_deadline(item: &CatalogItem, index: usize, deadline: &Deadline) -> CalendarEvent {
    CalendarEvent {
        uid: format!("{}-deadline-{index}@{UID_DOMAIN}", item.id),
        summary: format!("{}: {}", item.name, deadline.kind),
        start: deadline.due,
        end: deadline.due,
        location: item.location.clone(),
        description: format!("Type: {}", deadline.kind),
    }
}

fn basic_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Serialize an event to iCalendar text. `now` becomes the DTSTAMP, so
/// output is deterministic under test.
pub fn to_ics(event: &CalendarEvent, now: DateTime<Utc>) -> String {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);
    ics_event.add_property("DTSTAMP", basic_utc(now));
    ics_event.add_property("DTSTART", basic_utc(event.start));
    ics_event.add_property("DTEND", basic_utc(event.end));
    ics_event.description(&event.description);
    if !event.location.is_empty() {
        ics_event.location(&event.location);
    }

    let mut cal = Calendar::new();
    cal.push(ics_event.done());
    cal.done().to_string()
}

/// Attachment filename for an event: sanitized summary plus extension.
pub fn ics_filename(event: &CalendarEvent) -> String {
    let safe: String = event
        .summary
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{safe}.ics")
}

fn compose_link(base: &str, pairs: &[(&str, String)]) -> String {
    let query = serde_urlencoded::to_string(pairs).unwrap_or_default();
    format!("{base}{query}")
}

pub fn google_link(event: &CalendarEvent) -> String {
    compose_link(
        "https://www.google.com/calendar/render?action=TEMPLATE&",
        &[
            ("text", event.summary.clone()),
            ("dates", format!("{}/{}", basic_utc(event.start), basic_utc(event.end))),
            ("location", event.location.clone()),
            ("details", event.description.clone()),
        ],
    )
}

pub fn outlook_link(event: &CalendarEvent) -> String {
    compose_link(
        "https://outlook.office.com/calendar/0/deeplink/compose?path=/calendar/action/compose&rru=addevent&",
        &[
            ("subject", event.summary.clone()),
            ("startdt", basic_utc(event.start)),
            ("enddt", basic_utc(event.end)),
            ("location", event.location.clone()),
            ("body", event.description.clone()),
        ],
    )
}
