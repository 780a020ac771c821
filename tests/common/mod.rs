#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::json;

use alldeadlines::catalog::{RawConference, RawDeadlines};
use alldeadlines::errors::AppError;
use alldeadlines::models::conference::{ConferenceRow, ConferenceUpdate, DeadlineInput};
use alldeadlines::models::suggestion::{NewSuggestion, SuggestionRow};
use alldeadlines::store::RecordStore;

pub fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

pub fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, mo, d).unwrap()
}

pub fn raw_conference(id: &str, name: &str) -> RawConference {
    RawConference {
        id: id.to_string(),
        name: Some(name.to_string()),
        conf_start_date: None,
        conf_end_date: None,
        location: None,
        site_url: None,
        areas: json!({}),
        tags: vec![],
        note: None,
        timezone: None,
        deadlines: RawDeadlines::Missing,
    }
}

pub fn conference_row(id: &str, name: &str) -> ConferenceRow {
    ConferenceRow {
        id: id.to_string(),
        name: name.to_string(),
        conf_start_date: None,
        conf_end_date: None,
        location: None,
        site_url: None,
        areas: json!({}),
        tags: vec![],
        note: None,
        timezone: None,
    }
}

pub fn suggestion_row(id: i64, name: &str) -> SuggestionRow {
    SuggestionRow {
        id,
        created_at: instant(2026, 1, 1, 0, 0),
        name: name.to_string(),
        conf_start_date: None,
        conf_end_date: None,
        location: None,
        site_url: None,
        note: None,
        timezone: None,
        category: None,
        subfields: None,
        tags: vec![],
        deadlines: json!([]),
        is_edit: false,
        target_conference_id: None,
    }
}

pub fn deadline(kind: &str, due: DateTime<Utc>) -> DeadlineInput {
    DeadlineInput {
        deadline_type: kind.to_string(),
        due_date: due,
    }
}

fn injected() -> AppError {
    AppError::Store("injected failure".to_string())
}

/// In-memory stand-in for the Postgres store. The `fail_*` switches make
/// one write path error so the reconciler's partial-failure contracts can
/// be exercised.
#[derive(Default)]
pub struct MemStore {
    pub conferences: Mutex<Vec<ConferenceRow>>,
    pub deadlines: Mutex<Vec<(String, DeadlineInput)>>,
    pub suggestions: Mutex<Vec<SuggestionRow>>,
    pub next_suggestion_id: Mutex<i64>,
    pub fail_insert_conference: bool,
    pub fail_insert_deadlines: bool,
    pub fail_delete_deadlines: bool,
}

impl MemStore {
    pub fn seed_conference(&self, row: ConferenceRow, deadlines: Vec<DeadlineInput>) {
        let id = row.id.clone();
        self.conferences.lock().unwrap().push(row);
        let mut all = self.deadlines.lock().unwrap();
        for d in deadlines {
            all.push((id.clone(), d));
        }
    }

    pub fn seed_suggestion(&self, row: SuggestionRow) {
        let mut next = self.next_suggestion_id.lock().unwrap();
        *next = (*next).max(row.id + 1);
        self.suggestions.lock().unwrap().push(row);
    }

    pub fn conference(&self, id: &str) -> Option<ConferenceRow> {
        self.conferences
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn suggestion_count(&self) -> usize {
        self.suggestions.lock().unwrap().len()
    }
}

impl RecordStore for MemStore {
    async fn list_conferences(&self) -> Result<Vec<RawConference>, AppError> {
        let rows = self.conferences.lock().unwrap().clone();
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let deadlines = self.deadlines_for(&row.id).await?;
            out.push(row.into_raw(deadlines));
        }
        Ok(out)
    }

    async fn list_conference_rows(&self) -> Result<Vec<ConferenceRow>, AppError> {
        let mut rows = self.conferences.lock().unwrap().clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn find_conference(&self, id: &str) -> Result<Option<ConferenceRow>, AppError> {
        Ok(self.conference(id))
    }

    async fn insert_conference(&self, row: &ConferenceRow) -> Result<(), AppError> {
        if self.fail_insert_conference {
            return Err(injected());
        }
        let mut rows = self.conferences.lock().unwrap();
        if rows.iter().any(|c| c.id == row.id) {
            return Err(AppError::Store(format!("duplicate id {}", row.id)));
        }
        rows.push(row.clone());
        Ok(())
    }

    async fn update_conference(&self, id: &str, patch: &ConferenceUpdate) -> Result<(), AppError> {
        let mut rows = self.conferences.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|c| c.id == id) {
            row.name = patch.name.clone();
            row.conf_start_date = patch.conf_start_date;
            row.conf_end_date = patch.conf_end_date;
            row.location = patch.location.clone();
            row.site_url = patch.site_url.clone();
            row.note = patch.note.clone();
            row.timezone = patch.timezone.clone();
            row.areas = patch.areas.clone();
        }
        Ok(())
    }

    async fn delete_conference(&self, id: &str) -> Result<(), AppError> {
        self.conferences.lock().unwrap().retain(|c| c.id != id);
        self.deadlines.lock().unwrap().retain(|(cid, _)| cid != id);
        Ok(())
    }

    async fn deadlines_for(&self, conference_id: &str) -> Result<Vec<DeadlineInput>, AppError> {
        Ok(self
            .deadlines
            .lock()
            .unwrap()
            .iter()
            .filter(|(cid, _)| cid == conference_id)
            .map(|(_, d)| d.clone())
            .collect())
    }

    async fn insert_deadlines(
        &self,
        conference_id: &str,
        deadlines: &[DeadlineInput],
    ) -> Result<(), AppError> {
        if self.fail_insert_deadlines {
            return Err(injected());
        }
        let mut all = self.deadlines.lock().unwrap();
        for d in deadlines {
            all.push((conference_id.to_string(), d.clone()));
        }
        Ok(())
    }

    async fn delete_deadlines(&self, conference_id: &str) -> Result<(), AppError> {
        if self.fail_delete_deadlines {
            return Err(injected());
        }
        self.deadlines
            .lock()
            .unwrap()
            .retain(|(cid, _)| cid != conference_id);
        Ok(())
    }

    async fn list_suggestions(&self) -> Result<Vec<SuggestionRow>, AppError> {
        let mut rows = self.suggestions.lock().unwrap().clone();
        rows.sort_by_key(|s| s.created_at);
        Ok(rows)
    }

    async fn find_suggestion(&self, id: i64) -> Result<Option<SuggestionRow>, AppError> {
        Ok(self
            .suggestions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn insert_suggestion(&self, s: &NewSuggestion) -> Result<i64, AppError> {
        let mut next = self.next_suggestion_id.lock().unwrap();
        let id = *next;
        *next += 1;
        self.suggestions.lock().unwrap().push(SuggestionRow {
            id,
            created_at: Utc::now(),
            name: s.name.clone(),
            conf_start_date: s.conf_start_date,
            conf_end_date: s.conf_end_date,
            location: s.location.clone(),
            site_url: s.site_url.clone(),
            note: s.note.clone(),
            timezone: s.timezone.clone(),
            category: s.category.clone(),
            subfields: s.subfields.clone(),
            tags: s.tags.clone(),
            deadlines: s.deadlines.clone(),
            is_edit: s.is_edit,
            target_conference_id: s.target_conference_id.clone(),
        });
        Ok(id)
    }

    async fn delete_suggestion(&self, id: i64) -> Result<(), AppError> {
        self.suggestions.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }
}
