use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::conference::ConferenceUpdate;
use crate::store::RecordStore;

/// The admin's inline edit form. Scalar fields only; areas, tags and note
/// are untouched by a manual edit.
#[derive(Debug, Deserialize)]
pub struct ConferenceEditForm {
    pub name: String,
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub conf_start_date: String,
    #[serde(default)]
    pub conf_end_date: String,
}

fn none_if_empty(s: String) -> Option<String> {
    let s = s.trim().to_string();
    if s.is_empty() { None } else { Some(s) }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn redirect_admin(kind: &str, message: String) -> HttpResponse {
    let query = serde_urlencoded::to_string([(kind, message.as_str())]).unwrap_or_default();
    HttpResponse::SeeOther()
        .insert_header(("Location", format!("/admin?{query}")))
        .finish()
}

/// POST /admin/conferences/{id}
pub async fn update(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    form: web::Form<ConferenceEditForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let store = pool.get_ref();

    let current = store.find_conference(&id).await?.ok_or(AppError::NotFound)?;
    let form = form.into_inner();

    let name = form.name.trim().to_string();
    if name.is_empty() {
        return Ok(redirect_admin("error", "Conference name is required".to_string()));
    }

    let patch = ConferenceUpdate {
        name,
        conf_start_date: parse_date(&form.conf_start_date),
        conf_end_date: parse_date(&form.conf_end_date),
        location: none_if_empty(form.location),
        site_url: none_if_empty(form.site_url),
        note: current.note.clone(),
        timezone: current.timezone.clone(),
        areas: current.areas.clone(),
    };

    let response = match store.update_conference(&id, &patch).await {
        Ok(()) => redirect_admin("notice", format!("Updated conference '{id}'")),
        Err(e) => {
            log::error!("update of conference {id} failed: {e}");
            redirect_admin("error", format!("Update failed: {e}"))
        }
    };
    Ok(response)
}

/// POST /admin/conferences/{id}/delete
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let response = match pool.get_ref().delete_conference(&id).await {
        Ok(()) => redirect_admin("notice", format!("Deleted conference '{id}'")),
        Err(e) => {
            log::error!("delete of conference {id} failed: {e}");
            redirect_admin("error", format!("Delete failed: {e}"))
        }
    };
    Ok(response)
}
