use actix_web::{HttpResponse, web};
use chrono::Utc;
use sqlx::PgPool;

use crate::calendar::{self, CalendarEvent};
use crate::catalog::normalize;
use crate::catalog::types::CatalogItem;
use crate::errors::AppError;
use crate::store::RecordStore;

async fn load_item<S: RecordStore>(store: &S, id: &str) -> Result<CatalogItem, AppError> {
    let row = store.find_conference(id).await?.ok_or(AppError::NotFound)?;
    let deadlines = store.deadlines_for(id).await?;
    Ok(normalize(&row.into_raw(deadlines), Utc::now()))
}

fn ics_response(event: &CalendarEvent) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/calendar; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", calendar::ics_filename(event)),
        ))
        .body(calendar::to_ics(event, Utc::now()))
}

/// GET /conferences/{id}/calendar.ics: the conference span.
pub async fn conference_ics(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let item = load_item(pool.get_ref(), &path.into_inner()).await?;
    let event = calendar::conference_event(&item).ok_or(AppError::NotFound)?;
    Ok(ics_response(&event))
}

/// GET /conferences/{id}/deadlines/{index}.ics: one deadline instant,
/// addressed by its display position.
pub async fn deadline_ics(
    pool: web::Data<PgPool>,
    path: web::Path<(String, usize)>,
) -> Result<HttpResponse, AppError> {
    let (id, index) = path.into_inner();
    let item = load_item(pool.get_ref(), &id).await?;
    let event = calendar::deadline_event(&item, index).ok_or(AppError::NotFound)?;
    Ok(ics_response(&event))
}
