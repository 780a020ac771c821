use sqlx::PgPool;

use super::types::*;
use crate::errors::AppError;

const COLUMNS: &str = "id, created_at, name, conf_start_date, conf_end_date, location, \
                       site_url, note, timezone, category, subfields, tags, deadlines, \
                       is_edit, target_conference_id";

/// All pending suggestions, oldest first (review queue order).
pub async fn find_all(pool: &PgPool) -> Result<Vec<SuggestionRow>, AppError> {
    let rows = sqlx::query_as::<_, SuggestionRow>(&format!(
        "SELECT {COLUMNS} FROM conference_suggestions ORDER BY created_at ASC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<SuggestionRow>, AppError> {
    let row = sqlx::query_as::<_, SuggestionRow>(&format!(
        "SELECT {COLUMNS} FROM conference_suggestions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert(pool: &PgPool, s: &NewSuggestion) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO conference_suggestions \
             (name, conf_start_date, conf_end_date, location, site_url, note, \
              timezone, category, subfields, tags, deadlines, is_edit, \
              target_conference_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING id",
    )
    .bind(&s.name)
    .bind(s.conf_start_date)
    .bind(s.conf_end_date)
    .bind(&s.location)
    .bind(&s.site_url)
    .bind(&s.note)
    .bind(&s.timezone)
    .bind(&s.category)
    .bind(&s.subfields)
    .bind(&s.tags)
    .bind(&s.deadlines)
    .bind(s.is_edit)
    .bind(&s.target_conference_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM conference_suggestions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
